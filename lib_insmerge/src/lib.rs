pub mod assembly;
pub mod configuration;
pub mod error;
pub mod fasta;
mod io;
pub mod labels;
pub mod map;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod plan;
pub mod registry;

/// The character used to pad insertions and to fill insertion points a sequence does not cover.
pub const DEFAULT_GAP_CHARACTER: char = '-';
