use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    assembly::AssembledSequence, error::Result, labels::ColumnLabelGenerator,
    registry::InsertionRegistry,
};


/// Extension of tagged primary outputs that is replaced when deriving the auxiliary output path.
pub const TAGGED_OUTPUT_EXTENSION: &str = ".fa";
/// Appended to the primary output path to derive the auxiliary output path.
pub const AUXILIARY_OUTPUT_SUFFIX: &str = "_jSeqs.fa";

/// Emits assembled sequences.
pub trait OutputFormatter {
    /// Emits one assembled sequence.
    ///
    /// `tail` holds the residues that follow the insertion at point zero in the pre-alignment sequence, if they were captured.
    fn write_sequence(&mut self, assembled: &AssembledSequence, tail: Option<&str>) -> Result<()>;

    /// Completes the output after the last sequence was written.
    fn finish(&mut self, registry: &InsertionRegistry, max_length: usize) -> Result<()>;
}

/// Writes a CSV matrix with one row per sequence and one column per character.
///
/// The first column after the id is an anchor column that repeats the first character,
/// such that the numeric column `n` holds the `n`th residue of the post-alignment sequence.
/// Rows are kept in memory until [`finish`](OutputFormatter::finish), since the header depends on all sequences.
pub struct MatrixFormatter<Writer: Write> {
    writer: Writer,
    /// Pairs of id and assembled sequence.
    rows: Vec<(String, String)>,
}

impl<Writer: Write> MatrixFormatter<Writer> {
    pub fn new(writer: Writer) -> Self {
        Self {
            writer,
            rows: Vec::new(),
        }
    }

    pub fn into_inner(self) -> Writer {
        self.writer
    }
}

/// Splits a sequence into one field per character.
fn character_fields(sequence: &str) -> impl Iterator<Item = &str> {
    sequence
        .char_indices()
        .map(|(offset, character)| &sequence[offset..offset + character.len_utf8()])
}

impl<Writer: Write> OutputFormatter for MatrixFormatter<Writer> {
    fn write_sequence(&mut self, assembled: &AssembledSequence, _tail: Option<&str>) -> Result<()> {
        self.rows.push((assembled.id.clone(), assembled.sequence.clone()));
        Ok(())
    }

    fn finish(&mut self, registry: &InsertionRegistry, max_length: usize) -> Result<()> {
        debug!(
            "Writing matrix with {} rows for sequences of up to {max_length} characters",
            self.rows.len()
        );

        // Sequences shorter than the longest one have shorter rows.
        let mut csv = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut self.writer);
        csv.write_record(
            std::iter::once("Id".to_string())
                .chain(ColumnLabelGenerator::new(registry, max_length).labels()),
        )?;

        for (id, sequence) in self.rows.drain(..) {
            let anchor = character_fields(&sequence).next().unwrap_or_default();
            csv.write_record(
                [id.as_str(), anchor]
                    .into_iter()
                    .chain(character_fields(&sequence)),
            )?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Writes the merged heads to a primary output and the captured tails to an auxiliary output,
/// both as pairs of an id line and a sequence line.
pub struct TaggedFormatter<Primary: Write, Auxiliary: Write> {
    primary: Primary,
    auxiliary: Auxiliary,
}

impl<Primary: Write, Auxiliary: Write> TaggedFormatter<Primary, Auxiliary> {
    pub fn new(primary: Primary, auxiliary: Auxiliary) -> Self {
        Self { primary, auxiliary }
    }

    pub fn into_inner(self) -> (Primary, Auxiliary) {
        (self.primary, self.auxiliary)
    }
}

impl<Primary: Write, Auxiliary: Write> OutputFormatter for TaggedFormatter<Primary, Auxiliary> {
    fn write_sequence(&mut self, assembled: &AssembledSequence, tail: Option<&str>) -> Result<()> {
        writeln!(self.primary, ">{}", assembled.id)?;
        writeln!(self.primary, "{}", assembled.sequence)?;

        writeln!(self.auxiliary, ">{}", assembled.id)?;
        writeln!(self.auxiliary, "{}", tail.unwrap_or_default())?;
        Ok(())
    }

    fn finish(&mut self, _registry: &InsertionRegistry, _max_length: usize) -> Result<()> {
        self.primary.flush()?;
        self.auxiliary.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryOutputPath {
    pub path: PathBuf,
    /// False if the primary output did not end in `.fa`, in which case the suffix was appended verbatim.
    pub matches_convention: bool,
}

/// Derives the path of the auxiliary output from the primary output path.
///
/// A trailing `.fa` is replaced by `_jSeqs.fa`.
/// Otherwise, `_jSeqs.fa` is appended and a warning is logged.
pub fn auxiliary_output_path(primary: &Path) -> AuxiliaryOutputPath {
    if let Some(stem) = primary
        .to_str()
        .and_then(|primary| primary.strip_suffix(TAGGED_OUTPUT_EXTENSION))
    {
        return AuxiliaryOutputPath {
            path: PathBuf::from(format!("{stem}{AUXILIARY_OUTPUT_SUFFIX}")),
            matches_convention: true,
        };
    }

    let mut path = OsString::from(primary.as_os_str());
    path.push(AUXILIARY_OUTPUT_SUFFIX);
    let path = PathBuf::from(path);
    warn!(
        "The output file {primary:?} does not end in \"{TAGGED_OUTPUT_EXTENSION}\". The tails will be written to {path:?}, while the output file stays as it is."
    );

    AuxiliaryOutputPath {
        path,
        matches_convention: false,
    }
}
