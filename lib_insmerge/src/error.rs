use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("Error writing CSV output: {0}.")]
    Csv(#[from] csv::Error),

    #[error("Error reading character from fasta input: {0}.")]
    FastaRead(String),

    #[error("Found non-whitespace character before first fasta record: {character}.")]
    FastaContentBeforeHeader { character: char },

    #[error(
        "The coordinate line '{line}' of sequence '{id}' could not be parsed (parser error kind '{kind:?}')."
    )]
    MapParse {
        id: String,
        line: String,
        kind: nom::error::ErrorKind,
    },

    #[error("The coordinate line '{line}' is not preceded by a sequence id line.")]
    MapRecordWithoutId { line: String },

    #[error(
        "The insertion range {pre_start}-{pre_end} of sequence '{id}' is invalid. Ranges are one-based and inclusive."
    )]
    InvalidInsertionRange {
        id: String,
        pre_start: usize,
        pre_end: usize,
    },

    #[error(
        "The insertion starting at {pre_start} of sequence '{id}' lies outside of its pre-alignment sequence of length {length}."
    )]
    InsertionOutsideSequence {
        id: String,
        pre_start: usize,
        length: usize,
    },

    #[error(
        "The insertion point {insertion_point} lies beyond the post-alignment sequence '{id}' of length {length}."
    )]
    InsertionPointOutOfRange {
        id: String,
        insertion_point: usize,
        length: usize,
    },
}
