use std::io::BufRead;

use log::trace;
use utf8_chars::BufReadCharsExt;

use crate::{
    error::{Error, Result},
    io::trim_id,
};

#[cfg(test)]
mod tests;

/// Header lines up to this length (including the leading `>`) are used as id verbatim.
pub const SHORT_HEADER_LENGTH: usize = 12;

/// Gene prefixes that mark the part after the first `|` as annotation rather than id.
const ANNOTATION_PREFIXES: [&str; 2] = ["IGH", "TCR"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaRecord {
    /// The header line without the leading `>`.
    pub header: String,
    /// All sequence lines of the record concatenated.
    pub sequence: String,
}

impl FastaRecord {
    /// The id of a record of the pre-alignment input.
    pub fn pre_alignment_id(&self) -> &str {
        trim_id(&self.header)
    }

    /// The id of a record of the post-alignment input.
    ///
    /// Short headers are taken as they are.
    /// Longer headers are split at the first `|`, and the part after it is the id,
    /// unless it is a gene annotation, in which case the part before it is the id.
    pub fn post_alignment_id(&self) -> &str {
        let header = self.header.as_str();
        let id = if header.len() < SHORT_HEADER_LENGTH {
            header
        } else if let Some((before, after)) = header.split_once('|') {
            if ANNOTATION_PREFIXES
                .iter()
                .any(|prefix| after.starts_with(prefix))
            {
                before
            } else {
                after
            }
        } else {
            header
        };

        trim_id(id)
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    FileStart,
    Header,
    Sequence,
    Exhausted,
}

/// Reads fasta records one at a time.
///
/// A `>` starts a new record only at the beginning of a line.
pub struct FastaReader<Reader: BufRead> {
    input: CharacterIterator<Reader>,
    state: State,
    line_start: bool,
}

impl<Reader: BufRead> FastaReader<Reader> {
    pub fn new(reader: Reader) -> Self {
        Self {
            input: CharacterIterator::new(reader),
            state: State::FileStart,
            line_start: true,
        }
    }

    fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if let State::Exhausted = self.state {
            return Ok(None);
        }
        let mut record = FastaRecord::default();

        while let Some(character) = self.input.next().transpose()? {
            let line_start = std::mem::replace(
                &mut self.line_start,
                matches!(character, Character::Newline),
            );

            match (self.state, character) {
                (State::Exhausted, _) => return Ok(None),
                (State::Header, Character::Newline) => self.state = State::Sequence,
                (State::Header, Character::RecordStart) => record.header.push('>'),
                (State::Header, Character::Other(c)) => record.header.push(c),
                (State::FileStart | State::Sequence, Character::Newline) => {}
                (State::FileStart, Character::RecordStart) if line_start => {
                    self.state = State::Header
                }
                (State::FileStart, Character::RecordStart) => {
                    return Err(Error::FastaContentBeforeHeader { character: '>' });
                }
                (State::FileStart, Character::Other(c)) => {
                    if !c.is_whitespace() {
                        return Err(Error::FastaContentBeforeHeader { character: c });
                    }
                }
                (State::Sequence, Character::RecordStart) if line_start => {
                    self.state = State::Header;
                    trace!("Read fasta record {:?}", record.header);
                    return Ok(Some(record));
                }
                (State::Sequence, Character::RecordStart) => record.sequence.push('>'),
                (State::Sequence, Character::Other(c)) => record.sequence.push(c),
            }
        }

        match std::mem::replace(&mut self.state, State::Exhausted) {
            State::Header | State::Sequence => {
                trace!("Read fasta record {:?}", record.header);
                Ok(Some(record))
            }
            State::FileStart | State::Exhausted => Ok(None),
        }
    }
}

impl<Reader: BufRead> Iterator for FastaReader<Reader> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(error) => {
                self.state = State::Exhausted;
                Some(Err(error))
            }
        }
    }
}

enum Character {
    Newline,
    RecordStart,
    Other(char),
}

struct CharacterIterator<Reader: BufRead> {
    reader: Reader,
}

impl<Reader: BufRead> CharacterIterator<Reader> {
    fn new(reader: Reader) -> Self {
        Self { reader }
    }
}

impl<Reader: BufRead> Iterator for CharacterIterator<Reader> {
    type Item = Result<Character>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader
            .read_char_raw()
            .map(|result| {
                result.map(|c| {
                    if c == '\n' || c == '\r' {
                        Character::Newline
                    } else if c == '>' {
                        Character::RecordStart
                    } else {
                        Character::Other(c)
                    }
                })
            })
            .map_err(|error| Error::FastaRead(error.to_string()))
            .transpose()
    }
}
