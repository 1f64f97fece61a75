use std::{io::BufRead, ops::Range};

use coordinates::{Coordinates, parse_coordinate_line};
use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::{
    error::{Error, Result},
    io::trim_id,
    registry::{InsertionRegistry, InsertionRegistryBuilder},
};

pub mod coordinates;


/// The number of header lines at the start of a map file.
pub const MAP_PREAMBLE_LINES: usize = 2;

/// A range of pre-alignment residues that needs to be inserted at a point of the post-alignment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionRecord {
    pub sequence_id: String,
    /// One-based first residue of the insertion in the pre-alignment sequence.
    pub pre_start: usize,
    /// One-based last residue (inclusive) of the insertion in the pre-alignment sequence.
    pub pre_end: usize,
    /// Offset in the post-alignment sequence at which the residues are inserted.
    pub insertion_point: usize,
    /// Only validated, carries no meaning for merging.
    pub post_end: usize,
}

impl InsertionRecord {
    pub fn new(sequence_id: impl Into<String>, coordinates: Coordinates) -> Result<Self> {
        let sequence_id = sequence_id.into();
        let Coordinates {
            pre_start,
            pre_end,
            insertion_point,
            post_end,
        } = coordinates;

        // The exclusive end `pre_end + 1` must exist and must not precede the start.
        if pre_start == 0 || pre_end.checked_add(1).is_none_or(|end| end < pre_start) {
            return Err(Error::InvalidInsertionRange {
                id: sequence_id,
                pre_start,
                pre_end,
            });
        }

        Ok(Self {
            sequence_id,
            pre_start,
            pre_end,
            insertion_point,
            post_end,
        })
    }

    pub fn width(&self) -> usize {
        self.pre_alignment_range().len()
    }

    /// The zero-based half-open range of the inserted residues in the pre-alignment sequence.
    pub fn pre_alignment_range(&self) -> Range<usize> {
        self.pre_start - 1..self.pre_end
    }
}

/// All insertion records of a map file, grouped by sequence id, together with the frozen registry.
#[derive(Debug)]
pub struct InsertionMap {
    records: FxHashMap<String, Vec<InsertionRecord>>,
    registry: InsertionRegistry,
}

impl InsertionMap {
    /// Parses a map file.
    ///
    /// Coordinate lines belong to the last id line before them.
    /// Ids that occur multiple times accumulate their records.
    pub fn read(reader: impl BufRead) -> Result<Self> {
        let mut lines = reader.lines();
        for _ in 0..MAP_PREAMBLE_LINES {
            if lines.next().transpose()?.is_none() {
                break;
            }
        }

        let mut registry = InsertionRegistryBuilder::new();
        let mut records = FxHashMap::<String, Vec<InsertionRecord>>::default();
        let mut current_id = None::<String>;

        for raw_line in lines {
            let raw_line = raw_line?;
            let line = raw_line.trim_end_matches('\r');

            if let Some(id) = line.strip_prefix('>') {
                trace!("Map record id line {line:?}");
                current_id = Some(trim_id(id).to_string());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some(id) = current_id.as_ref() else {
                return Err(Error::MapRecordWithoutId {
                    line: line.to_string(),
                });
            };
            let coordinates = parse_coordinate_line(line).map_err(|kind| Error::MapParse {
                id: id.clone(),
                line: line.to_string(),
                kind,
            })?;
            let record = InsertionRecord::new(id.as_str(), coordinates)?;

            registry.record_width(record.insertion_point, record.width());
            records.entry(id.clone()).or_default().push(record);
        }

        let registry = registry.freeze();
        debug!(
            "Parsed insertion records of {} sequences with {} insertion points",
            records.len(),
            registry.len()
        );

        Ok(Self { records, registry })
    }

    /// The records of the given sequence in map order.
    pub fn records(&self, id: &str) -> Option<&[InsertionRecord]> {
        self.records.get(id).map(Vec::as_slice)
    }

    pub fn registry(&self) -> &InsertionRegistry {
        &self.registry
    }

    pub fn sequence_count(&self) -> usize {
        self.records.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}
