use std::{
    collections::{BTreeMap, btree_map::Entry},
    io::BufRead,
};

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

use crate::{
    configuration::MergeConfiguration,
    error::{Error, Result},
    fasta::FastaReader,
    map::{InsertionMap, InsertionRecord},
    registry::InsertionRegistry,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Residues of the pre-alignment sequence, possibly right-padded with gap characters.
    Residues,
    /// Only gap characters, for insertion points the sequence has no residues for.
    Filler,
}

/// The content to be inserted into one sequence at one insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePart {
    pub insertion_point: usize,
    pub content: String,
    pub kind: PartKind,
}

impl SequencePart {
    pub fn residues(insertion_point: usize, content: String) -> Self {
        Self {
            insertion_point,
            content,
            kind: PartKind::Residues,
        }
    }

    pub fn filler(insertion_point: usize, width: usize, gap_character: char) -> Self {
        Self {
            insertion_point,
            content: std::iter::repeat_n(gap_character, width).collect(),
            kind: PartKind::Filler,
        }
    }
}

/// The parts to insert into one sequence, strictly increasing by insertion point.
///
/// A plan built against a registry has exactly one part per insertion point of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionPlan {
    parts: Vec<SequencePart>,
}

impl InsertionPlan {
    /// A plan that fills every insertion point of the registry with gap characters.
    pub fn filler(registry: &InsertionRegistry, gap_character: char) -> Self {
        Self {
            parts: registry
                .iter()
                .map(|(insertion_point, width)| {
                    SequencePart::filler(insertion_point, width, gap_character)
                })
                .collect(),
        }
    }

    pub fn parts(&self) -> &[SequencePart] {
        &self.parts
    }

    pub fn part(&self, insertion_point: usize) -> Option<&SequencePart> {
        self.parts
            .binary_search_by_key(&insertion_point, |part| part.insertion_point)
            .ok()
            .map(|index| &self.parts[index])
    }

    /// Returns true if the plan has exactly one part per insertion point of the registry,
    /// and no part is wider than its insertion point.
    pub fn is_complete(&self, registry: &InsertionRegistry) -> bool {
        self.parts.len() == registry.len()
            && self
                .parts
                .iter()
                .zip(registry.iter())
                .all(|(part, (insertion_point, width))| {
                    part.insertion_point == insertion_point
                        && part.content.chars().count() <= width
                })
    }
}

/// The plan of a sequence and, in trimmed mode, the residues following its insertion at point zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPlan {
    pub plan: InsertionPlan,
    pub tail: Option<String>,
}

pub struct SequenceInsertionBuilder<'registry> {
    registry: &'registry InsertionRegistry,
    configuration: MergeConfiguration,
}

impl<'registry> SequenceInsertionBuilder<'registry> {
    pub fn new(registry: &'registry InsertionRegistry, configuration: MergeConfiguration) -> Self {
        Self {
            registry,
            configuration,
        }
    }

    /// Builds the plan of one sequence from its pre-alignment residues and its insertion records.
    ///
    /// The records must come from the map the registry was built from.
    pub fn build(
        &self,
        id: &str,
        sequence: &str,
        records: &[InsertionRecord],
    ) -> Result<BuiltPlan> {
        let gap_character = self.configuration.gap_character;
        let mut parts = BTreeMap::new();
        let mut tail = None;

        for record in records {
            let Entry::Vacant(entry) = parts.entry(record.insertion_point) else {
                warn!(
                    "Sequence {id} has multiple insertions at point {}, ignoring range {}-{}",
                    record.insertion_point, record.pre_start, record.pre_end
                );
                continue;
            };

            let range = record.pre_alignment_range();
            let start = byte_offset(sequence, range.start).ok_or_else(|| {
                Error::InsertionOutsideSequence {
                    id: id.to_string(),
                    pre_start: record.pre_start,
                    length: sequence.chars().count(),
                }
            })?;
            let end = byte_offset(sequence, range.end).unwrap_or(sequence.len());
            let mut content = sequence[start..end].to_string();

            if self.configuration.is_trimmed() {
                if record.insertion_point == 0 {
                    tail = Some(sequence[end..].to_string());
                }
            } else {
                let width = self.registry.width(record.insertion_point).unwrap_or_default();
                let padding = width.saturating_sub(content.chars().count());
                content.extend(std::iter::repeat_n(gap_character, padding));
            }

            entry.insert(SequencePart::residues(record.insertion_point, content));
        }

        for (insertion_point, width) in self.registry.iter() {
            parts
                .entry(insertion_point)
                .or_insert_with(|| SequencePart::filler(insertion_point, width, gap_character));
        }

        let plan = InsertionPlan {
            parts: parts.into_values().collect(),
        };
        trace!("Built plan for sequence {id} with {} parts", plan.parts.len());
        debug_assert!(plan.is_complete(self.registry));

        Ok(BuiltPlan { plan, tail })
    }
}

/// The byte offset of the character with the given index.
///
/// The index one past the last character maps to the length of the sequence.
fn byte_offset(sequence: &str, index: usize) -> Option<usize> {
    sequence
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(sequence.len()))
        .nth(index)
}

/// The insertion plans of all sequences that occur in both the map and the pre-alignment input.
#[derive(Debug, Default)]
pub struct InsertionPlans {
    plans: FxHashMap<String, InsertionPlan>,
    tails: FxHashMap<String, String>,
}

impl InsertionPlans {
    pub fn build(
        pre_alignment: impl BufRead,
        map: &InsertionMap,
        builder: &SequenceInsertionBuilder,
    ) -> Result<Self> {
        let mut result = Self::default();

        for record in FastaReader::new(pre_alignment) {
            let record = record?;
            let id = record.pre_alignment_id();

            let Some(records) = map.records(id) else {
                trace!("Pre-alignment sequence {id} has no insertions");
                continue;
            };
            if result.plans.contains_key(id) {
                warn!("Pre-alignment sequence {id} occurs multiple times, keeping the first one");
                continue;
            }

            let BuiltPlan { plan, tail } = builder.build(id, &record.sequence, records)?;
            result.plans.insert(id.to_string(), plan);
            if let Some(tail) = tail {
                result.tails.insert(id.to_string(), tail);
            }
        }

        if result.plans.len() < map.sequence_count() {
            debug!(
                "{} sequences of the map have no pre-alignment sequence and will be filled with gaps",
                map.sequence_count() - result.plans.len()
            );
        }

        Ok(result)
    }

    pub fn plan(&self, id: &str) -> Option<&InsertionPlan> {
        self.plans.get(id)
    }

    pub fn tail(&self, id: &str) -> Option<&str> {
        self.tails.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
