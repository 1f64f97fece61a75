use log::trace;

use crate::{
    configuration::MergeConfiguration,
    error::{Error, Result},
    plan::{InsertionPlan, InsertionPlans, SequencePart},
    registry::InsertionRegistry,
};

#[cfg(test)]
mod tests;

/// A sequence that grows by inserting content at character offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceBuffer {
    characters: Vec<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetBeyondEnd {
    pub offset: usize,
    pub length: usize,
}

impl SequenceBuffer {
    pub fn new(sequence: &str) -> Self {
        Self {
            characters: sequence.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Inserts `content` such that its first character ends up at `offset`.
    pub fn insert_at(
        &mut self,
        offset: usize,
        content: &str,
    ) -> std::result::Result<(), OffsetBeyondEnd> {
        if offset > self.characters.len() {
            return Err(OffsetBeyondEnd {
                offset,
                length: self.characters.len(),
            });
        }

        self.characters.splice(offset..offset, content.chars());
        Ok(())
    }

    /// Inserts all parts at the offset given by their insertion point.
    ///
    /// The insertion points refer to the sequence before any insertion.
    /// Parts are applied from the highest insertion point down to the lowest,
    /// so that every offset still to be applied lies before all content inserted so far.
    /// The parts must be sorted by increasing insertion point.
    pub fn apply_descending<'part>(
        &mut self,
        parts: impl DoubleEndedIterator<Item = &'part SequencePart>,
    ) -> std::result::Result<(), OffsetBeyondEnd> {
        for part in parts.rev() {
            self.insert_at(part.insertion_point, &part.content)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for SequenceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.characters
            .iter()
            .try_for_each(|character| write!(f, "{character}"))
    }
}

/// A post-alignment sequence with its insertions merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSequence {
    pub id: String,
    pub sequence: String,
    /// The length of the post-alignment sequence before merging.
    pub original_length: usize,
    /// True if the sequence had no plan and was filled with gaps at every insertion point.
    pub used_fallback: bool,
}

pub struct AlignmentAssembler<'plans> {
    plans: &'plans InsertionPlans,
    fallback: InsertionPlan,
    trimmed: bool,
    max_length: usize,
}

impl<'plans> AlignmentAssembler<'plans> {
    pub fn new(
        registry: &InsertionRegistry,
        plans: &'plans InsertionPlans,
        configuration: &MergeConfiguration,
    ) -> Self {
        Self {
            plans,
            fallback: InsertionPlan::filler(registry, configuration.gap_character),
            trimmed: configuration.is_trimmed(),
            max_length: 0,
        }
    }

    /// Merges the plan of `id` into its post-alignment sequence.
    ///
    /// Sequences without a plan receive gaps at every insertion point.
    /// In trimmed mode, only the insertion at point zero is merged.
    pub fn assemble(&mut self, id: &str, post_alignment: &str) -> Result<AssembledSequence> {
        let mut buffer = SequenceBuffer::new(post_alignment);
        let original_length = buffer.len();
        self.max_length = self.max_length.max(original_length);

        let (plan, used_fallback) = match self.plans.plan(id) {
            Some(plan) => (plan, false),
            None => {
                trace!("Sequence {id} has no insertion plan, filling with gaps");
                (&self.fallback, true)
            }
        };

        let trimmed = self.trimmed;
        buffer
            .apply_descending(
                plan.parts()
                    .iter()
                    .filter(|part| !trimmed || part.insertion_point == 0),
            )
            .map_err(|OffsetBeyondEnd { offset, .. }| Error::InsertionPointOutOfRange {
                id: id.to_string(),
                insertion_point: offset,
                length: original_length,
            })?;

        Ok(AssembledSequence {
            id: id.to_string(),
            sequence: buffer.to_string(),
            original_length,
            used_fallback,
        })
    }

    /// The length of the longest post-alignment sequence assembled so far, before merging.
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}
