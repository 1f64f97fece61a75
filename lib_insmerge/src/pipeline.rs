//! The merge runs strictly forward:
//! the map is parsed and its registry frozen, plans are built from the pre-alignment input,
//! and then the post-alignment input is streamed through assembly into an [`OutputFormatter`].

use std::io::BufRead;

use log::{debug, info};

use crate::{
    assembly::AlignmentAssembler,
    configuration::MergeConfiguration,
    error::Result,
    fasta::FastaReader,
    map::InsertionMap,
    output::OutputFormatter,
    plan::{InsertionPlans, SequenceInsertionBuilder},
    registry::InsertionRegistry,
};


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStatistics {
    /// The number of post-alignment sequences written.
    pub sequences: usize,
    /// The number of post-alignment sequences without insertion plan.
    pub fallback_sequences: usize,
    /// The length of the longest post-alignment sequence before merging.
    pub max_length: usize,
}

/// The frozen registry and all insertion plans, ready to be merged into post-alignment sequences.
#[derive(Debug)]
pub struct PreparedMerge {
    configuration: MergeConfiguration,
    map: InsertionMap,
    plans: InsertionPlans,
}

impl PreparedMerge {
    pub fn prepare(
        pre_alignment: impl BufRead,
        map: impl BufRead,
        configuration: MergeConfiguration,
    ) -> Result<Self> {
        info!("Parsing insertion map");
        let map = InsertionMap::read(map)?;
        info!(
            "Found {} insertions of {} sequences at {} insertion points",
            map.record_count(),
            map.sequence_count(),
            map.registry().len()
        );

        info!("Building insertion plans");
        let builder = SequenceInsertionBuilder::new(map.registry(), configuration.clone());
        let plans = InsertionPlans::build(pre_alignment, &map, &builder)?;
        debug!("Built {} insertion plans", plans.len());

        Ok(Self {
            configuration,
            map,
            plans,
        })
    }

    pub fn registry(&self) -> &InsertionRegistry {
        self.map.registry()
    }

    pub fn plans(&self) -> &InsertionPlans {
        &self.plans
    }

    /// Merges the plans into each post-alignment sequence in input order and passes the results to the formatter.
    pub fn stream(
        self,
        post_alignment: impl BufRead,
        formatter: &mut impl OutputFormatter,
    ) -> Result<MergeStatistics> {
        info!("Merging insertions into post-alignment sequences");
        let mut assembler =
            AlignmentAssembler::new(self.map.registry(), &self.plans, &self.configuration);
        let mut statistics = MergeStatistics::default();

        for record in FastaReader::new(post_alignment) {
            let record = record?;
            let id = record.post_alignment_id();
            let assembled = assembler.assemble(id, &record.sequence)?;

            formatter.write_sequence(&assembled, self.plans.tail(id))?;
            statistics.sequences += 1;
            if assembled.used_fallback {
                statistics.fallback_sequences += 1;
            }
        }

        statistics.max_length = assembler.max_length();
        formatter.finish(self.map.registry(), statistics.max_length)?;

        info!(
            "Merged {} sequences, {} of which had no insertion plan",
            statistics.sequences, statistics.fallback_sequences
        );
        Ok(statistics)
    }
}

/// Runs a complete merge.
pub fn merge(
    pre_alignment: impl BufRead,
    map: impl BufRead,
    post_alignment: impl BufRead,
    configuration: MergeConfiguration,
    formatter: &mut impl OutputFormatter,
) -> Result<MergeStatistics> {
    PreparedMerge::prepare(pre_alignment, map, configuration)?.stream(post_alignment, formatter)
}
