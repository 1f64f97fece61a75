use crate::{
    configuration::{MergeConfiguration, OutputMode},
    error::Error,
    map::InsertionMap,
    plan::{InsertionPlans, PartKind, SequenceInsertionBuilder, SequencePart},
    registry::InsertionRegistry,
};

use super::{AlignmentAssembler, OffsetBeyondEnd, SequenceBuffer};

fn prepare(map: &str, pre_alignment: &str, mode: OutputMode) -> (InsertionMap, InsertionPlans) {
    let map = InsertionMap::read(format!("h\nh\n{map}").as_bytes()).unwrap();
    let builder = SequenceInsertionBuilder::new(map.registry(), MergeConfiguration::new(mode));
    let plans = InsertionPlans::build(pre_alignment.as_bytes(), &map, &builder).unwrap();
    (map, plans)
}

#[test]
fn insert_at_offsets() {
    let mut buffer = SequenceBuffer::new("ACGT");

    buffer.insert_at(4, "xx").unwrap();
    buffer.insert_at(0, "y").unwrap();
    buffer.insert_at(3, "").unwrap();

    assert_eq!(buffer.to_string(), "yACGTxx");
    assert_eq!(
        buffer.insert_at(8, "z"),
        Err(OffsetBeyondEnd {
            offset: 8,
            length: 7
        })
    );
}

#[test]
fn descending_application_keeps_offsets_valid() {
    let parts = [
        SequencePart::residues(1, "ab".to_string()),
        SequencePart::residues(3, "cd".to_string()),
    ];

    let mut buffer = SequenceBuffer::new("WXYZ");
    buffer.apply_descending(parts.iter()).unwrap();

    assert_eq!(buffer.to_string(), "WabXYcdZ");
}

#[test]
fn zero_width_insertion_is_a_no_op() {
    let (map, plans) = prepare(">seq1\n3I-2>2v3\n", ">seq1\nACGT\n", OutputMode::Matrix);
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(map.registry(), &plans, &configuration);

    for (id, sequence) in [("seq1", "A-C-GT"), ("other", "--AC")] {
        assert_eq!(assembler.assemble(id, sequence).unwrap().sequence, sequence);
    }
}

#[test]
fn recovers_pre_alignment_residues() {
    let pre_alignment = "GATTACAGATTACA";
    let (map, plans) = prepare(
        ">seq1\n1I-3>0v1\n8I-8>4v5\n10I-14>6v7\n>seq2\n1I-6>4v5\n",
        &format!(">seq1\n{pre_alignment}\n>seq2\n{pre_alignment}\n"),
        OutputMode::Matrix,
    );
    let registry = map.registry();
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(registry, &plans, &configuration);

    let assembled = assembler.assemble("seq1", "ACGTACGT").unwrap();
    let characters = assembled.sequence.chars().collect::<Vec<_>>();
    assert_eq!(
        characters.len(),
        "ACGTACGT".len() + registry.total_width()
    );

    let mut inserted_before = 0;
    for (part, record) in plans
        .plan("seq1")
        .unwrap()
        .parts()
        .iter()
        .zip(map.records("seq1").unwrap())
    {
        assert_eq!(part.kind, PartKind::Residues);
        let offset = part.insertion_point + inserted_before;
        let width = registry.width(part.insertion_point).unwrap();
        let spliced = characters[offset..offset + width].iter().collect::<String>();
        let residues = spliced.trim_end_matches('-');

        assert_eq!(residues, &pre_alignment[record.pre_alignment_range()]);
        inserted_before += width;
    }
}

#[test]
fn splices_registry_widths() {
    let (map, plans) = prepare(
        ">seq1\n1I-3>2v3\n>seq2\n4I-4>2v3\n5I-6>4v5\n",
        ">seq1\nACGTAC\n>seq2\nACGTAC\n",
        OutputMode::Matrix,
    );
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(map.registry(), &plans, &configuration);

    assert_eq!(assembler.assemble("seq1", "WXYZ").unwrap().sequence, "WXACGYZ--");
    assert_eq!(assembler.assemble("seq2", "WXYZ").unwrap().sequence, "WXT--YZAC");
}

#[test]
fn unknown_sequences_are_filled_with_gaps() {
    let (map, plans) = prepare(">seq1\n1I-3>2v3\n", ">seq1\nACGT\n", OutputMode::Matrix);
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(map.registry(), &plans, &configuration);

    let assembled = assembler.assemble("seq9", "WXYZ").unwrap();

    assert_eq!(assembled.sequence, "WX---YZ");
    assert!(assembled.used_fallback);
    assert_eq!(assembled.original_length, 4);
}

#[test]
fn trimmed_mode_only_merges_point_zero() {
    let (map, plans) = prepare(
        ">seq1\n1I-4>0v1\n5I-5>2v3\n",
        ">seq1\nACGTTGCA\n",
        OutputMode::Trimmed,
    );
    let configuration = MergeConfiguration::new(OutputMode::Trimmed);
    let mut assembler = AlignmentAssembler::new(map.registry(), &plans, &configuration);

    assert_eq!(assembler.assemble("seq1", "").unwrap().sequence, "ACGT");
    assert_eq!(assembler.assemble("seq2", "").unwrap().sequence, "----");
}

#[test]
fn rejects_insertion_points_beyond_the_sequence() {
    let (map, plans) = prepare(">seq1\n1I-1>5v6\n", ">seq1\nA\n", OutputMode::Matrix);
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(map.registry(), &plans, &configuration);

    assert!(matches!(
        assembler.assemble("seq1", "ACG"),
        Err(Error::InsertionPointOutOfRange {
            insertion_point: 5,
            length: 3,
            ..
        })
    ));
}

#[test]
fn tracks_maximum_length() {
    let registry = InsertionRegistry::default();
    let plans = InsertionPlans::default();
    let configuration = MergeConfiguration::default();
    let mut assembler = AlignmentAssembler::new(&registry, &plans, &configuration);

    for sequence in ["ACG", "ACGTA", "A"] {
        assembler.assemble("seq", sequence).unwrap();
    }

    assert_eq!(assembler.max_length(), 5);
}
