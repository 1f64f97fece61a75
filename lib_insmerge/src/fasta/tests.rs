use crate::error::Error;

use super::{FastaReader, FastaRecord};

fn read_all(input: &str) -> Vec<FastaRecord> {
    FastaReader::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn record(header: &str, sequence: &str) -> FastaRecord {
    FastaRecord {
        header: header.to_string(),
        sequence: sequence.to_string(),
    }
}

#[test]
fn concatenates_wrapped_sequences() {
    let records = read_all(">seq1\nACGT\nTT\n>seq2\r\nGG\r\nCC\r\n");

    assert_eq!(records, vec![record("seq1", "ACGTTT"), record("seq2", "GGCC")]);
}

#[test]
fn handles_missing_trailing_newline_and_empty_records() {
    let records = read_all("\n>seq1\n\n>seq2\n>seq3");

    assert_eq!(
        records,
        vec![record("seq1", ""), record("seq2", ""), record("seq3", "")]
    );
}

#[test]
fn keeps_record_start_character_inside_lines() {
    let records = read_all(">a>b\nAC>GT\n");

    assert_eq!(records, vec![record("a>b", "AC>GT")]);
}

#[test]
fn empty_input_has_no_records() {
    assert!(read_all("").is_empty());
    assert!(read_all("\n  \n").is_empty());
}

#[test]
fn rejects_content_before_first_header() {
    let mut reader = FastaReader::new("ACGT\n>seq1\nAC\n".as_bytes());

    assert!(matches!(
        reader.next(),
        Some(Err(Error::FastaContentBeforeHeader { character: 'A' }))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn pre_alignment_id_trims_trailing_blanks() {
    assert_eq!(record("seq1 \t ", "").pre_alignment_id(), "seq1");
    assert_eq!(record("seq 1", "").pre_alignment_id(), "seq 1");
}

#[test]
fn post_alignment_id_of_short_header() {
    assert_eq!(record("seq1|IGHV1", "").post_alignment_id(), "seq1|IGHV1");
    assert_eq!(record("seq1\t", "").post_alignment_id(), "seq1");
}

#[test]
fn post_alignment_id_after_separator() {
    assert_eq!(
        record("reference_7|query_sequence_1 ", "").post_alignment_id(),
        "query_sequence_1"
    );
}

#[test]
fn post_alignment_id_before_gene_annotation() {
    assert_eq!(
        record("query_sequence_1|IGHV3-23*01|Homo sapiens", "").post_alignment_id(),
        "query_sequence_1"
    );
    assert_eq!(
        record("query_sequence_2|TCRBV|x", "").post_alignment_id(),
        "query_sequence_2"
    );
}

#[test]
fn post_alignment_id_of_long_header_without_separator() {
    assert_eq!(
        record("query_sequence_1  ", "").post_alignment_id(),
        "query_sequence_1"
    );
}

#[test]
fn record_start_must_begin_a_line() {
    let mut reader = FastaReader::new("  >seq1\nAC\n".as_bytes());

    assert!(matches!(
        reader.next(),
        Some(Err(Error::FastaContentBeforeHeader { character: '>' }))
    ));
    assert!(reader.next().is_none());
}
