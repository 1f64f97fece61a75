use std::io::{BufRead, Write};

use log::debug;

use crate::{error::Result, io::trim_id, map::MAP_PREAMBLE_LINES};

/// Writes a post-alignment file with an empty record for every id line of the map.
///
/// In trimmed mode, only the insertion at point zero is merged, so there is no aligned sequence
/// to merge into and empty records suffice.
/// Returns the number of records written.
pub fn write_placeholder(map: impl BufRead, mut writer: impl Write) -> Result<usize> {
    let mut count = 0;

    for line in map.lines().skip(MAP_PREAMBLE_LINES) {
        let line = line?;
        if let Some(id) = line.trim_end_matches('\r').strip_prefix('>') {
            writeln!(writer, ">{}", trim_id(id))?;
            writeln!(writer)?;
            count += 1;
        }
    }

    writer.flush()?;
    debug!("Wrote {count} placeholder records");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::write_placeholder;

    #[test]
    fn one_empty_record_per_id_line() {
        let map = ">preamble\n#\n>seq1 \n1I-4>0v1\n>seq2\n2I-3>0v1\n>seq1\n1I-1>5v6\n";
        let mut output = Vec::new();

        let count = write_placeholder(map.as_bytes(), &mut output).unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            ">seq1\n\n>seq2\n\n>seq1\n\n"
        );
    }
}
