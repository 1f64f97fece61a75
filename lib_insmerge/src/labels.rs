use crate::registry::InsertionRegistry;


/// Spreadsheet-style column suffixes: `A, B, ..., Z, AA, AB, ..., ZZ, AAA, ...`.
#[derive(Debug, Clone)]
pub struct SuffixLabels {
    next: Vec<u8>,
}

impl SuffixLabels {
    pub fn new() -> Self {
        Self {
            next: vec![b'A'],
        }
    }

    fn advance(&mut self) {
        for letter in self.next.iter_mut().rev() {
            if *letter == b'Z' {
                *letter = b'A';
            } else {
                *letter += 1;
                return;
            }
        }

        // The carry went past the leftmost letter.
        self.next.insert(0, b'A');
    }
}

impl Default for SuffixLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SuffixLabels {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.next.iter().copied().map(char::from).collect();
        self.advance();
        Some(label)
    }
}

/// Derives the column labels of the matrix output.
///
/// Every position from zero up to and including `max_length` gets a bare numeric label.
/// A position that is an insertion point of width `w` is followed by `w` labels
/// consisting of the position and a [suffix](SuffixLabels).
pub struct ColumnLabelGenerator<'registry> {
    registry: &'registry InsertionRegistry,
    max_length: usize,
}

impl<'registry> ColumnLabelGenerator<'registry> {
    pub fn new(registry: &'registry InsertionRegistry, max_length: usize) -> Self {
        Self {
            registry,
            max_length,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        (0..=self.max_length).flat_map(move |position| {
            let width = self.registry.width(position).unwrap_or_default();
            std::iter::once(position.to_string()).chain(
                SuffixLabels::new()
                    .take(width)
                    .map(move |suffix| format!("{position}{suffix}")),
            )
        })
    }
}
