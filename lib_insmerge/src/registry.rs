use std::collections::BTreeMap;

use log::trace;


/// Collects the maximum insertion width per insertion point while the map is parsed.
///
/// Widths only ever grow. Call [`freeze`](Self::freeze) to obtain the read-only [`InsertionRegistry`].
#[derive(Debug, Default)]
pub struct InsertionRegistryBuilder {
    widths: BTreeMap<usize, usize>,
}

/// The maximum insertion width required at each insertion point across all sequences.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InsertionRegistry {
    widths: BTreeMap<usize, usize>,
}

impl InsertionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_width(&mut self, insertion_point: usize, width: usize) {
        let current = self.widths.entry(insertion_point).or_default();
        if *current < width {
            trace!("Widening insertion point {insertion_point} from {current} to {width}");
            *current = width;
        }
    }

    pub fn freeze(self) -> InsertionRegistry {
        InsertionRegistry {
            widths: self.widths,
        }
    }
}

impl InsertionRegistry {
    /// Iterates over `(insertion_point, width)` pairs in ascending order of insertion points.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        self.widths
            .iter()
            .map(|(&insertion_point, &width)| (insertion_point, width))
    }

    pub fn width(&self, insertion_point: usize) -> Option<usize> {
        self.widths.get(&insertion_point).copied()
    }

    pub fn contains(&self, insertion_point: usize) -> bool {
        self.widths.contains_key(&insertion_point)
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// The number of characters inserted into a sequence when all insertion points are applied.
    ///
    /// Saturates at `usize::MAX`.
    pub fn total_width(&self) -> usize {
        self.widths.values().fold(0, |total, width| total.saturating_add(*width))
    }
}

impl FromIterator<(usize, usize)> for InsertionRegistry {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        let mut builder = InsertionRegistryBuilder::new();
        for (insertion_point, width) in iter {
            builder.record_width(insertion_point, width);
        }
        builder.freeze()
    }
}
