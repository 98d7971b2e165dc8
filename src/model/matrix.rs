use std::collections::{BTreeMap, BTreeSet};

/// Counts of `from -> to` transitions.
///
/// Both levels are `BTreeMap`s so iteration is always lexicographic and
/// output never depends on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionMatrix {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TransitionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, from: &str, to: &str) {
        self.add(from, to, 1);
    }

    pub fn add(&mut self, from: &str, to: &str, n: u64) {
        *self
            .counts
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_default() += n;
    }

    /// Count for a cell, 0 when absent.
    pub fn get(&self, from: &str, to: &str) -> u64 {
        self.row(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Recorded destinations of one source, sorted.
    pub fn row(&self, from: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(from)
    }

    /// Every recorded cell as `(from, to, count)`, sorted by `from` then `to`.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.counts.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, n)| (from.as_str(), to.as_str(), *n))
        })
    }

    /// Union of source and destination names, sorted.
    pub fn names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for (from, row) in &self.counts {
            names.insert(from.as_str());
            names.extend(row.keys().map(String::as_str));
        }
        names
    }

    pub fn total(&self) -> u64 {
        self.cells().map(|(_, _, n)| n).sum()
    }
}

#[cfg(test)]
impl<'a> FromIterator<(&'a str, &'a str, u64)> for TransitionMatrix {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str, u64)>>(iter: I) -> Self {
        let mut m = TransitionMatrix::new();
        for (from, to, n) in iter {
            m.add(from, to, n);
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_are_the_sorted_union_of_both_axes() {
        let m: TransitionMatrix = [("start", "b", 1), ("b", "a", 2), ("a", "stop", 1)]
            .into_iter()
            .collect();
        assert_eq!(
            m.names().into_iter().collect::<Vec<_>>(),
            vec!["a", "b", "start", "stop"]
        );
    }

    #[test]
    fn absent_cells_read_as_zero() {
        let mut m = TransitionMatrix::new();
        m.increment("a", "b");
        m.increment("a", "b");
        m.increment("a", "c");

        assert_eq!(m.get("a", "b"), 2);
        assert_eq!(m.get("b", "a"), 0);
        assert_eq!(m.get("zzz", "a"), 0);
        assert_eq!(m.row("a").map(|r| r.len()), Some(2));
        assert_eq!(m.row("b"), None);
        assert_eq!(m.total(), 3);
        assert_eq!(
            m.cells().collect::<Vec<_>>(),
            vec![("a", "b", 2), ("a", "c", 1)]
        );
    }
}
