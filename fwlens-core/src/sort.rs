use std::cmp::Ordering;

/// A per-view sort key enum: a fixed cycle of keys, each with a label, a
/// natural default direction, and a comparator over the view's entity.
///
/// Identifier, name, and position keys default ascending; magnitude,
/// hit-count, and timestamp keys default descending. That coupling is a
/// per-view policy and is pinned down by each implementation's tests.
pub trait SortKey: Copy {
    type Item;

    /// The next key in the cycle, wrapping to the first.
    fn next(self) -> Self;

    fn label(&self) -> &'static str;

    fn default_ascending(&self) -> bool;

    /// Compare two items in this key's ascending order.
    fn compare(&self, a: &Self::Item, b: &Self::Item) -> Ordering;
}

/// Active sort key plus direction for one view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: K,
    pub ascending: bool,
}

impl<K: SortKey> SortState<K> {
    pub fn new(key: K) -> Self {
        Self { ascending: key.default_ascending(), key }
    }

    /// Advance to the next key and reset the direction to its default.
    pub fn cycle_key(&mut self) {
        self.key = self.key.next();
        self.ascending = self.key.default_ascending();
    }

    /// Flip the direction without changing the key.
    pub fn toggle_direction(&mut self) {
        self.ascending = !self.ascending;
    }

    pub fn label(&self) -> &'static str {
        self.key.label()
    }

    /// Comparator with the active direction applied. Ties stay `Equal`, so
    /// a stable sort preserves their prior relative order in either
    /// direction.
    pub fn compare_items(&self, a: &K::Item, b: &K::Item) -> Ordering {
        let ord = self.key.compare(a, b);
        if self.ascending { ord } else { ord.reverse() }
    }

    /// Stable sort of a borrowed view.
    pub fn apply<'a>(&self, items: &mut [&'a K::Item]) {
        items.sort_by(|a, b| self.compare_items(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        hits: u64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum RowKey {
        Name,
        Hits,
    }

    impl SortKey for RowKey {
        type Item = Row;

        fn next(self) -> Self {
            match self {
                Self::Name => Self::Hits,
                Self::Hits => Self::Name,
            }
        }

        fn label(&self) -> &'static str {
            match self {
                Self::Name => "name",
                Self::Hits => "hits",
            }
        }

        fn default_ascending(&self) -> bool {
            matches!(self, Self::Name)
        }

        fn compare(&self, a: &Row, b: &Row) -> Ordering {
            match self {
                Self::Name => a.name.cmp(b.name),
                Self::Hits => a.hits.cmp(&b.hits),
            }
        }
    }

    const ROWS: [Row; 4] = [
        Row { name: "ssh", hits: 40 },
        Row { name: "dns", hits: 200 },
        Row { name: "web", hits: 40 },
        Row { name: "ftp", hits: 7 },
    ];

    #[test]
    fn cycling_resets_direction_to_key_default() {
        let mut sort = SortState::new(RowKey::Name);
        assert!(sort.ascending);
        sort.toggle_direction();
        assert!(!sort.ascending);
        sort.cycle_key();
        assert_eq!(sort.key, RowKey::Hits);
        assert!(!sort.ascending, "hits is a magnitude key, defaults descending");
        sort.cycle_key();
        assert_eq!(sort.key, RowKey::Name);
        assert!(sort.ascending);
    }

    #[test]
    fn toggle_keeps_the_key() {
        let mut sort = SortState::new(RowKey::Hits);
        sort.toggle_direction();
        assert_eq!(sort.key, RowKey::Hits);
        assert!(sort.ascending);
    }

    #[test]
    fn descending_sort_and_tie_stability() {
        let sort = SortState::new(RowKey::Hits);
        let mut view: Vec<&Row> = ROWS.iter().collect();
        sort.apply(&mut view);
        let names: Vec<&str> = view.iter().map(|r| r.name).collect();
        // ssh and web tie on 40 hits and keep their original relative order.
        assert_eq!(names, ["dns", "ssh", "web", "ftp"]);
    }

    #[test]
    fn sorting_sorted_input_is_a_fixed_point() {
        let sort = SortState::new(RowKey::Name);
        let mut view: Vec<&Row> = ROWS.iter().collect();
        sort.apply(&mut view);
        let once: Vec<&str> = view.iter().map(|r| r.name).collect();
        sort.apply(&mut view);
        let twice: Vec<&str> = view.iter().map(|r| r.name).collect();
        assert_eq!(once, twice);
    }
}
