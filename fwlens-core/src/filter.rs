/// An entity that exposes a fixed set of searchable text fields.
///
/// Implementations push references to their designated fields into `out`;
/// the filter matches when any of them contains the query. The field set is
/// fixed per entity type so filtering behaves predictably across views.
pub trait Searchable {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>);
}

/// The committed filter query for one view. The in-flight edit buffer lives
/// in the browser's mode sub-state, not here.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    query: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn set(&mut self, query: String) {
        self.query = query;
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        matches_query(item, &self.query)
    }
}

/// Case-insensitive substring match of `query` against any of the item's
/// searchable fields. No regex, no tokenization. An empty (or whitespace)
/// query matches everything.
pub fn matches_query<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let mut fields = Vec::new();
    item.search_text(&mut fields);
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Filter a slice, preserving original order. Pure and deterministic.
pub fn apply<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    let mut fields: Vec<&str> = Vec::new();
    items
        .iter()
        .filter(|item| {
            fields.clear();
            item.search_text(&mut fields);
            fields.iter().any(|f| f.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct App(&'static str);

    impl Searchable for App {
        fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
            out.push(self.0);
        }
    }

    #[test]
    fn empty_query_returns_all_in_order() {
        let items = [App("web-browsing"), App("ssh"), App("dns")];
        let filtered = apply(&items, "");
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].0, "web-browsing");
        assert_eq!(filtered[2].0, "dns");

        let also = apply(&items, "   ");
        assert_eq!(also.len(), 3);
    }

    #[test]
    fn substring_match_preserves_relative_order() {
        let items = [App("web-browsing"), App("ssh"), App("ssh-tunnel")];
        let filtered = apply(&items, "ssh");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].0, "ssh");
        assert_eq!(filtered[1].0, "ssh-tunnel");
    }

    #[test]
    fn match_is_case_insensitive_both_ways() {
        let items = [App("SSL-VPN"), App("dns")];
        assert_eq!(apply(&items, "ssl").len(), 1);
        assert_eq!(apply(&items, "DNS").len(), 1);
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let items = [App("ssh"), App("dns")];
        assert_eq!(apply(&items, "  ssh  ").len(), 1);
    }

    #[test]
    fn reapplying_is_idempotent() {
        let items = [App("ssh"), App("ssh-tunnel"), App("dns")];
        let once: Vec<&str> = apply(&items, "ssh").iter().map(|a| a.0).collect();
        let twice: Vec<&str> = apply(&items, "ssh").iter().map(|a| a.0).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_state_activity() {
        let mut f = FilterState::new();
        assert!(!f.is_active());
        f.set("trust".into());
        assert!(f.is_active());
        f.clear();
        assert!(!f.is_active());
        f.set("  ".into());
        assert!(!f.is_active());
    }
}
