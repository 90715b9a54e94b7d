use crate::filter::{FilterState, Searchable};
use crate::nav::{NavKey, NavigationState};
use crate::sort::{SortKey, SortState};

/// Ties an entity type to its browsing machinery: searchable fields, a sort
/// key family, and a stable per-item identity used to discard stale detail
/// responses.
pub trait Browsable: Searchable + Clone {
    type Key: SortKey<Item = Self>;

    /// The first key in the sort cycle; the view starts here.
    fn first_key() -> Self::Key;

    /// Stable identity. Not an index: the view is rebuilt wholesale on
    /// every refresh, so identity is the only thing that survives.
    fn identity(&self) -> String;
}

/// What happens to the cursor when a refresh replaces the raw list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Jump back to the top. Used by append-heavy views (logs) where the
    /// old position is meaningless against the new list.
    ResetCursor,
    /// Keep the cursor index, clamped into the new list. The item under
    /// the cursor may change identity if the list reordered; the detail
    /// selection is re-resolved by index, which is intentional.
    PreserveCursor,
}

/// Input mode. While editing the filter, every key routes to the edit
/// buffer instead of navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    FilterEdit { pending: String },
}

/// Extended per-item data fetched on demand for the detail panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detail {
    pub id: String,
    pub fields: Vec<(String, String)>,
}

/// Read-only outbound surface for the rendering layer.
pub struct BrowseSnapshot<'a, T> {
    /// The visible slice of the filtered+sorted view.
    pub window: Vec<&'a T>,
    /// Cursor position within `window`.
    pub cursor_in_window: usize,
    /// Cursor position within the whole filtered+sorted view.
    pub cursor: usize,
    pub expanded: bool,
    pub selected: Option<&'a T>,
    pub loading: bool,
    pub error: Option<&'a str>,
    /// Committed filter query.
    pub query: &'a str,
    /// In-flight filter edit, present only while the filter prompt is open.
    pub pending_query: Option<&'a str>,
    pub sort_label: &'static str,
    pub sort_ascending: bool,
    pub filtered_len: usize,
    pub raw_len: usize,
    pub detail: Option<&'a Detail>,
    pub detail_loading: bool,
}

enum CursorPlacement {
    Top,
    Clamp,
}

/// The generic table-browsing state machine. Every list view (sessions,
/// policies, NAT rules, logs, remote users) is one of these, parameterized
/// by its entity type.
///
/// All mutation is synchronous per event: a key press or a refresh is
/// processed to completion before the next one is accepted. The browser
/// owns its lists exclusively; nothing is shared across views.
pub struct Browser<T: Browsable> {
    raw: Vec<T>,
    /// Indices into `raw`, filtered then sorted. Navigation indexes into
    /// this, never into `raw` directly.
    view: Vec<usize>,
    nav: NavigationState,
    filter: FilterState,
    sort: SortState<T::Key>,
    mode: Mode,
    viewport: usize,
    loading: bool,
    error: Option<String>,
    refresh: RefreshPolicy,
    detail: Option<Detail>,
    detail_loading: Option<String>,
}

impl<T: Browsable> Browser<T> {
    pub fn new(refresh: RefreshPolicy) -> Self {
        Self {
            raw: Vec::new(),
            view: Vec::new(),
            nav: NavigationState::new(),
            filter: FilterState::new(),
            sort: SortState::new(T::first_key()),
            mode: Mode::Normal,
            viewport: 0,
            loading: true,
            error: None,
            refresh,
            detail: None,
            detail_loading: None,
        }
    }

    /// Replace the raw list from a refresh cycle.
    ///
    /// A refresh that failed delivers `Some(err)`: the error is stored for
    /// the renderer and the last-good list is kept untouched (no partial
    /// application). A successful refresh replaces the raw list wholesale
    /// and rebuilds the view; the cursor follows the view's refresh policy.
    pub fn set_items(&mut self, items: Vec<T>, err: Option<String>) {
        self.loading = false;
        if let Some(e) = err {
            self.error = Some(e);
            return;
        }
        self.error = None;
        self.raw = items;
        let placement = match self.refresh {
            RefreshPolicy::ResetCursor => CursorPlacement::Top,
            RefreshPolicy::PreserveCursor => CursorPlacement::Clamp,
        };
        self.rebuild(placement);
    }

    /// Update the visible-row budget after a terminal resize or layout
    /// change. Width is accepted for interface symmetry; only the row
    /// count affects browsing.
    pub fn set_size(&mut self, _width: u16, height: u16) {
        self.viewport = height as usize;
        self.nav.clamp(self.view.len(), self.viewport);
    }

    /// Feed one symbolic key name. Returns false only for keys this view
    /// does not understand; boundary presses are absorbed and return true.
    pub fn handle_key(&mut self, name: &str) -> bool {
        match &mut self.mode {
            Mode::FilterEdit { pending } => match name {
                "enter" => {
                    let query = std::mem::take(pending);
                    self.mode = Mode::Normal;
                    self.filter.set(query);
                    self.rebuild(CursorPlacement::Top);
                    true
                }
                "esc" => {
                    // Abandon the pending edit; the committed query stands.
                    self.mode = Mode::Normal;
                    true
                }
                "backspace" => {
                    pending.pop();
                    true
                }
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if !c.is_control() => {
                            pending.push(c);
                            true
                        }
                        _ => false,
                    }
                }
            },
            Mode::Normal => match name {
                "/" => {
                    self.mode = Mode::FilterEdit { pending: self.filter.query().to_string() };
                    true
                }
                "esc" => {
                    if self.filter.is_active() {
                        self.filter.clear();
                        self.rebuild(CursorPlacement::Top);
                        true
                    } else {
                        false
                    }
                }
                "s" => {
                    self.sort.cycle_key();
                    self.resort();
                    true
                }
                "S" => {
                    self.sort.toggle_direction();
                    self.resort();
                    true
                }
                other => match NavKey::from_name(other) {
                    Some(key) => {
                        let before = self.nav.cursor;
                        self.nav.handle(key, self.view.len(), self.viewport);
                        if self.nav.cursor != before {
                            self.invalidate_detail();
                        }
                        true
                    }
                    None => false,
                },
            },
        }
    }

    pub fn in_filter_edit(&self) -> bool {
        matches!(self.mode, Mode::FilterEdit { .. })
    }

    pub fn is_expanded(&self) -> bool {
        self.nav.expanded
    }

    /// Identity of the item under the cursor, if any.
    pub fn selected_identity(&self) -> Option<String> {
        self.selected().map(Browsable::identity)
    }

    /// Mark a detail fetch in flight for the cursor item and return its
    /// identity for the caller to fetch against. No-op on an empty view.
    pub fn request_detail(&mut self) -> Option<String> {
        let id = self.selected_identity()?;
        self.detail_loading = Some(id.clone());
        Some(id)
    }

    /// Deliver a fetched detail. Discarded silently when the cursor has
    /// moved to a different item since the request (identity comparison,
    /// not sequence numbers).
    pub fn detail_arrived(&mut self, id: &str, detail: Detail) {
        if self.selected_identity().as_deref() == Some(id) {
            self.detail = Some(detail);
        }
        if self.detail_loading.as_deref() == Some(id) {
            self.detail_loading = None;
        }
    }

    /// Deliver a failed detail fetch: clears the loading flag, keeps the
    /// panel on the item's static fields.
    pub fn detail_failed(&mut self, id: &str) {
        if self.detail_loading.as_deref() == Some(id) {
            self.detail_loading = None;
        }
    }

    pub fn snapshot(&self) -> BrowseSnapshot<'_, T> {
        let len = self.view.len();
        let start = self.nav.offset.min(len);
        let end = if self.viewport > 0 { (start + self.viewport).min(len) } else { len };
        let window: Vec<&T> = self.view[start..end].iter().map(|&i| &self.raw[i]).collect();
        let pending_query = match &self.mode {
            Mode::FilterEdit { pending } => Some(pending.as_str()),
            Mode::Normal => None,
        };
        BrowseSnapshot {
            window,
            cursor_in_window: self.nav.cursor.saturating_sub(start),
            cursor: self.nav.cursor,
            expanded: self.nav.expanded,
            selected: self.selected(),
            loading: self.loading,
            error: self.error.as_deref(),
            query: self.filter.query(),
            pending_query,
            sort_label: self.sort.label(),
            sort_ascending: self.sort.ascending,
            filtered_len: len,
            raw_len: self.raw.len(),
            detail: self.detail.as_ref(),
            detail_loading: self.detail_loading.is_some(),
        }
    }

    fn selected(&self) -> Option<&T> {
        self.view.get(self.nav.cursor).map(|&i| &self.raw[i])
    }

    /// Recompute the view: filter in raw order, then stable-sort. Runs on
    /// every raw-list replacement, filter change, or sort change; never
    /// patched incrementally.
    fn rebuild(&mut self, placement: CursorPlacement) {
        self.view = (0..self.raw.len())
            .filter(|&i| self.filter.matches(&self.raw[i]))
            .collect();
        let sort = self.sort;
        let raw = &self.raw;
        self.view.sort_by(|&a, &b| sort.compare_items(&raw[a], &raw[b]));
        match placement {
            CursorPlacement::Top => self.nav.reset(),
            CursorPlacement::Clamp => {}
        }
        self.nav.clamp(self.view.len(), self.viewport);
        self.invalidate_detail();
    }

    /// Re-sort the currently filtered set, never the raw set.
    fn resort(&mut self) {
        let sort = self.sort;
        let raw = &self.raw;
        self.view.sort_by(|&a, &b| sort.compare_items(&raw[a], &raw[b]));
        self.nav.clamp(self.view.len(), self.viewport);
        self.invalidate_detail();
    }

    /// The detail selection is an index, not a pointer: whenever the view
    /// is rebuilt or the cursor moves, any fetched payload is dropped and
    /// the selection re-resolves to whatever now sits under the cursor.
    fn invalidate_detail(&mut self) {
        self.detail = None;
        self.detail_loading = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[derive(Clone, Debug, PartialEq)]
    struct App {
        name: &'static str,
        hits: u64,
    }

    fn app(name: &'static str, hits: u64) -> App {
        App { name, hits }
    }

    impl Searchable for App {
        fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
            out.push(self.name);
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum AppKey {
        Name,
        Hits,
    }

    impl SortKey for AppKey {
        type Item = App;

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

        fn compare(&self, a: &App, b: &App) -> Ordering {
            match self {
                Self::Name => a.name.cmp(b.name),
                Self::Hits => a.hits.cmp(&b.hits),
            }
        }
    }

    impl Browsable for App {
        type Key = AppKey;

        fn first_key() -> AppKey {
            AppKey::Name
        }

        fn identity(&self) -> String {
            self.name.to_string()
        }
    }

    fn five_apps() -> Vec<App> {
        vec![app("dns", 10), app("ftp", 20), app("ntp", 5), app("ssh", 40), app("web", 30)]
    }

    fn browser_with(items: Vec<App>, policy: RefreshPolicy) -> Browser<App> {
        let mut b = Browser::new(policy);
        b.set_size(80, 10);
        b.set_items(items, None);
        b
    }

    #[test]
    fn starts_loading_until_first_refresh() {
        let b: Browser<App> = Browser::new(RefreshPolicy::PreserveCursor);
        assert!(b.snapshot().loading);
        let b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        assert!(!b.snapshot().loading);
    }

    #[test]
    fn shrink_refresh_clamps_cursor_to_new_last() {
        // 5 items, cursor on the last; a refresh with 2 items pulls the
        // cursor to 1 and the window back to the top.
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("G");
        assert_eq!(b.snapshot().cursor, 4);
        b.set_items(vec![app("dns", 10), app("ftp", 20)], None);
        let snap = b.snapshot();
        assert_eq!(snap.cursor, 1);
        assert_eq!(snap.cursor_in_window, 1);
        assert_eq!(snap.window.len(), 2);
    }

    #[test]
    fn reset_policy_jumps_to_top_on_refresh() {
        let mut b = browser_with(five_apps(), RefreshPolicy::ResetCursor);
        b.handle_key("G");
        b.set_items(five_apps(), None);
        assert_eq!(b.snapshot().cursor, 0);
    }

    #[test]
    fn preserve_policy_keeps_cursor_index_across_refresh() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("j");
        b.handle_key("j");
        b.set_items(five_apps(), None);
        assert_eq!(b.snapshot().cursor, 2);
    }

    #[test]
    fn failed_refresh_keeps_last_good_view() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("j");
        b.set_items(Vec::new(), Some("timeout talking to appliance".into()));
        let snap = b.snapshot();
        assert_eq!(snap.error, Some("timeout talking to appliance"));
        assert_eq!(snap.raw_len, 5, "error must not clear displayed data");
        assert_eq!(snap.cursor, 1);
        // The next good refresh clears the error.
        b.set_items(five_apps(), None);
        assert_eq!(b.snapshot().error, None);
    }

    #[test]
    fn filter_commit_resets_cursor_and_esc_clears() {
        let mut b = browser_with(vec![app("untrust-out", 1), app("dmz-in", 2), app("lan", 3)],
            RefreshPolicy::PreserveCursor);
        b.handle_key("G");
        assert!(b.handle_key("/"));
        for c in ["t", "r", "u", "s", "t"] {
            assert!(b.handle_key(c));
        }
        assert_eq!(b.snapshot().pending_query, Some("trust"));
        b.handle_key("enter");
        let snap = b.snapshot();
        assert_eq!(snap.filtered_len, 1);
        assert_eq!(snap.cursor, 0);
        assert_eq!(snap.query, "trust");
        assert_eq!(snap.pending_query, None);
        // esc outside the prompt clears the committed query.
        assert!(b.handle_key("esc"));
        let snap = b.snapshot();
        assert_eq!(snap.filtered_len, 3);
        assert_eq!(snap.cursor, 0);
        assert_eq!(snap.query, "");
    }

    #[test]
    fn filter_edit_routes_navigation_keys_to_the_buffer() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("/");
        // "j" and "G" are text while the prompt is open.
        b.handle_key("j");
        b.handle_key("G");
        assert_eq!(b.snapshot().pending_query, Some("jG"));
        assert_eq!(b.snapshot().cursor, 0);
        b.handle_key("backspace");
        assert_eq!(b.snapshot().pending_query, Some("j"));
    }

    #[test]
    fn filter_edit_esc_abandons_pending_keeps_committed() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("/");
        for c in ["s", "s", "h"] {
            b.handle_key(c);
        }
        b.handle_key("enter");
        assert_eq!(b.snapshot().filtered_len, 1);
        b.handle_key("/");
        b.handle_key("x");
        b.handle_key("esc");
        let snap = b.snapshot();
        assert_eq!(snap.query, "ssh");
        assert_eq!(snap.filtered_len, 1);
        assert_eq!(snap.pending_query, None);
    }

    #[test]
    fn sort_cycle_reorders_the_filtered_set_only() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        b.handle_key("/");
        for c in ["s", "h"] {
            b.handle_key(c);
        }
        b.handle_key("enter");
        assert_eq!(b.snapshot().filtered_len, 1);
        b.handle_key("s");
        let snap = b.snapshot();
        assert_eq!(snap.sort_label, "hits");
        assert!(!snap.sort_ascending);
        assert_eq!(snap.filtered_len, 1, "re-sort applies to the filtered set");
    }

    #[test]
    fn sort_direction_toggle_flips_window_order() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        let first = b.snapshot().window[0].name;
        assert_eq!(first, "dns");
        b.handle_key("S");
        assert_eq!(b.snapshot().window[0].name, "web");
        assert!(!b.snapshot().sort_ascending);
    }

    #[test]
    fn window_tracks_offset_and_viewport() {
        let mut b = Browser::new(RefreshPolicy::PreserveCursor);
        b.set_size(80, 3);
        let items: Vec<App> = vec![
            app("a", 0), app("b", 0), app("c", 0), app("d", 0),
            app("e", 0), app("f", 0), app("g", 0),
        ];
        b.set_items(items, None);
        for _ in 0..4 {
            b.handle_key("j");
        }
        let snap = b.snapshot();
        assert_eq!(snap.cursor, 4);
        assert_eq!(snap.window.len(), 3);
        assert_eq!(snap.window[0].name, "c");
        assert_eq!(snap.cursor_in_window, 2);
        assert_eq!(snap.selected.map(|a| a.name), Some("e"));
    }

    #[test]
    fn stale_detail_response_is_discarded_by_identity() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        let id = b.request_detail().unwrap();
        assert_eq!(id, "dns");
        b.handle_key("j");
        b.detail_arrived("dns", Detail { id: "dns".into(), fields: vec![] });
        let snap = b.snapshot();
        assert!(snap.detail.is_none(), "cursor moved, response is stale");
        assert!(!snap.detail_loading);
    }

    #[test]
    fn detail_lands_when_cursor_unmoved() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        let id = b.request_detail().unwrap();
        assert!(b.snapshot().detail_loading);
        b.detail_arrived(&id, Detail {
            id: id.clone(),
            fields: vec![("category".into(), "networking".into())],
        });
        let snap = b.snapshot();
        assert_eq!(snap.detail.map(|d| d.id.as_str()), Some("dns"));
        assert!(!snap.detail_loading);
    }

    #[test]
    fn detail_dropped_on_refresh_and_failure_clears_loading() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        let id = b.request_detail().unwrap();
        b.detail_arrived(&id, Detail { id: id.clone(), fields: vec![] });
        assert!(b.snapshot().detail.is_some());
        b.set_items(five_apps(), None);
        assert!(b.snapshot().detail.is_none(), "rebuild re-resolves selection by index");

        let id = b.request_detail().unwrap();
        b.detail_failed(&id);
        assert!(!b.snapshot().detail_loading);
    }

    #[test]
    fn empty_view_has_no_selection_and_absorbs_keys() {
        let mut b = browser_with(Vec::new(), RefreshPolicy::PreserveCursor);
        assert!(b.handle_key("j"));
        assert!(b.handle_key("G"));
        let snap = b.snapshot();
        assert_eq!(snap.cursor, 0);
        assert!(snap.selected.is_none());
        assert!(snap.window.is_empty());
        assert!(b.request_detail().is_none());
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let mut b = browser_with(five_apps(), RefreshPolicy::PreserveCursor);
        assert!(!b.handle_key("q"));
        assert!(!b.handle_key("f5"));
    }
}
