/// Page step when the viewport has not been sized yet.
const PAGE_FALLBACK: usize = 10;

/// Navigation keys understood by every table view, decoded from the
/// symbolic key names the terminal layer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Home,
    End,
    PageDown,
    PageUp,
    ToggleExpand,
}

impl NavKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "j" | "down" => Some(Self::Down),
            "k" | "up" => Some(Self::Up),
            "g" | "home" => Some(Self::Home),
            "G" | "end" => Some(Self::End),
            "ctrl+d" | "page-down" => Some(Self::PageDown),
            "ctrl+u" | "page-up" => Some(Self::PageUp),
            "enter" => Some(Self::ToggleExpand),
            _ => None,
        }
    }
}

/// Cursor and scroll window over a list of a given length.
///
/// The window invariants are re-established after every mutation:
/// with a non-empty list, `offset <= cursor < item_count` and the cursor
/// stays inside `[offset, offset + viewport)`. All arithmetic clamps;
/// nothing here rejects input or panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub cursor: usize,
    pub offset: usize,
    pub expanded: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a navigation key. Returns true when the key was consumed,
    /// which includes presses at a boundary (they are absorbed, never
    /// propagated to an outer handler).
    pub fn handle(&mut self, key: NavKey, item_count: usize, viewport: usize) -> bool {
        if item_count == 0 {
            self.cursor = 0;
            self.offset = 0;
            if key == NavKey::ToggleExpand {
                self.expanded = false;
            }
            return true;
        }
        let last = item_count - 1;
        match key {
            NavKey::Down => self.cursor = (self.cursor + 1).min(last),
            NavKey::Up => self.cursor = self.cursor.saturating_sub(1),
            NavKey::Home => {
                self.cursor = 0;
                self.offset = 0;
            }
            NavKey::End => self.cursor = last,
            NavKey::PageDown => self.cursor = (self.cursor + page_step(viewport)).min(last),
            NavKey::PageUp => self.cursor = self.cursor.saturating_sub(page_step(viewport)),
            NavKey::ToggleExpand => self.expanded = !self.expanded,
        }
        self.ensure_visible(viewport);
        true
    }

    /// Clamp the cursor into `[0, item_count)` after an item-count or
    /// viewport change, then pull the window back over it.
    pub fn clamp(&mut self, item_count: usize, viewport: usize) {
        if item_count == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        if self.cursor >= item_count {
            self.cursor = item_count - 1;
        }
        if self.offset > self.cursor {
            self.offset = self.cursor;
        }
        self.ensure_visible(viewport);
    }

    /// Scroll the window so the cursor is inside `[offset, offset + viewport)`.
    pub fn ensure_visible(&mut self, viewport: usize) {
        if viewport == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + viewport {
            self.offset = self.cursor - viewport + 1;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }
}

fn page_step(viewport: usize) -> usize {
    if viewport > 0 { viewport } else { PAGE_FALLBACK }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(nav: &NavigationState, item_count: usize, viewport: usize) {
        if item_count == 0 {
            assert_eq!(nav.cursor, 0);
            assert_eq!(nav.offset, 0);
            return;
        }
        assert!(nav.offset <= nav.cursor, "offset {} > cursor {}", nav.offset, nav.cursor);
        assert!(nav.cursor < item_count, "cursor {} >= count {}", nav.cursor, item_count);
        if viewport > 0 {
            assert!(
                nav.cursor < nav.offset + viewport,
                "cursor {} outside window [{}, {})",
                nav.cursor,
                nav.offset,
                nav.offset + viewport
            );
        }
    }

    #[test]
    fn key_names_decode() {
        assert_eq!(NavKey::from_name("j"), Some(NavKey::Down));
        assert_eq!(NavKey::from_name("down"), Some(NavKey::Down));
        assert_eq!(NavKey::from_name("G"), Some(NavKey::End));
        assert_eq!(NavKey::from_name("ctrl+u"), Some(NavKey::PageUp));
        assert_eq!(NavKey::from_name("x"), None);
    }

    #[test]
    fn down_clamps_at_last_item_and_is_still_consumed() {
        let mut nav = NavigationState::new();
        for _ in 0..10 {
            assert!(nav.handle(NavKey::Down, 3, 5));
        }
        assert_eq!(nav.cursor, 2);
        assert_invariants(&nav, 3, 5);
    }

    #[test]
    fn up_clamps_at_zero() {
        let mut nav = NavigationState::new();
        assert!(nav.handle(NavKey::Up, 3, 5));
        assert_eq!(nav.cursor, 0);
    }

    #[test]
    fn end_then_home_round_trip() {
        let mut nav = NavigationState::new();
        nav.handle(NavKey::End, 40, 5);
        assert_eq!(nav.cursor, 39);
        assert_eq!(nav.offset, 35);
        nav.handle(NavKey::Home, 40, 5);
        assert_eq!(nav.cursor, 0);
        assert_eq!(nav.offset, 0);
    }

    #[test]
    fn page_down_moves_by_viewport_and_scrolls() {
        // viewport 5, 20 items, page-down from the top: cursor lands on 5
        // and the window slides to keep it visible (offset 1).
        let mut nav = NavigationState::new();
        nav.handle(NavKey::PageDown, 20, 5);
        assert_eq!(nav.cursor, 5);
        assert_eq!(nav.offset, 1);
        assert_invariants(&nav, 20, 5);
    }

    #[test]
    fn page_keys_fall_back_to_ten_rows_before_sizing() {
        let mut nav = NavigationState::new();
        nav.handle(NavKey::PageDown, 30, 0);
        assert_eq!(nav.cursor, 10);
        nav.handle(NavKey::PageUp, 30, 0);
        assert_eq!(nav.cursor, 0);
    }

    #[test]
    fn clamp_after_shrink_keeps_cursor_on_last_item() {
        let mut nav = NavigationState::new();
        nav.handle(NavKey::End, 10, 5);
        assert_eq!(nav.cursor, 9);
        nav.clamp(4, 5);
        assert_eq!(nav.cursor, 3);
        assert_invariants(&nav, 4, 5);
    }

    #[test]
    fn clamp_to_empty_zeroes_both() {
        let mut nav = NavigationState::new();
        nav.handle(NavKey::End, 10, 5);
        nav.clamp(0, 5);
        assert_eq!(nav.cursor, 0);
        assert_eq!(nav.offset, 0);
    }

    #[test]
    fn ensure_visible_pulls_window_both_ways() {
        let mut nav = NavigationState { cursor: 2, offset: 6, expanded: false };
        nav.ensure_visible(5);
        assert_eq!(nav.offset, 2);

        let mut nav = NavigationState { cursor: 12, offset: 0, expanded: false };
        nav.ensure_visible(5);
        assert_eq!(nav.offset, 8);
        assert_invariants(&nav, 20, 5);
    }

    #[test]
    fn toggle_expand_flips_and_empty_list_collapses() {
        let mut nav = NavigationState::new();
        nav.handle(NavKey::ToggleExpand, 3, 5);
        assert!(nav.expanded);
        nav.handle(NavKey::ToggleExpand, 3, 5);
        assert!(!nav.expanded);
        nav.expanded = true;
        nav.handle(NavKey::ToggleExpand, 0, 5);
        assert!(!nav.expanded);
    }

    #[test]
    fn invariants_hold_over_a_mixed_key_sequence() {
        let keys = [
            NavKey::Down,
            NavKey::PageDown,
            NavKey::Down,
            NavKey::End,
            NavKey::Up,
            NavKey::PageUp,
            NavKey::PageUp,
            NavKey::Down,
            NavKey::Home,
            NavKey::PageDown,
        ];
        for count in [0usize, 1, 4, 7, 23] {
            for viewport in [1usize, 3, 5, 8] {
                let mut nav = NavigationState::new();
                for key in keys {
                    nav.handle(key, count, viewport);
                    assert_invariants(&nav, count, viewport);
                }
            }
        }
    }
}
