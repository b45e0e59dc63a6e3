//! Incremental paging over the catalog.
//!
//! The pager owns no entries. It only remembers how many pages are loaded and
//! how long the list was when it last looked, and derives the visible prefix
//! from that. It is cheap to throw away and rebuild.

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Turns per-frame "scrolled to the end" readings into one signal per arrival.
#[derive(Debug, Clone, Default)]
pub struct ScrollEdge {
    at_end: bool,
}

impl ScrollEdge {
    /// Record the latest reading. True only on a not-at-end → at-end transition.
    pub fn update(&mut self, at_end: bool) -> bool {
        let rising = at_end && !self.at_end;
        self.at_end = at_end;
        rising
    }

    pub fn is_at_end(&self) -> bool {
        self.at_end
    }
}

#[derive(Debug, Clone)]
pub struct Pager {
    page_size: usize,
    loaded_pages: usize,
    known_len: usize,
    edge: ScrollEdge,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            loaded_pages: 1,
            known_len: 0,
            edge: ScrollEdge::default(),
        }
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Result<Self> {
        let mut pager = Self::default();
        pager.reset(page_size)?;
        Ok(pager)
    }

    /// Back to the first page with a new page size. Call after every wholesale reload.
    pub fn reset(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        self.page_size = page_size;
        self.restart();
        Ok(())
    }

    /// Back to the first page, keeping the page size.
    pub fn restart(&mut self) {
        self.loaded_pages = 1;
        self.known_len = 0;
        self.edge = ScrollEdge::default();
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn loaded_pages(&self) -> usize {
        self.loaded_pages
    }

    /// The visible prefix of `entries`.
    pub fn visible_slice<'a, T>(&self, entries: &'a [T]) -> &'a [T] {
        &entries[..self.visible_len(entries.len())]
    }

    /// How many of `len` entries are visible.
    pub fn visible_len(&self, len: usize) -> usize {
        self.limit().min(len)
    }

    /// Record the current list length; [`Pager::on_near_end`] only advances past what it has seen.
    pub fn sync_len(&mut self, len: usize) {
        self.known_len = len;
    }

    /// Whether entries beyond the visible prefix exist, as of the last check.
    pub fn has_more(&self) -> bool {
        self.limit() < self.known_len
    }

    /// Load one more page if the last check saw entries past the visible prefix.
    pub fn on_near_end(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.loaded_pages += 1;
        true
    }

    /// Feed a scroll reading; advances at most once per arrival at the end.
    pub fn on_scroll(&mut self, at_end: bool) -> bool {
        if self.edge.update(at_end) {
            self.on_near_end()
        } else {
            false
        }
    }

    fn limit(&self) -> usize {
        self.loaded_pages.saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_pages_through_sixty_entries() {
        let entries = numbers(60);
        let mut pager = Pager::default();
        pager.reset(25).unwrap();
        pager.sync_len(entries.len());

        assert_eq!(pager.visible_slice(&entries).len(), 25);
        assert!(pager.on_near_end());
        assert_eq!(pager.visible_slice(&entries).len(), 50);
        assert!(pager.on_near_end());
        assert_eq!(pager.visible_slice(&entries).len(), 60);
        assert!(!pager.on_near_end());
        assert_eq!(pager.visible_slice(&entries).len(), 60);
        assert_eq!(pager.loaded_pages(), 3);
    }

    #[test]
    fn test_visible_slice_is_prefix() {
        let entries = numbers(10);
        let pager = Pager::new(4).unwrap();
        assert_eq!(pager.visible_slice(&entries), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_visible_slice_leaves_state_alone() {
        let pager = Pager::new(25).unwrap();
        let before = pager.clone();
        assert_eq!(pager.visible_slice(&numbers(60)).len(), 25);
        assert_eq!(pager.visible_slice(&numbers(60)).len(), 25);
        assert!(!pager.has_more());
        assert_eq!(pager.loaded_pages(), before.loaded_pages());
    }

    #[test]
    fn test_redundant_near_end_does_not_overshoot() {
        let mut pager = Pager::new(25).unwrap();
        pager.sync_len(30);
        assert!(pager.on_near_end());
        for _ in 0..10 {
            assert!(!pager.on_near_end());
        }
        assert_eq!(pager.loaded_pages(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let entries: Vec<usize> = Vec::new();
        let mut pager = Pager::new(25).unwrap();
        pager.sync_len(entries.len());
        assert!(pager.visible_slice(&entries).is_empty());
        assert!(!pager.on_near_end());
        assert!(!pager.on_near_end());

        let grown = numbers(40);
        pager.sync_len(grown.len());
        assert!(pager.on_near_end());
        assert_eq!(pager.visible_slice(&grown).len(), 40);
    }

    #[test]
    fn test_near_end_uses_last_checked_length() {
        let mut pager = Pager::new(25).unwrap();
        // Nothing checked yet.
        assert!(!pager.on_near_end());
        pager.sync_len(26);
        assert!(pager.on_near_end());
    }

    #[test]
    fn test_reset_after_reload() {
        let entries = numbers(100);
        let mut pager = Pager::new(25).unwrap();
        pager.sync_len(entries.len());
        pager.on_near_end();
        pager.on_near_end();
        assert_eq!(pager.visible_slice(&entries).len(), 75);

        let reloaded = numbers(10);
        pager.reset(25).unwrap();
        pager.sync_len(reloaded.len());
        assert_eq!(pager.loaded_pages(), 1);
        assert_eq!(pager.visible_slice(&reloaded).len(), 10);
        assert!(!pager.on_near_end());
    }

    #[test]
    fn test_restart_keeps_page_size() {
        let mut pager = Pager::new(10).unwrap();
        pager.sync_len(50);
        assert!(pager.on_scroll(true));
        assert_eq!(pager.loaded_pages(), 2);

        pager.restart();
        assert_eq!(pager.page_size(), 10);
        assert_eq!(pager.loaded_pages(), 1);
        assert!(!pager.has_more());
        // The edge tracker starts over too.
        pager.sync_len(50);
        assert!(pager.on_scroll(true));
    }

    #[test]
    fn test_shrinking_list_never_slices_out_of_range() {
        let mut pager = Pager::new(5).unwrap();
        pager.sync_len(20);
        pager.on_near_end();
        pager.on_near_end();
        assert_eq!(pager.visible_slice(&numbers(3)).len(), 3);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(Pager::new(0), Err(Error::InvalidPageSize)));

        let mut pager = Pager::new(10).unwrap();
        assert!(pager.reset(0).is_err());
        assert_eq!(pager.page_size(), 10);
    }

    #[test]
    fn test_scroll_edge_fires_once_per_arrival() {
        let mut edge = ScrollEdge::default();
        assert!(!edge.update(false));
        assert!(edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(true));
        assert!(edge.is_at_end());
        assert!(!edge.update(false));
        assert!(edge.update(true));
    }

    #[test]
    fn test_on_scroll_debounces_frames() {
        let entries = numbers(100);
        let mut pager = Pager::new(25).unwrap();
        pager.sync_len(entries.len());

        // Many frames while dwelling at the end advance once.
        let advanced = (0..30).filter(|_| pager.on_scroll(true)).count();
        assert_eq!(advanced, 1);
        assert_eq!(pager.visible_slice(&entries).len(), 50);

        pager.on_scroll(false);
        assert!(pager.on_scroll(true));
        assert_eq!(pager.visible_slice(&entries).len(), 75);
    }
}
