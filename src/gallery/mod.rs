pub mod controller;
pub mod watch;

use std::collections::HashSet;

use crate::api::PhotoSummary;

pub use controller::{GalleryEvent, LoadOutcome, PaginationController};
pub use watch::{ChannelObserver, VisibilityObserver, Watch};

/// Appends the records of `incoming` whose id is not already present,
/// keeping response order. Repeats inside `incoming` are dropped too.
pub fn merge_unique(existing: &[PhotoSummary], incoming: Vec<PhotoSummary>) -> Vec<PhotoSummary> {
    let mut seen: HashSet<String> = existing.iter().map(|p| p.id.clone()).collect();
    let fresh: Vec<PhotoSummary> = incoming
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    let mut merged = existing.to_vec();
    merged.extend(fresh);
    merged
}

/// Accumulated state of one mounted gallery.
#[derive(Clone, Debug)]
pub struct GalleryState {
    photos: Vec<PhotoSummary>,
    page: u32,
    loading: bool,
    exhausted: bool,
    watch_generation: u64,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    pub fn new() -> Self {
        Self {
            photos: Vec::new(),
            page: 1,
            loading: false,
            exhausted: false,
            watch_generation: 0,
        }
    }

    pub fn photos(&self) -> &[PhotoSummary] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn last(&self) -> Option<&PhotoSummary> {
        self.photos.last()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn watch_generation(&self) -> u64 {
        self.watch_generation
    }

    /// Marks the current page loading. Refused once the listing has ended.
    pub(crate) fn begin_load(&mut self) -> Option<u32> {
        if self.exhausted {
            return None;
        }
        self.loading = true;
        Some(self.page)
    }

    /// Moves to the next page and marks it loading, unless a load is in
    /// flight or the listing has ended.
    pub(crate) fn advance(&mut self) -> Option<u32> {
        if self.loading || self.exhausted {
            return None;
        }
        self.page += 1;
        self.loading = true;
        Some(self.page)
    }

    /// Applies a fetched batch and returns the records that were appended.
    pub(crate) fn apply_batch(&mut self, batch: Vec<PhotoSummary>) -> Vec<PhotoSummary> {
        self.loading = false;
        if batch.is_empty() {
            self.exhausted = true;
            return Vec::new();
        }
        let before = self.photos.len();
        self.photos = merge_unique(&self.photos, batch);
        self.photos[before..].to_vec()
    }

    pub(crate) fn fail_load(&mut self) {
        self.loading = false;
    }

    pub(crate) fn bump_watch(&mut self) -> u64 {
        self.watch_generation += 1;
        self.watch_generation
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::tests::fakes::photos;

    #[test]
    fn merge_keeps_first_page_then_new_items_in_order() {
        let p1 = photos(0..20);
        let p2 = photos(15..35);
        let merged = merge_unique(&merge_unique(&[], p1.clone()), p2.clone());

        assert_eq!(merged.len(), 35);
        assert_eq!(&merged[..20], &p1[..]);
        assert_eq!(&merged[20..], &p2[5..]);
    }

    #[test]
    fn merge_drops_repeats_within_one_batch() {
        let mut batch = photos(0..5);
        batch.extend(photos(3..8));
        let merged = merge_unique(&photos(0..1), batch);
        let ids: Vec<_> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn merge_never_yields_duplicate_ids() {
        let pages = [photos(0..20), photos(10..30), photos(0..40), photos(39..41)];
        let mut merged = Vec::new();
        for page in pages {
            merged = merge_unique(&merged, page);
        }
        let ids: HashSet<_> = merged.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), merged.len());
        assert_eq!(merged.len(), 41);
    }

    #[test]
    fn empty_batch_exhausts_state() {
        let mut state = GalleryState::new();
        state.begin_load();
        let appended = state.apply_batch(Vec::new());
        assert!(appended.is_empty());
        assert!(state.is_exhausted());
        assert!(!state.is_loading());
        assert_eq!(state.advance(), None);
        assert_eq!(state.begin_load(), None);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn apply_batch_returns_only_new_records() {
        let mut state = GalleryState::new();
        state.begin_load();
        state.apply_batch(photos(0..20));
        state.advance();
        let mut batch = photos(15..25);
        batch.extend(photos(22..24));
        let appended = state.apply_batch(batch);

        assert_eq!(appended, photos(20..25));
        assert_eq!(state.photos(), &merge_unique(&photos(0..20), photos(15..25))[..]);
    }

    #[test]
    fn advance_is_refused_while_loading() {
        let mut state = GalleryState::new();
        state.begin_load();
        assert_eq!(state.advance(), None);
        state.apply_batch(photos(0..20));
        assert_eq!(state.advance(), Some(2));
        assert!(state.is_loading());
    }
}
