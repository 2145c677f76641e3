use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use super::watch::{VisibilityObserver, Watch};
use super::GalleryState;
use crate::api::{PhotoSource, PhotoSummary, PAGE_SIZE};
use crate::lifetime::{AliveToken, Mount};

/// Re-render notifications emitted while a gallery loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryEvent {
    LoadStarted {
        page: u32,
    },
    PageMerged {
        page: u32,
        appended: Vec<PhotoSummary>,
    },
    Exhausted {
        page: u32,
    },
    LoadFailed {
        page: u32,
    },
}

/// What a single page fetch did to the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Merged { page: u32, appended: usize },
    Exhausted { page: u32 },
    Failed { page: u32 },
    /// The view was unmounted before the fetch resolved.
    Discarded { page: u32 },
}

/// Drives incremental loading of the photo listing for one mounted gallery.
///
/// Cloning is cheap; clones share the same state, source and observer.
#[derive(Clone)]
pub struct PaginationController {
    source: Arc<dyn PhotoSource>,
    state: Arc<Mutex<GalleryState>>,
    observer: Arc<Mutex<Box<dyn VisibilityObserver>>>,
    alive: AliveToken,
    events: Option<mpsc::UnboundedSender<GalleryEvent>>,
}

impl PaginationController {
    pub fn new(
        source: Arc<dyn PhotoSource>,
        observer: impl VisibilityObserver + 'static,
        alive: AliveToken,
    ) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(GalleryState::new())),
            observer: Arc::new(Mutex::new(Box::new(observer))),
            alive,
            events: None,
        }
    }

    /// Creates a controller bound to a fresh [`Mount`]. Dropping the mount
    /// makes every later completion a no-op.
    pub fn mount(
        source: Arc<dyn PhotoSource>,
        observer: impl VisibilityObserver + 'static,
    ) -> (Self, Mount) {
        let mount = Mount::new();
        let controller = Self::new(source, observer, mount.token());
        (controller, mount)
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<GalleryEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn snapshot(&self) -> GalleryState {
        self.state.lock().await.clone()
    }

    /// Fetches the page the counter currently points at and merges it.
    /// Once an empty page ended the listing no request is made.
    pub async fn load_next_page(&self) -> LoadOutcome {
        let page = {
            let mut state = self.state.lock().await;
            match state.begin_load() {
                Some(page) => page,
                None => return LoadOutcome::Exhausted { page: state.page() },
            }
        };
        self.fetch_page(page).await
    }

    /// Handles a visibility signal for `watch`. Returns `None` when the
    /// signal is ignored: stale watch, a load already in flight, or an
    /// exhausted listing.
    pub async fn on_last_item_visible(&self, watch: &Watch) -> Option<LoadOutcome> {
        let page = {
            let mut state = self.state.lock().await;
            if watch.generation != state.watch_generation() {
                tracing::trace!(
                    generation = watch.generation,
                    current = state.watch_generation(),
                    "ignoring stale watch"
                );
                return None;
            }
            state.advance()?
        };
        Some(self.fetch_page(page).await)
    }

    async fn fetch_page(&self, page: u32) -> LoadOutcome {
        self.emit(GalleryEvent::LoadStarted { page });
        let result = self.source.list_page(page, PAGE_SIZE).await;

        if !self.alive.is_alive() {
            tracing::debug!(page, "gallery unmounted, dropping page");
            return LoadOutcome::Discarded { page };
        }

        let mut state = self.state.lock().await;
        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                state.fail_load();
                drop(state);
                tracing::error!(page, error = %e, "error fetching photos");
                self.emit(GalleryEvent::LoadFailed { page });
                return LoadOutcome::Failed { page };
            }
        };

        if batch.is_empty() {
            state.apply_batch(batch);
            self.observer.lock().await.disconnect();
            drop(state);
            tracing::info!(page, "reached the end of the photo listing");
            self.emit(GalleryEvent::Exhausted { page });
            return LoadOutcome::Exhausted { page };
        }

        let received = batch.len();
        let appended = state.apply_batch(batch);
        // re-bind after every merge, an unchanged last photo can still be in view
        let generation = state.bump_watch();
        if let Some(last) = state.last() {
            let watch = Watch {
                generation,
                photo_id: last.id.clone(),
            };
            let mut observer = self.observer.lock().await;
            observer.disconnect();
            observer.observe(watch);
        }
        let total = state.len();
        drop(state);

        tracing::debug!(
            page,
            received,
            appended = appended.len(),
            total,
            "merged photo page"
        );
        let count = appended.len();
        self.emit(GalleryEvent::PageMerged { page, appended });
        LoadOutcome::Merged {
            page,
            appended: count,
        }
    }

    fn emit(&self, event: GalleryEvent) {
        if let Some(tx) = self.events.as_ref() {
            let _ = tx.send(event);
        }
    }
}
