use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{PhotoDetail, PhotoSource};
use crate::lifetime::{AliveToken, Mount};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    pub loading: bool,
    pub photo: Option<PhotoDetail>,
}

/// Fetches and holds the record shown by one detail view.
#[derive(Clone)]
pub struct DetailFetcher {
    source: Arc<dyn PhotoSource>,
    state: Arc<Mutex<DetailState>>,
    alive: AliveToken,
}

impl DetailFetcher {
    pub fn new(source: Arc<dyn PhotoSource>, alive: AliveToken) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(DetailState {
                loading: true,
                photo: None,
            })),
            alive,
        }
    }

    pub fn mount(source: Arc<dyn PhotoSource>) -> (Self, Mount) {
        let mount = Mount::new();
        let fetcher = Self::new(source, mount.token());
        (fetcher, mount)
    }

    pub async fn snapshot(&self) -> DetailState {
        self.state.lock().await.clone()
    }

    /// Fetches `id` and returns the stored record. Any failure is logged and
    /// leaves the record unset.
    pub async fn load_detail(&self, id: &str) -> Option<PhotoDetail> {
        let id = id.trim();
        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.photo = None;
            if id.is_empty() {
                state.loading = false;
                return None;
            }
        }

        let result = self.source.photo_info(id).await;
        if !self.alive.is_alive() {
            tracing::debug!(id, "detail view unmounted, dropping record");
            return None;
        }

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(photo) => {
                state.photo = Some(photo);
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error fetching photo detail");
            }
        }
        state.photo.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tests::fakes::{detail, ScriptedSource};

    #[tokio::test]
    async fn starts_loading_and_stores_record() {
        let source = Arc::new(ScriptedSource::new().detail(detail(7)));
        let (fetcher, _mount) = DetailFetcher::mount(source);
        assert!(fetcher.snapshot().await.loading);

        let photo = fetcher.load_detail("7").await;
        assert_eq!(photo, Some(detail(7)));
        let state = fetcher.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.photo, Some(detail(7)));
    }

    #[tokio::test]
    async fn unknown_id_leaves_record_unset() {
        let source = Arc::new(ScriptedSource::new());
        let (fetcher, _mount) = DetailFetcher::mount(source.clone());

        assert_eq!(fetcher.load_detail("999999").await, None);
        assert_eq!(fetcher.snapshot().await, DetailState::default());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn blank_id_issues_no_request() {
        let source = Arc::new(ScriptedSource::new());
        let (fetcher, _mount) = DetailFetcher::mount(source.clone());

        assert_eq!(fetcher.load_detail("  ").await, None);
        assert!(!fetcher.snapshot().await.loading);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn every_call_refetches() {
        let source = Arc::new(ScriptedSource::new().detail(detail(3)));
        let (fetcher, _mount) = DetailFetcher::mount(source.clone());

        fetcher.load_detail("3").await;
        fetcher.load_detail("3").await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn late_record_is_ignored_after_unmount() {
        let source = Arc::new(ScriptedSource::new().detail(detail(1)).gated());
        let (fetcher, mount) = DetailFetcher::mount(source.clone());

        let loader = fetcher.clone();
        let handle = tokio::spawn(async move { loader.load_detail("1").await });
        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }
        mount.unmount();
        source.release();

        assert_eq!(handle.await.unwrap(), None);
        assert_eq!(fetcher.snapshot().await.photo, None);
    }
}
