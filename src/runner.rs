use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::api::{
    self, ClientBuildError, HttpPhotoSource, PhotoDetail, PhotoSource, PhotoSummary,
};
use crate::detail::DetailFetcher;
use crate::gallery::{ChannelObserver, GalleryEvent, LoadOutcome, PaginationController, Watch};
use crate::utils;

/// How the end of the grid becomes visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollMode {
    /// The last photo counts as visible as soon as it is rendered.
    #[default]
    Auto,
    /// The reader presses Enter to scroll to the last photo.
    Interactive,
}

#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub proxy: Option<String>,
    pub header: Option<String>,
    /// Pages to merge before stopping; 0 keeps going until the listing ends.
    pub max_pages: u32,
    pub scroll: ScrollMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
            proxy: None,
            header: None,
            max_pages: 3,
            scroll: ScrollMode::Auto,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid base URL: {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("invalid header: {header}: {message}")]
    InvalidHeader { header: String, message: String },

    #[error(transparent)]
    Client(#[from] ClientBuildError),

    #[error("failed to read from stdin: {source}")]
    Stdin {
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct BrowseResult {
    pub photos: Vec<PhotoSummary>,
    pub pages_loaded: u32,
    pub last_page: u32,
    pub exhausted: bool,
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct Runner {
    options: Options,
    source: Arc<dyn PhotoSource>,
}

impl Runner {
    pub fn new(mut options: Options) -> Result<Self, RunnerError> {
        options.base_url = utils::normalize_base_url(&options.base_url).map_err(|message| {
            RunnerError::InvalidBaseUrl {
                url: options.base_url.clone(),
                message,
            }
        })?;

        let header = match options.header.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(raw) => Some(utils::parse_header(raw).map_err(|message| {
                RunnerError::InvalidHeader {
                    header: raw.to_string(),
                    message,
                }
            })?),
            None => None,
        };

        let client = api::build_http_client(
            options.proxy.as_deref(),
            options.timeout_seconds,
            header.as_ref().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        let source = Arc::new(HttpPhotoSource::new(client, options.base_url.clone()));
        Ok(Self { options, source })
    }

    /// Uses `source` instead of the HTTP API.
    pub fn with_source(options: Options, source: Arc<dyn PhotoSource>) -> Self {
        Self { options, source }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mounts a gallery and scrolls it until the listing ends, a page fails
    /// or `max_pages` pages were merged.
    pub async fn browse(
        &self,
        events: Option<mpsc::UnboundedSender<GalleryEvent>>,
    ) -> Result<BrowseResult, RunnerError> {
        let started_at = Instant::now();

        let (observer, mut watches) = ChannelObserver::new();
        let (mut controller, mount) = PaginationController::mount(self.source.clone(), observer);
        if let Some(tx) = events {
            controller = controller.with_events(tx);
        }

        let mut stdin = match self.options.scroll {
            ScrollMode::Interactive => Some(BufReader::new(tokio::io::stdin()).lines()),
            ScrollMode::Auto => None,
        };

        let mut pages_loaded = 0u32;
        let mut outcome = controller.load_next_page().await;
        loop {
            if !matches!(outcome, LoadOutcome::Merged { .. }) {
                break;
            }
            pages_loaded += 1;
            if self.options.max_pages != 0 && pages_loaded >= self.options.max_pages {
                break;
            }

            let Some(watch) = latest_watch(&mut watches) else {
                break;
            };
            if let Some(lines) = stdin.as_mut() {
                match lines.next_line().await {
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(e) => return Err(RunnerError::Stdin { source: e }),
                }
            }

            outcome = match controller.on_last_item_visible(&watch).await {
                Some(outcome) => outcome,
                None => break,
            };
        }

        let state = controller.snapshot().await;
        mount.unmount();

        Ok(BrowseResult {
            photos: state.photos().to_vec(),
            pages_loaded,
            last_page: state.page(),
            exhausted: state.is_exhausted(),
            elapsed: started_at.elapsed(),
        })
    }

    pub async fn detail(&self, id: &str) -> Option<PhotoDetail> {
        let (fetcher, _mount) = DetailFetcher::mount(self.source.clone());
        fetcher.load_detail(id).await
    }
}

// only the newest attachment can fire; older ones were released
fn latest_watch(watches: &mut mpsc::UnboundedReceiver<Watch>) -> Option<Watch> {
    let mut latest = None;
    while let Ok(watch) = watches.try_recv() {
        latest = Some(watch);
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{detail, photos, ScriptedSource};

    fn runner(source: ScriptedSource, max_pages: u32) -> Runner {
        Runner::with_source(
            Options {
                max_pages,
                ..Options::default()
            },
            Arc::new(source),
        )
    }

    #[tokio::test]
    async fn browse_stops_after_max_pages() {
        let source = ScriptedSource::new()
            .page(1, photos(0..20))
            .page(2, photos(20..40))
            .page(3, photos(40..60));
        let result = runner(source, 2).browse(None).await.unwrap();
        assert_eq!(result.pages_loaded, 2);
        assert_eq!(result.last_page, 2);
        assert_eq!(result.photos.len(), 40);
        assert!(!result.exhausted);
    }

    #[tokio::test]
    async fn browse_without_limit_runs_until_exhausted() {
        let source = ScriptedSource::new()
            .page(1, photos(0..20))
            .page(2, photos(15..35))
            .page(3, photos(35..40));
        let result = runner(source, 0).browse(None).await.unwrap();
        assert_eq!(result.pages_loaded, 3);
        assert_eq!(result.last_page, 4);
        assert_eq!(result.photos.len(), 40);
        assert!(result.exhausted);
    }

    #[tokio::test]
    async fn browse_stops_on_failed_page() {
        let source = ScriptedSource::new().page(1, photos(0..20)).failing(2);
        let result = runner(source, 0).browse(None).await.unwrap();
        assert_eq!(result.pages_loaded, 1);
        assert_eq!(result.photos.len(), 20);
        assert!(!result.exhausted);
    }

    #[tokio::test]
    async fn browse_continues_past_duplicate_only_page() {
        let source = ScriptedSource::new()
            .page(1, photos(0..20))
            .page(2, photos(0..20))
            .page(3, photos(20..40));
        let result = runner(source, 0).browse(None).await.unwrap();
        assert_eq!(result.pages_loaded, 3);
        assert_eq!(result.photos.len(), 40);
        assert_eq!(result.last_page, 4);
        assert!(result.exhausted);
    }

    #[tokio::test]
    async fn detail_returns_none_for_unknown_id() {
        let r = runner(ScriptedSource::new().detail(detail(5)), 1);
        assert_eq!(r.detail("5").await, Some(detail(5)));
        assert_eq!(r.detail("999999").await, None);
    }

    #[test]
    fn new_rejects_bad_base_url_and_header() {
        let err = Runner::new(Options {
            base_url: "not a url".to_string(),
            ..Options::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, RunnerError::InvalidBaseUrl { .. }));

        let err = Runner::new(Options {
            header: Some("NoColonHere".to_string()),
            ..Options::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, RunnerError::InvalidHeader { .. }));
    }
}
