use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{info_url, list_url, PhotoDetail, PhotoSummary};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Where listing pages and single records come from.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn list_page(&self, page: u32, limit: u32) -> Result<Vec<PhotoSummary>, FetchError>;

    async fn photo_info(&self, id: &str) -> Result<PhotoDetail, FetchError>;
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid header '{header}'")]
    InvalidHeader { header: String },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
}

pub fn build_http_client(
    proxy: Option<&str>,
    timeout_seconds: Option<u64>,
    header: Option<(&str, &str)>,
) -> Result<reqwest::Client, ClientBuildError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "picsum-gallery/",
            env!("CARGO_PKG_VERSION")
        )),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    if let Some((key, value)) = header {
        let invalid = || ClientBuildError::InvalidHeader {
            header: format!("{key}: {value}"),
        };
        let name = reqwest::header::HeaderName::from_str(key.trim()).map_err(|_| invalid())?;
        let value = reqwest::header::HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
        headers.insert(name, value);
    }

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10));

    // requests may hang forever unless a timeout is configured
    if let Some(seconds) = timeout_seconds.filter(|s| *s > 0) {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|e| ClientBuildError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy_cfg);
    }

    builder
        .build()
        .map_err(|e| ClientBuildError::Build { source: e })
}

#[derive(Clone, Debug)]
pub struct HttpPhotoSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPhotoSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return Err(FetchError::Transport { url, source: e }),
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(FetchError::Transport { url, source: e }),
        };
        serde_json::from_slice::<T>(&body).map_err(|e| FetchError::Decode { url, source: e })
    }
}

#[async_trait]
impl PhotoSource for HttpPhotoSource {
    async fn list_page(&self, page: u32, limit: u32) -> Result<Vec<PhotoSummary>, FetchError> {
        self.get_json(list_url(&self.base_url, page, limit)).await
    }

    async fn photo_info(&self, id: &str) -> Result<PhotoDetail, FetchError> {
        self.get_json(info_url(&self.base_url, id)).await
    }
}
