pub mod client;

use serde::Deserialize;
use serde::Serialize;

pub use client::{build_http_client, ClientBuildError, FetchError, HttpPhotoSource, PhotoSource};

pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Number of photos requested per listing page.
pub const PAGE_SIZE: u32 = 20;

/// Edge length, in pixels, of the square thumbnails shown in the grid.
pub const THUMBNAIL_SIZE: u32 = 300;

/// One entry of the `/v2/list` listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoSummary {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

/// The `/id/{id}/info` record shown by a detail view.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoDetail {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim().trim_end_matches('/')
}

pub fn list_url(base_url: &str, page: u32, limit: u32) -> String {
    format!("{}/v2/list?page={page}&limit={limit}", trim_base(base_url))
}

pub fn info_url(base_url: &str, id: &str) -> String {
    format!("{}/id/{}/info", trim_base(base_url), id.trim())
}

pub fn thumbnail_url(base_url: &str, id: &str) -> String {
    format!(
        "{}/id/{}/{THUMBNAIL_SIZE}/{THUMBNAIL_SIZE}",
        trim_base(base_url),
        id.trim()
    )
}
