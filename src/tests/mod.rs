
use std::sync::Arc;

use crate::api::{FetchError, HttpPhotoSource, PhotoSource};
use crate::detail::DetailFetcher;
use crate::runner::{Options, Runner};
use fakes::{detail, photos};
use stub_server::StubServer;

fn http_source(base_url: &str) -> HttpPhotoSource {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpPhotoSource::new(client, base_url)
}

#[tokio::test]
async fn http_source_lists_a_page() {
    let body = serde_json::to_string(&photos(0..2)).unwrap();
    let base = StubServer::new()
        .route("/v2/list?page=1&limit=20", 200, body)
        .start()
        .await;

    let page = http_source(&base).list_page(1, 20).await.unwrap();
    assert_eq!(page, photos(0..2));
}

#[tokio::test]
async fn http_source_reports_status_and_decode_errors() {
    let base = StubServer::new()
        .route("/v2/list?page=1&limit=20", 200, "<html>oops</html>")
        .route("/v2/list?page=2&limit=20", 500, "")
        .start()
        .await;
    let source = http_source(&base);

    let err = source.list_page(1, 20).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));

    let err = source.list_page(2, 20).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn http_source_reports_transport_errors() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = http_source(&format!("http://{addr}"))
        .photo_info("1")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn detail_for_unknown_id_is_unset_after_404() {
    let base = StubServer::new().start().await;
    let (fetcher, _mount) = DetailFetcher::mount(Arc::new(http_source(&base)));

    assert_eq!(fetcher.load_detail("999999").await, None);
    let state = fetcher.snapshot().await;
    assert!(!state.loading);
    assert!(state.photo.is_none());
}

#[tokio::test]
async fn detail_is_fetched_from_info_endpoint() {
    let body = serde_json::to_string(&detail(237)).unwrap();
    let base = StubServer::new()
        .route("/id/237/info", 200, body)
        .start()
        .await;
    let (fetcher, _mount) = DetailFetcher::mount(Arc::new(http_source(&base)));

    assert_eq!(fetcher.load_detail("237").await, Some(detail(237)));
}

#[tokio::test]
async fn browsing_over_http_dedupes_and_ends_on_empty_page() {
    let base = StubServer::new()
        .route(
            "/v2/list?page=1&limit=20",
            200,
            serde_json::to_string(&photos(0..20)).unwrap(),
        )
        .route(
            "/v2/list?page=2&limit=20",
            200,
            serde_json::to_string(&photos(15..35)).unwrap(),
        )
        .route("/v2/list?page=3&limit=20", 200, "[]")
        .start()
        .await;

    let runner = Runner::with_source(
        Options {
            base_url: base.clone(),
            max_pages: 0,
            ..Options::default()
        },
        Arc::new(http_source(&base)),
    );
    let result = runner.browse(None).await.unwrap();

    assert_eq!(result.photos.len(), 35);
    assert_eq!(&result.photos[..20], &photos(0..20)[..]);
    assert_eq!(&result.photos[20..], &photos(20..35)[..]);
    assert_eq!(result.pages_loaded, 2);
    assert_eq!(result.last_page, 3);
    assert!(result.exhausted);
}
