mod common;

use std::sync::Arc;

use assert2::check;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TempSite, temp_site, wallet_pages};
use docsift::search::IndexStore;
use docsift::server::router;
use docsift::types::SearchResponse;
use rstest::rstest;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_endpoint_returns_ranked_results(temp_site: TempSite) {
    temp_site.write_artifact(&wallet_pages());
    let app = router(Arc::new(IndexStore::new(temp_site.artifact_path())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=wallet")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    check!(response.status() == StatusCode::OK);
    let body: SearchResponse = body_json(response).await;
    check!(body.results.len() == 2);
    check!(body.results[0].page_href == "/a");
    check!(body.results[1].page_href == "/b");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_query_is_rejected(temp_site: TempSite) {
    temp_site.write_artifact(&wallet_pages());
    let app = router(Arc::new(IndexStore::new(temp_site.artifact_path())));

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        check!(response.status() == StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_artifact_surfaces_as_500(temp_site: TempSite) {
    let app = router(Arc::new(IndexStore::new(temp_site.artifact_path())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=wallet")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    check!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
}

/// The store behind the router memoizes across requests: two sequential
/// queries share one build.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn router_shares_the_store_across_requests(temp_site: TempSite) {
    temp_site.write_artifact(&wallet_pages());
    let store = Arc::new(IndexStore::new(temp_site.artifact_path()));
    let app = router(store.clone());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=wallet")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        check!(response.status() == StatusCode::OK);
    }

    check!(store.build_count() == 1);
}
