use super::*;
use axum::{
    body::{self, Body},
    http::Request,
};
use shared::protocol::{WALLETS_CSV_ROUTE, WALLETS_ROUTE};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const ADDRESS: &str = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = AppState {
        api: ApiContext {
            storage: storage.clone(),
        },
    };
    (build_router(Arc::new(state), None), storage)
}

fn submit_request(body: serde_json::Value) -> Request<Body> {
    Request::post(WALLETS_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app().await;
    let request = Request::get(HEALTH_ROUTE)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn submit_then_resubmit_returns_success_then_conflict() {
    let (app, storage) = test_app().await;

    let first = app
        .clone()
        .oneshot(submit_request(serde_json::json!({
            "address": ADDRESS,
            "handle": "ab",
            "quoteUrl": "https://x.com/ab/status/1",
        })))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let body = json_body(first).await;
    assert_eq!(body["success"], true);

    let second = app
        .oneshot(submit_request(serde_json::json!({ "address": ADDRESS })))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second).await;
    assert_eq!(body["error"], "duplicate");
    assert_eq!(body["message"], "Wallet already on allowlist");

    let log = storage.list_submissions().await.expect("log");
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].quote_url.as_deref(), Some("https://x.com/ab/status/1"));
}

#[tokio::test]
async fn invalid_address_returns_bad_request_with_message() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(submit_request(serde_json::json!({ "address": "0xZZ" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid");
    assert_eq!(body["message"], "Invalid Ethereum address");
}

#[tokio::test]
async fn malformed_body_returns_invalid_error_shape() {
    let (app, _storage) = test_app().await;
    let request = Request::post(WALLETS_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid");
}

#[tokio::test]
async fn list_and_csv_export_reflect_stored_wallets() {
    let (app, _storage) = test_app().await;
    app.clone()
        .oneshot(submit_request(serde_json::json!({
            "address": ADDRESS,
            "handle": "de,gen",
        })))
        .await
        .expect("submit");

    let list = app
        .clone()
        .oneshot(Request::get(WALLETS_ROUTE).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(list.status(), StatusCode::OK);
    let dto: WalletListResponse =
        serde_json::from_value(json_body(list).await).expect("list dto");
    assert_eq!(dto.count, 1);
    assert_eq!(dto.wallets[0].address, ADDRESS.to_ascii_lowercase());

    let csv = app
        .oneshot(
            Request::get(WALLETS_CSV_ROUTE)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(csv.status(), StatusCode::OK);
    assert_eq!(csv.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        csv.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=allowlist.csv"
    );
    let body = body::to_bytes(csv.into_body(), usize::MAX)
        .await
        .expect("body");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("address,handle,created_at"));
    let row = lines.next().expect("row");
    assert!(row.starts_with(&format!("{},degen,", ADDRESS.to_ascii_lowercase())));
}

#[tokio::test]
async fn unknown_api_route_is_json_not_found() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(Request::get("/api/nope").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "not_found");
}

#[tokio::test]
async fn static_dir_serves_index_for_client_routes_but_not_api() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dist = std::env::temp_dir().join(format!("allowlist_dist_{suffix}"));
    std::fs::create_dir_all(&dist).expect("dist");
    std::fs::write(dist.join("index.html"), "<html>allowlist</html>").expect("index");

    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext { storage },
        }),
        Some(&dist),
    );

    let page = app
        .clone()
        .oneshot(Request::get("/confirmation").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(page.status(), StatusCode::OK);
    let body = body::to_bytes(page.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"<html>allowlist</html>");

    let api = app
        .oneshot(Request::get("/api/nope").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(api.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(dist).expect("cleanup");
}
