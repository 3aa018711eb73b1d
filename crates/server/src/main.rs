use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use server_api::{export_wallets_csv, list_wallets, submit_wallet, ApiContext, CSV_FILENAME};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        SubmitWalletRequest, SubmitWalletResponse, WalletListResponse, API_PREFIX, HEALTH_ROUTE,
    },
};
use storage::Storage;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, normalize_database_url};

const MAX_BODY_BYTES: usize = 16 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    info!(%database_url, "allowlist database ready");

    if let Some(dir) = &settings.static_dir {
        if !dir.join("index.html").exists() {
            warn!(static_dir = %dir.display(), "static dir has no index.html; SPA fallback will 404");
        }
    }

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.static_dir.as_deref());

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "allowlist api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/wallets", post(http_submit_wallet).get(http_list_wallets))
        .route("/wallets/csv", get(http_export_csv))
        .fallback(api_not_found);

    let mut router = Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .nest(API_PREFIX, api)
        .with_state(state);

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(spa);
    }

    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Invalid => StatusCode::BAD_REQUEST,
        ErrorCode::Duplicate => StatusCode::CONFLICT,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Server => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn http_error(err: ApiError) -> HttpError {
    (status_for(err.code), Json(err))
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.api.storage.health_check().await.map_err(|e| {
        error!(error = ?e, "health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::server("storage unavailable")),
        )
    })?;
    Ok("ok")
}

async fn http_submit_wallet(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitWalletRequest>, JsonRejection>,
) -> Result<Json<SubmitWalletResponse>, HttpError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected wallet submission body");
        http_error(ApiError::invalid("Invalid request body"))
    })?;
    submit_wallet(&state.api, &req)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_list_wallets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WalletListResponse>, HttpError> {
    list_wallets(&state.api).await.map(Json).map_err(http_error)
}

async fn http_export_csv(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let csv = export_wallets_csv(&state.api).await.map_err(http_error)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={CSV_FILENAME}"),
            ),
        ],
        csv,
    ))
}

async fn api_not_found() -> HttpError {
    http_error(ApiError::new(ErrorCode::NotFound, "Not found"))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
