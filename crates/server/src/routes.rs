use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Json, Router};
use common::types::Health;
use service::account::{AccountRepository, AccountService};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::{metrics, openapi::ApiDoc};

pub mod accounts;

/// Shared handler state. Wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { accounts: Arc::new(AccountService::new(repo)) }
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics_text() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Account CRUD and search routes, relative to the API prefix.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route("/accounts/search", get(accounts::search))
        .route(
            "/accounts/:id",
            get(accounts::get).put(accounts::update).delete(accounts::delete),
        )
}

/// Build the full application router: account API (optionally nested under
/// `api_prefix`), health, metrics and the OpenAPI document.
pub fn build_router(state: AppState, api_prefix: &str, cors: CorsLayer) -> Router {
    let api = if api_prefix.is_empty() {
        account_routes()
    } else {
        Router::new().nest(api_prefix, account_routes())
    };

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
