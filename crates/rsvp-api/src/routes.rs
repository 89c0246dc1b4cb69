use std::path::Path;

use axum::{
    Json, Router,
    handler::HandlerWithoutStateExt,
    http::{Method, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{any, get, post},
};
use serde_json::json;
use tower_http::services::ServeDir;

use crate::auth::{self, AppState};
use crate::error::ApiError;
use crate::hunt;
use crate::messages;
use crate::middleware::guard_assets;

/// Assemble the API routes plus static file serving from `static_dir`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(auth::login))
        .route("/api/message", post(messages::post_message))
        .route("/api/messages", get(messages::get_messages))
        .route("/api/hunt/claim-secret", post(hunt::claim_secret))
        .route("/api/hunt/submit", post(hunt::submit_flag))
        .route("/api/hunt/leaderboard", any(hunt::leaderboard))
        .route("/api/hunt/progress/{nickname}", get(hunt::progress))
        .with_state(state);

    let assets = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(fallback.into_service());

    api.fallback_service(assets)
        .layer(middleware::from_fn(guard_assets))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Unknown API paths get a JSON 404; any other page GET goes back to `/`.
async fn fallback(method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let is_api = path == "/api" || path.starts_with("/api/");

    if !is_api && path != "/" && (method == Method::GET || method == Method::HEAD) {
        return Redirect::to("/").into_response();
    }

    ApiError::NotFound.into_response()
}
