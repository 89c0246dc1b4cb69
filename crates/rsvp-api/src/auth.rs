use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::{info, warn};

use rsvp_db::Database;
use rsvp_types::api::{LoginRequest, LoginResponse};

use crate::error::{ApiError, run_blocking};
use crate::hunt::HuntEngine;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub hunt: HuntEngine,
}

/// POST /api/login: look a guest up by name and hand back their event details.
///
/// The name is matched whole and case-insensitively. This is a greeting,
/// not a credential check.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Name is required".into()))?;

    let st = state.clone();
    let lookup = name.clone();
    let row = run_blocking(move || Ok(st.db.find_guest(&lookup)?)).await?;

    let Some(row) = row else {
        warn!("Login rejected for unknown guest '{}'", name);
        return Err(ApiError::GuestNotFound);
    };

    let guest = row.into_guest()?;
    info!("Guest '{}' logged in", guest.name);

    Ok(Json(LoginResponse {
        success: true,
        guest_name: guest.name,
        event_config: guest.event_config,
    }))
}
