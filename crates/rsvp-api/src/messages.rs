use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use rsvp_types::api::{Ack, PostMessageRequest};
use rsvp_types::models::WallMessage;

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts `data:image/<subtype>;base64,<payload>` with a decodable payload.
fn validate_bouquet(image: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::Validation("Bouquet image must be a base64 image data URL".into());

    let rest = image.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

    if subtype.is_empty()
        || !subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(invalid());
    }

    B64.decode(payload).map_err(|e| {
        warn!("Bouquet payload failed to decode: {}", e);
        invalid()
    })?;

    Ok(())
}

/// POST /api/message: append a wish to the wall.
pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let guest_name = non_blank(req.guest_name.as_deref())
        .ok_or_else(|| ApiError::Validation("guestName is required".into()))?
        .to_string();

    let content = req.content;
    let bouquet_image = non_blank(req.bouquet_image.as_deref()).map(str::to_string);

    if non_blank(content.as_deref()).is_none() && bouquet_image.is_none() {
        return Err(ApiError::Validation(
            "A message needs text or a bouquet".into(),
        ));
    }
    if let Some(image) = &bouquet_image {
        validate_bouquet(image)?;
    }

    let id = Uuid::new_v4().to_string();
    let has_image = bouquet_image.is_some();

    let st = state.clone();
    let author = guest_name.clone();
    run_blocking(move || {
        Ok(st.db.insert_message(
            &id,
            &author,
            content.as_deref(),
            bouquet_image.as_deref(),
            Utc::now(),
        )?)
    })
    .await?;

    info!("Message saved from '{}' (bouquet: {})", guest_name, has_image);

    Ok(Json(Ack {
        success: true,
        message: "Message saved".into(),
    }))
}

/// GET /api/messages: the public wall, newest first.
pub async fn get_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let st = state.clone();
    let contents = run_blocking(move || Ok(st.db.get_wall_messages()?)).await?;

    let messages: Vec<WallMessage> = contents
        .into_iter()
        .map(|content| WallMessage { content })
        .collect();

    Ok(Json(messages))
}
