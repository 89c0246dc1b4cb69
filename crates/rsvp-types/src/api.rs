use serde::{Deserialize, Serialize};

use crate::models::{EventConfig, HuntState};

// -- Login --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub guest_name: String,
    pub event_config: EventConfig,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub guest_name: Option<String>,
    pub content: Option<String>,
    pub bouquet_image: Option<String>,
}

/// `{success, message}` acknowledgement shared by several endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

// -- Hunt --

#[derive(Debug, Deserialize)]
pub struct ClaimSecretRequest {
    pub action: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimSecretResponse {
    pub success: bool,
    pub flag: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitFlagRequest {
    pub nickname: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitFlagResponse {
    pub success: bool,
    pub message: String,
    pub total: usize,
    pub complete: bool,
}

/// Returned (with 400) for a flag that is not on the whitelist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolationResponse {
    pub success: bool,
    pub is_mistake: bool,
    pub flag: String,
    pub message: String,
}

/// Returned for any non-GET verb on the leaderboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EasterEggResponse {
    pub is_easter: bool,
    pub flag: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub nickname: String,
    pub state: HuntState,
    pub found_flags: Vec<String>,
    pub total: usize,
}
