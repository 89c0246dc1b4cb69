use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-guest event details returned on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    pub date: DateTime<Utc>,
    pub location_name: String,
    pub address: String,
    pub map_url: String,
}

/// A guest record. `name` is unique under case-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub name: String,
    pub event_config: EventConfig,
}

/// One row of the public wish wall, projected to its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallMessage {
    pub content: String,
}

/// Hunt progress for one nickname. `found_flags` keeps discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntResult {
    pub nickname: String,
    pub found_flags: Vec<String>,
    pub completion_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntState {
    /// No record exists for the nickname.
    Unknown,
    InProgress,
    /// Every primary flag has been found.
    Complete,
}
