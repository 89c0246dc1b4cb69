//! Database row types. These map directly to SQLite rows and are converted
//! into rsvp-types models at the edge.

use anyhow::Result;

use rsvp_types::models::{EventConfig, Guest, HuntResult};

use crate::parse_timestamp;

pub struct GuestRow {
    pub name: String,
    pub event_date: String,
    pub location_name: String,
    pub address: String,
    pub map_url: String,
}

impl GuestRow {
    pub fn into_guest(self) -> Result<Guest> {
        Ok(Guest {
            name: self.name,
            event_config: EventConfig {
                date: parse_timestamp(&self.event_date)?,
                location_name: self.location_name,
                address: self.address,
                map_url: self.map_url,
            },
        })
    }
}

pub struct HuntResultRow {
    pub nickname: String,
    pub found_flags: Vec<String>,
    pub completion_time: String,
}

impl HuntResultRow {
    pub fn into_result(self) -> Result<HuntResult> {
        Ok(HuntResult {
            completion_time: parse_timestamp(&self.completion_time)?,
            nickname: self.nickname,
            found_flags: self.found_flags,
        })
    }
}
