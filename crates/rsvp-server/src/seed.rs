use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use rsvp_db::Database;
use rsvp_types::models::Guest;

/// Parse a JSON array of guests in the same shape the login endpoint returns.
pub fn parse_guests(raw: &str) -> Result<Vec<Guest>> {
    let guests: Vec<Guest> = serde_json::from_str(raw).context("Guest seed is not a valid guest list")?;

    if let Some(blank) = guests.iter().position(|g| g.name.trim().is_empty()) {
        anyhow::bail!("Guest seed entry {} has a blank name", blank);
    }

    Ok(guests)
}

/// Upsert every guest from the seed file. Later entries win on a name clash.
pub fn load_guests(db: &Database, path: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read guest seed {}", path.display()))?;
    let guests = parse_guests(&raw)?;

    for guest in &guests {
        db.upsert_guest(guest)?;
    }

    info!("Seeded {} guests from {}", guests.len(), path.display());
    Ok(guests.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {
            "name": "Alice",
            "eventConfig": {
                "date": "2026-12-20T09:00:00Z",
                "locationName": "Hall A",
                "address": "1 Main St",
                "mapUrl": "https://maps.example.com/a"
            }
        },
        {
            "name": " alice ",
            "eventConfig": {
                "date": "2026-12-21T18:30:00+07:00",
                "locationName": "Garden",
                "address": "2 Side St",
                "mapUrl": "https://maps.example.com/g"
            }
        }
    ]"#;

    #[test]
    fn later_entries_win() {
        let db = Database::open_in_memory().unwrap();
        for guest in parse_guests(SEED).unwrap() {
            db.upsert_guest(&guest).unwrap();
        }

        let guest = db.find_guest("ALICE").unwrap().unwrap().into_guest().unwrap();
        assert_eq!(guest.name, "alice");
        assert_eq!(guest.event_config.location_name, "Garden");
        assert_eq!(guest.event_config.date.to_rfc3339(), "2026-12-21T11:30:00+00:00");
    }

    #[test]
    fn rejects_blank_names_and_bad_json() {
        assert!(parse_guests(r#"[{"name":"  ","eventConfig":{"date":"2026-12-20T09:00:00Z","locationName":"a","address":"b","mapUrl":"c"}}]"#).is_err());
        assert!(parse_guests("{}").is_err());
    }
}
