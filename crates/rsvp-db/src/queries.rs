use crate::models::{GuestRow, HuntResultRow};
use crate::{Database, format_timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rsvp_types::models::Guest;
use rusqlite::Connection;

/// Outcome of a flag write, read inside the same transaction as the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagWrite {
    /// The flag was new. `found` is the nickname's full list, oldest first.
    Recorded { found: Vec<String> },
    Duplicate { total: usize },
}

impl Database {
    // -- Guests --

    /// Insert or replace a guest, keyed on the lowercased, trimmed name.
    pub fn upsert_guest(&self, guest: &Guest) -> Result<()> {
        let name = guest.name.trim();
        let cfg = &guest.event_config;
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO guests (name_key, name, event_date, location_name, address, map_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(name_key) DO UPDATE SET
                    name = excluded.name,
                    event_date = excluded.event_date,
                    location_name = excluded.location_name,
                    address = excluded.address,
                    map_url = excluded.map_url",
                rusqlite::params![
                    name.to_lowercase(),
                    name,
                    format_timestamp(cfg.date),
                    cfg.location_name,
                    cfg.address,
                    cfg.map_url,
                ],
            )?;
            Ok(())
        })
    }

    /// Case-insensitive whole-name lookup.
    pub fn find_guest(&self, name: &str) -> Result<Option<GuestRow>> {
        self.with_conn(|conn| query_guest(conn, &name.to_lowercase()))
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        guest_name: &str,
        content: Option<&str>,
        bouquet_image: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (id, guest_name, content, bouquet_image, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, guest_name, content, bouquet_image, format_timestamp(created_at)],
            )?;
            Ok(())
        })
    }

    /// Contents of every message with non-blank text, newest first.
    pub fn get_wall_messages(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT content FROM messages
                 WHERE content IS NOT NULL AND content <> ''
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            // SQLite's trim() only knows about spaces
            Ok(rows.into_iter().filter(|c| !c.trim().is_empty()).collect())
        })
    }

    // -- Hunt --

    /// Append `flag` to `nickname`'s result, creating the result if needed.
    ///
    /// Runs as one transaction under the writer lock; the UNIQUE(nickname, flag)
    /// key decides whether the flag is new, so concurrent submissions of the
    /// same flag record it exactly once.
    pub fn record_flag(&self, nickname: &str, flag: &str, now: DateTime<Utc>) -> Result<FlagWrite> {
        let ts = format_timestamp(now);
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO hunt_results (nickname, completion_time) VALUES (?1, ?2)
                 ON CONFLICT(nickname) DO NOTHING",
                (nickname, &ts),
            )?;

            let inserted = tx.execute(
                "INSERT INTO hunt_flags (nickname, flag, found_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(nickname, flag) DO NOTHING",
                (nickname, flag, &ts),
            )?;

            if inserted > 0 {
                tx.execute(
                    "UPDATE hunt_results SET completion_time = ?2 WHERE nickname = ?1",
                    (nickname, &ts),
                )?;
            }

            let write = if inserted > 0 {
                FlagWrite::Recorded {
                    found: query_flags(&tx, nickname)?,
                }
            } else {
                FlagWrite::Duplicate {
                    total: count_flags(&tx, nickname)?,
                }
            };
            tx.commit()?;

            Ok(write)
        })
    }

    /// Exact (case-sensitive) nickname lookup.
    pub fn get_hunt_result(&self, nickname: &str) -> Result<Option<HuntResultRow>> {
        self.with_conn(|conn| {
            let completion_time: Option<String> = conn
                .query_row(
                    "SELECT completion_time FROM hunt_results WHERE nickname = ?1",
                    [nickname],
                    |row| row.get(0),
                )
                .optional()?;

            match completion_time {
                Some(completion_time) => Ok(Some(HuntResultRow {
                    nickname: nickname.to_string(),
                    found_flags: query_flags(conn, nickname)?,
                    completion_time,
                })),
                None => Ok(None),
            }
        })
    }

    /// Most flags first; equal counts go to whoever got there earlier.
    pub fn get_leaderboard(&self, limit: u32) -> Result<Vec<HuntResultRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.nickname, r.completion_time, COUNT(f.flag) AS found
                 FROM hunt_results r
                 LEFT JOIN hunt_flags f ON f.nickname = r.nickname
                 GROUP BY r.nickname
                 ORDER BY found DESC, r.completion_time ASC
                 LIMIT ?1",
            )?;

            let heads = stmt
                .query_map([limit], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            heads
                .into_iter()
                .map(|(nickname, completion_time)| -> Result<HuntResultRow> {
                    Ok(HuntResultRow {
                        found_flags: query_flags(conn, &nickname)?,
                        nickname,
                        completion_time,
                    })
                })
                .collect()
        })
    }
}

fn query_guest(conn: &Connection, name_key: &str) -> Result<Option<GuestRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, event_date, location_name, address, map_url FROM guests WHERE name_key = ?1",
    )?;

    let row = stmt
        .query_row([name_key], |row| {
            Ok(GuestRow {
                name: row.get(0)?,
                event_date: row.get(1)?,
                location_name: row.get(2)?,
                address: row.get(3)?,
                map_url: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_flags(conn: &Connection, nickname: &str) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT flag FROM hunt_flags WHERE nickname = ?1 ORDER BY rowid ASC")?;

    let flags = stmt
        .query_map([nickname], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(flags)
}

fn count_flags(conn: &Connection, nickname: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM hunt_flags WHERE nickname = ?1",
        [nickname],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rsvp_types::models::EventConfig;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn guest(name: &str) -> Guest {
        Guest {
            name: name.to_string(),
            event_config: EventConfig {
                date: Utc.with_ymd_and_hms(2026, 12, 20, 9, 0, 0).unwrap(),
                location_name: "Hall A".into(),
                address: "1 Main St".into(),
                map_url: "https://maps.example.com/hall-a".into(),
            },
        }
    }

    #[test]
    fn guest_lookup_is_case_insensitive_and_whole_name() {
        let db = db();
        db.upsert_guest(&guest("  Alice ")).unwrap();

        let row = db.find_guest("ALICE").unwrap().unwrap();
        assert_eq!(row.name, "Alice");
        let g = row.into_guest().unwrap();
        assert_eq!(g.event_config.location_name, "Hall A");

        assert!(db.find_guest("Alicee").unwrap().is_none());
        assert!(db.find_guest("Ali").unwrap().is_none());
        assert!(db.find_guest("A.*").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_existing_guest() {
        let db = db();
        db.upsert_guest(&guest("Bob")).unwrap();

        let mut moved = guest("BOB");
        moved.event_config.location_name = "Hall B".into();
        db.upsert_guest(&moved).unwrap();

        let row = db.find_guest("bob").unwrap().unwrap();
        assert_eq!(row.name, "BOB");
        assert_eq!(row.location_name, "Hall B");
    }

    #[test]
    fn wall_skips_blank_content_and_orders_newest_first() {
        let db = db();
        let t0 = Utc::now();
        db.insert_message("1", "Alice", Some("hello"), None, t0).unwrap();
        db.insert_message("2", "Alice", Some(""), None, t0 + Duration::seconds(1)).unwrap();
        db.insert_message("3", "Bob", None, Some("data:image/png;base64,AA=="), t0 + Duration::seconds(2)).unwrap();
        db.insert_message("4", "Bob", Some(" \n\t"), None, t0 + Duration::seconds(3)).unwrap();
        db.insert_message("5", "Carol", Some("congrats"), None, t0 + Duration::seconds(4)).unwrap();

        assert_eq!(db.get_wall_messages().unwrap(), vec!["congrats", "hello"]);
    }

    #[test]
    fn wall_breaks_timestamp_ties_by_insert_order() {
        let db = db();
        let t0 = Utc::now();
        db.insert_message("1", "Alice", Some("first"), None, t0).unwrap();
        db.insert_message("2", "Alice", Some("second"), None, t0).unwrap();

        assert_eq!(db.get_wall_messages().unwrap(), vec!["second", "first"]);
    }

    #[test]
    fn record_flag_rejects_duplicates() {
        let db = db();
        let now = Utc::now();

        assert_eq!(
            db.record_flag("neo", "FLAG_01_VINYL_SPIN", now).unwrap(),
            FlagWrite::Recorded { found: vec!["FLAG_01_VINYL_SPIN".into()] }
        );
        assert_eq!(
            db.record_flag("neo", "FLAG_01_VINYL_SPIN", now + Duration::seconds(5)).unwrap(),
            FlagWrite::Duplicate { total: 1 }
        );

        let row = db.get_hunt_result("neo").unwrap().unwrap();
        assert_eq!(row.found_flags, vec!["FLAG_01_VINYL_SPIN"]);
        // duplicate does not refresh the completion time
        assert_eq!(row.completion_time, format_timestamp(now));
    }

    #[test]
    fn recorded_write_returns_flags_in_discovery_order() {
        let db = db();
        let now = Utc::now();
        db.record_flag("neo", "FLAG_03_LOVE_KEYWORD", now).unwrap();
        db.record_flag("trinity", "FLAG_02_PORTRAIT_STILL", now).unwrap();

        let write = db
            .record_flag("neo", "FLAG_01_VINYL_SPIN", now + Duration::seconds(1))
            .unwrap();
        assert_eq!(
            write,
            FlagWrite::Recorded {
                found: vec!["FLAG_03_LOVE_KEYWORD".into(), "FLAG_01_VINYL_SPIN".into()]
            }
        );
        assert_eq!(
            db.get_hunt_result("neo").unwrap().unwrap().found_flags,
            vec!["FLAG_03_LOVE_KEYWORD", "FLAG_01_VINYL_SPIN"]
        );
    }

    #[test]
    fn nicknames_are_case_sensitive() {
        let db = db();
        let now = Utc::now();
        db.record_flag("Neo", "FLAG_01_VINYL_SPIN", now).unwrap();

        assert_eq!(
            db.record_flag("neo", "FLAG_01_VINYL_SPIN", now).unwrap(),
            FlagWrite::Recorded { found: vec!["FLAG_01_VINYL_SPIN".into()] }
        );
        assert!(db.get_hunt_result("NEO").unwrap().is_none());
    }

    #[test]
    fn leaderboard_orders_by_count_then_earliest_time() {
        let db = db();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let t2 = t1 + Duration::minutes(5);
        let t3 = t1 + Duration::minutes(10);
        let flags = [
            "FLAG_01_VINYL_SPIN",
            "FLAG_02_PORTRAIT_STILL",
            "FLAG_03_LOVE_KEYWORD",
            "FLAG_04_FLOWER_POWER",
            "FLAG_05_UIT_COMBO",
        ];

        for flag in &flags[..3] {
            db.record_flag("B", flag, t2).unwrap();
            db.record_flag("A", flag, t1).unwrap();
        }
        for flag in &flags {
            db.record_flag("C", flag, t3).unwrap();
        }

        let board = db.get_leaderboard(10).unwrap();
        let order: Vec<&str> = board.iter().map(|r| r.nickname.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(board[0].found_flags.len(), 5);
        assert_eq!(board[0].found_flags[0], "FLAG_01_VINYL_SPIN");
    }

    #[test]
    fn leaderboard_is_capped() {
        let db = db();
        let now = Utc::now();
        for i in 0..12 {
            db.record_flag(&format!("p{i}"), "FLAG_01_VINYL_SPIN", now).unwrap();
        }
        assert_eq!(db.get_leaderboard(10).unwrap().len(), 10);
    }

    #[test]
    fn concurrent_submissions_record_once() {
        let db = std::sync::Arc::new(db());
        let now = Utc::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || db.record_flag("race", "FLAG_06_GRAD_CAP", now).unwrap())
            })
            .collect();

        let recorded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|w| matches!(w, FlagWrite::Recorded { .. }))
            .count();

        assert_eq!(recorded, 1);
        assert_eq!(db.get_hunt_result("race").unwrap().unwrap().found_flags.len(), 1);
    }
}
