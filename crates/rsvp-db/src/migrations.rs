use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (guests, messages, hunt)");
        conn.execute_batch(
            "
            CREATE TABLE guests (
                name_key        TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                event_date      TEXT NOT NULL,
                location_name   TEXT NOT NULL,
                address         TEXT NOT NULL,
                map_url         TEXT NOT NULL
            );

            CREATE TABLE messages (
                id              TEXT PRIMARY KEY,
                guest_name      TEXT NOT NULL,
                content         TEXT,
                bouquet_image   TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_messages_created
                ON messages(created_at);

            CREATE TABLE hunt_results (
                nickname        TEXT PRIMARY KEY,
                completion_time TEXT NOT NULL
            );

            -- One row per found flag; the unique key is the duplicate guard.
            CREATE TABLE hunt_flags (
                nickname        TEXT NOT NULL REFERENCES hunt_results(nickname),
                flag            TEXT NOT NULL,
                found_at        TEXT NOT NULL,
                UNIQUE(nickname, flag)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
