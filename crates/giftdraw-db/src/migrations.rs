use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (participants)");
        conn.execute_batch(
            "
            CREATE TABLE participants (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                slug            TEXT NOT NULL UNIQUE,
                has_revealed    INTEGER NOT NULL DEFAULT 0,
                assigned_to_id  TEXT REFERENCES participants(id) ON DELETE SET NULL,
                created_at      TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (assigned_to_id IS NULL OR assigned_to_id <> id)
            );

            -- Reverse lookup of who drew whom; one gifter per target.
            CREATE UNIQUE INDEX idx_participants_assigned_to
                ON participants(assigned_to_id)
                WHERE assigned_to_id IS NOT NULL;

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn schema_rejects_self_and_duplicate_targets() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO participants (id, name, slug)
             VALUES ('a', 'A', 'a-1'), ('b', 'B', 'b-1'), ('c', 'C', 'c-1');",
        )
        .unwrap();

        assert!(conn
            .execute("UPDATE participants SET assigned_to_id = 'a' WHERE id = 'a'", [])
            .is_err());

        conn.execute("UPDATE participants SET assigned_to_id = 'c' WHERE id = 'a'", [])
            .unwrap();
        assert!(conn
            .execute("UPDATE participants SET assigned_to_id = 'c' WHERE id = 'b'", [])
            .is_err());
    }
}
