use crate::Database;
use crate::models::ParticipantRow;
use anyhow::{Result, bail};
use rusqlite::{Connection, Row};
use tracing::{debug, info};
use uuid::Uuid;

const SLUG_ATTEMPTS: usize = 8;

const SELECT_PARTICIPANT: &str = "
    SELECT p.id, p.name, p.slug, p.has_revealed, p.assigned_to_id, t.name, p.created_at
    FROM participants p
    LEFT JOIN participants t ON t.id = p.assigned_to_id";

impl Database {
    // -- Reads --

    pub fn list_participants(&self) -> Result<Vec<ParticipantRow>> {
        self.with_conn(|conn| {
            let sql = format!("{SELECT_PARTICIPANT} ORDER BY p.created_at ASC, p.rowid ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], map_participant)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_participant(&self, id: &str) -> Result<Option<ParticipantRow>> {
        self.with_conn(|conn| query_participant_by_id(conn, id))
    }

    pub fn get_participant_by_slug(&self, slug: &str) -> Result<Option<ParticipantRow>> {
        self.with_conn(|conn| {
            let sql = format!("{SELECT_PARTICIPANT} WHERE p.slug = ?1");
            let row = conn.query_row(&sql, [slug], map_participant).optional()?;
            Ok(row)
        })
    }

    pub fn participant_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM participants ORDER BY created_at ASC, rowid ASC")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    // -- Writes --

    /// Inserts every name in one transaction. `make_slug` is asked again
    /// whenever its answer is already taken.
    pub fn insert_participants<F>(
        &self,
        names: &[String],
        mut make_slug: F,
    ) -> Result<Vec<ParticipantRow>>
    where
        F: FnMut(&str) -> String,
    {
        let ids = self.with_tx(|tx| {
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                let slug = unused_slug(tx, name, &mut make_slug)?;
                let id = Uuid::new_v4().to_string();
                tx.execute(
                    "INSERT INTO participants (id, name, slug) VALUES (?1, ?2, ?3)",
                    (&id, name, &slug),
                )?;
                debug!("Created participant {} ({})", id, slug);
                ids.push(id);
            }
            Ok::<_, anyhow::Error>(ids)
        })?;

        info!("Created {} participant(s)", ids.len());

        self.with_conn(|conn| {
            let mut rows = Vec::with_capacity(ids.len());
            for id in &ids {
                if let Some(row) = query_participant_by_id(conn, id)? {
                    rows.push(row);
                }
            }
            Ok(rows)
        })
    }

    /// Returns `None` when no participant has this id.
    pub fn rename_participant(&self, id: &str, name: &str) -> Result<Option<ParticipantRow>> {
        self.with_conn(|conn| {
            let changed =
                conn.execute("UPDATE participants SET name = ?2 WHERE id = ?1", (id, name))?;
            if changed == 0 {
                return Ok(None);
            }
            query_participant_by_id(conn, id)
        })
    }

    /// Detaches the participant from the draw on both sides, then removes it.
    /// Returns `false` when no participant has this id.
    pub fn delete_participant(&self, id: &str) -> Result<bool> {
        self.with_tx(|tx| {
            let exists = tx
                .query_row("SELECT 1 FROM participants WHERE id = ?1", [id], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                return Ok(false);
            }

            tx.execute("UPDATE participants SET assigned_to_id = NULL WHERE id = ?1", [id])?;
            let orphaned = tx.execute(
                "UPDATE participants SET assigned_to_id = NULL WHERE assigned_to_id = ?1",
                [id],
            )?;
            tx.execute("DELETE FROM participants WHERE id = ?1", [id])?;

            info!("Deleted participant {} ({} gifter(s) unassigned)", id, orphaned);
            Ok::<_, anyhow::Error>(true)
        })
    }

    /// Clears every assignment and reveal flag. Returns the number of rows touched.
    pub fn reset_draw(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let cleared = conn.execute(
                "UPDATE participants SET assigned_to_id = NULL, has_revealed = 0",
                [],
            )?;
            info!("Draw reset ({} participant(s))", cleared);
            Ok(cleared)
        })
    }
}

fn unused_slug<F>(conn: &Connection, name: &str, make_slug: &mut F) -> Result<String>
where
    F: FnMut(&str) -> String,
{
    for _ in 0..SLUG_ATTEMPTS {
        let slug = make_slug(name);
        let taken = conn
            .query_row("SELECT 1 FROM participants WHERE slug = ?1", [&slug], |_| Ok(()))
            .optional()?
            .is_some();
        if !taken {
            return Ok(slug);
        }
        debug!("Slug {} already taken, regenerating", slug);
    }
    bail!("could not find a free slug for '{}' after {} attempts", name, SLUG_ATTEMPTS)
}

pub(crate) fn query_participant_by_id(
    conn: &Connection,
    id: &str,
) -> Result<Option<ParticipantRow>> {
    let sql = format!("{SELECT_PARTICIPANT} WHERE p.id = ?1");
    let row = conn.query_row(&sql, [id], map_participant).optional()?;
    Ok(row)
}

fn map_participant(row: &Row<'_>) -> rusqlite::Result<ParticipantRow> {
    Ok(ParticipantRow {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        has_revealed: row.get(3)?,
        assigned_to_id: row.get(4)?,
        assigned_to_name: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
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
