use anyhow::anyhow;
use giftdraw_types::{DrawPolicy, RandomSource};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::Database;
use crate::draw;
use crate::models::DrawState;
use crate::queries::query_participant_by_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub assigned_to_name: String,
    pub already_assigned: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RevealError {
    #[error("participant not found")]
    NotFound,
    #[error("no participants left to assign")]
    Exhausted,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Database {
    /// Returns the participant's target, drawing one first if needed.
    ///
    /// Reading the open targets and claiming one happen in the same
    /// immediate transaction, so two reveals can never claim the same target.
    pub fn reveal(
        &self,
        participant_id: &str,
        policy: DrawPolicy,
        rng: &dyn RandomSource,
    ) -> Result<RevealOutcome, RevealError> {
        self.with_tx(|tx| {
            let participant =
                query_participant_by_id(tx, participant_id)?.ok_or(RevealError::NotFound)?;

            if let Some(name) = participant.assigned_to_name {
                tx.execute(
                    "UPDATE participants SET has_revealed = 1 WHERE id = ?1",
                    [participant_id],
                )?;
                return Ok(RevealOutcome {
                    assigned_to_name: name,
                    already_assigned: true,
                });
            }

            let state = load_draw_state(tx)?;
            let Some(target_id) = draw::choose_target(participant_id, &state, policy, rng) else {
                warn!(
                    "Participant {} has no one left to draw ({} pending, {} open)",
                    participant_id,
                    state.pending.len(),
                    state.open.len()
                );
                return Err(RevealError::Exhausted);
            };

            let claimed = tx.execute(
                "UPDATE participants SET assigned_to_id = ?2, has_revealed = 1
                 WHERE id = ?1
                   AND assigned_to_id IS NULL
                   AND NOT EXISTS (SELECT 1 FROM participants WHERE assigned_to_id = ?2)",
                (participant_id, &target_id),
            )?;
            if claimed == 0 {
                return Err(anyhow!("target {} was already claimed", target_id).into());
            }

            let name: String = tx.query_row(
                "SELECT name FROM participants WHERE id = ?1",
                [&target_id],
                |row| row.get(0),
            )?;

            info!("Participant {} drew a target (policy: {})", participant_id, policy);
            Ok(RevealOutcome {
                assigned_to_name: name,
                already_assigned: false,
            })
        })
    }

    /// Pending gifters and open targets, in insertion order.
    pub fn draw_state(&self) -> anyhow::Result<DrawState> {
        self.with_conn(load_draw_state)
    }
}

fn load_draw_state(conn: &Connection) -> anyhow::Result<DrawState> {
    let ids = |sql: &str| -> anyhow::Result<Vec<String>> {
        let mut stmt = conn.prepare(sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    };

    Ok(DrawState {
        pending: ids(
            "SELECT id FROM participants
             WHERE assigned_to_id IS NULL
             ORDER BY created_at ASC, rowid ASC",
        )?,
        open: ids(
            "SELECT p.id FROM participants p
             WHERE NOT EXISTS (SELECT 1 FROM participants g WHERE g.assigned_to_id = p.id)
             ORDER BY p.created_at ASC, p.rowid ASC",
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftdraw_types::{ScriptedRandom, SeededRandom};
    use std::collections::HashSet;

    struct Group {
        db: Database,
        ids: Vec<String>,
    }

    fn group(names: &[&str]) -> Group {
        let db = Database::open_in_memory().unwrap();
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let rows = db
            .insert_participants(&names, |name| format!("{}-slug", name.to_lowercase()))
            .unwrap();
        let ids = rows.into_iter().map(|r| r.id).collect();
        Group { db, ids }
    }

    fn exists(db: &Database, id: &str) -> bool {
        db.get_participant(id).unwrap().is_some()
    }

    #[test]
    fn abc_cycle() {
        let g = group(&["A", "B", "C"]);
        let rng = ScriptedRandom::new([0, 1, 0]);
        let (a, b, c) = (&g.ids[0], &g.ids[1], &g.ids[2]);

        // A: candidates [B, C] -> B
        let ra = g.db.reveal(a, DrawPolicy::Greedy, &rng).unwrap();
        assert_eq!(ra.assigned_to_name, "B");
        assert!(!ra.already_assigned);
        // B: candidates [A, C] -> C
        let rb = g.db.reveal(b, DrawPolicy::Greedy, &rng).unwrap();
        assert_eq!(rb.assigned_to_name, "C");
        // C: candidates [A]
        let rc = g.db.reveal(c, DrawPolicy::Greedy, &rng).unwrap();
        assert_eq!(rc.assigned_to_name, "A");

        for p in g.db.list_participants().unwrap() {
            assert!(p.has_revealed);
        }
    }

    #[test]
    fn greedy_can_exhaust() {
        let g = group(&["A", "B", "C"]);
        // A -> B, then B -> A, which strands C.
        let rng = ScriptedRandom::new([0, 0]);
        let (a, b, c) = (&g.ids[0], &g.ids[1], &g.ids[2]);

        assert_eq!(g.db.reveal(a, DrawPolicy::Greedy, &rng).unwrap().assigned_to_name, "B");
        assert_eq!(g.db.reveal(b, DrawPolicy::Greedy, &rng).unwrap().assigned_to_name, "A");
        let err = g.db.reveal(c, DrawPolicy::Greedy, &rng).unwrap_err();
        assert!(matches!(err, RevealError::Exhausted));

        let c_row = g.db.get_participant(c).unwrap().unwrap();
        assert!(c_row.assigned_to_id.is_none());
        assert!(!c_row.has_revealed);
    }

    #[test]
    fn greedy_a_to_c_then_b_to_a_still_completes() {
        let g = group(&["A", "B", "C"]);
        let rng = ScriptedRandom::new([1, 0, 0]);
        let (a, b, c) = (&g.ids[0], &g.ids[1], &g.ids[2]);

        // A: [B, C] -> C
        assert_eq!(g.db.reveal(a, DrawPolicy::Greedy, &rng).unwrap().assigned_to_name, "C");
        // B: [A] -> A
        assert_eq!(g.db.reveal(b, DrawPolicy::Greedy, &rng).unwrap().assigned_to_name, "A");
        // C: B is still unclaimed
        let rc = g.db.reveal(c, DrawPolicy::Greedy, &rng).unwrap();
        assert_eq!(rc.assigned_to_name, "B");
        assert!(!rc.already_assigned);
    }

    #[test]
    fn guarded_avoids_the_same_trap() {
        let g = group(&["A", "B", "C"]);
        let rng = ScriptedRandom::new([0, 0, 0]);
        let (a, b, c) = (&g.ids[0], &g.ids[1], &g.ids[2]);

        assert_eq!(g.db.reveal(a, DrawPolicy::Guarded, &rng).unwrap().assigned_to_name, "B");
        // A is no longer safe for B, so the same script yields C.
        assert_eq!(g.db.reveal(b, DrawPolicy::Guarded, &rng).unwrap().assigned_to_name, "C");
        assert_eq!(g.db.reveal(c, DrawPolicy::Guarded, &rng).unwrap().assigned_to_name, "A");
    }

    #[test]
    fn re_reveal_is_idempotent() {
        let g = group(&["A", "B", "C", "D"]);
        let rng = SeededRandom::new(42);
        let first = g.db.reveal(&g.ids[2], DrawPolicy::Guarded, &rng).unwrap();
        for _ in 0..3 {
            let again = g.db.reveal(&g.ids[2], DrawPolicy::Guarded, &rng).unwrap();
            assert_eq!(again.assigned_to_name, first.assigned_to_name);
            assert!(again.already_assigned);
        }
    }

    #[test]
    fn unknown_participant() {
        let g = group(&["A", "B"]);
        let err = g.db.reveal("missing", DrawPolicy::Guarded, &ScriptedRandom::default());
        assert!(matches!(err, Err(RevealError::NotFound)));
    }

    #[test]
    fn lone_participant_is_exhausted() {
        let g = group(&["A"]);
        let err = g.db.reveal(&g.ids[0], DrawPolicy::Guarded, &ScriptedRandom::default());
        assert!(matches!(err, Err(RevealError::Exhausted)));
    }

    #[test]
    fn everyone_reveals_without_duplicates() {
        for seed in 0..25 {
            let g = group(&["A", "B", "C", "D", "E", "F"]);
            let rng = SeededRandom::new(seed);
            for id in g.ids.iter().rev() {
                g.db.reveal(id, DrawPolicy::Guarded, &rng).unwrap();
            }

            let rows = g.db.list_participants().unwrap();
            let targets: HashSet<String> =
                rows.iter().filter_map(|r| r.assigned_to_id.clone()).collect();
            assert_eq!(targets.len(), rows.len(), "seed {seed}");
            assert!(rows.iter().all(|r| r.assigned_to_id.as_deref() != Some(r.id.as_str())));

            let state = g.db.draw_state().unwrap();
            assert!(state.pending.is_empty() && state.open.is_empty());
        }
    }

    #[test]
    fn reveal_after_reset_draws_again() {
        let g = group(&["A", "B"]);
        let rng = ScriptedRandom::default();
        g.db.reveal(&g.ids[0], DrawPolicy::Guarded, &rng).unwrap();
        g.db.reset_draw().unwrap();

        let again = g.db.reveal(&g.ids[0], DrawPolicy::Guarded, &rng).unwrap();
        assert!(!again.already_assigned);
        assert_eq!(again.assigned_to_name, "B");
    }

    #[test]
    fn deleted_target_frees_the_gifter() {
        let g = group(&["A", "B", "C"]);
        let rng = ScriptedRandom::new([0]);
        g.db.reveal(&g.ids[0], DrawPolicy::Greedy, &rng).unwrap(); // A -> B

        assert!(g.db.delete_participant(&g.ids[1]).unwrap());
        assert!(exists(&g.db, &g.ids[0]));

        let again = g.db.reveal(&g.ids[0], DrawPolicy::Guarded, &rng).unwrap();
        assert!(!again.already_assigned);
        assert_eq!(again.assigned_to_name, "C");
    }

    #[test]
    fn concurrent_reveals_never_share_a_target() {
        use std::sync::Arc;

        let g = group(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let db = Arc::new(g.db);
        let rng = Arc::new(SeededRandom::new(9));

        let handles: Vec<_> = g
            .ids
            .iter()
            .cloned()
            .map(|id| {
                let db = db.clone();
                let rng = rng.clone();
                std::thread::spawn(move || db.reveal(&id, DrawPolicy::Guarded, &*rng))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        let rows = db.list_participants().unwrap();
        let targets: HashSet<String> =
            rows.iter().filter_map(|r| r.assigned_to_id.clone()).collect();
        assert_eq!(targets.len(), 8);
    }
}
