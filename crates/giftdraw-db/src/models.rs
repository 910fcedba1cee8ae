/// Database row types, mapped straight from SQLite rows.
/// Distinct from giftdraw-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct ParticipantRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub has_revealed: bool,
    pub assigned_to_id: Option<String>,
    /// Joined from the target row; `None` whenever `assigned_to_id` is.
    pub assigned_to_name: Option<String>,
    pub created_at: String,
}

/// Where the draw stands, read inside the reveal transaction.
#[derive(Debug, Clone, Default)]
pub struct DrawState {
    /// Participants that have not drawn anyone yet, in insertion order.
    pub pending: Vec<String>,
    /// Participants nobody has drawn yet, in insertion order.
    pub open: Vec<String>,
}
