use serde::{Deserialize, Serialize};

use crate::models::Participant;

// -- Participants --

/// Either a single `name`, a newline-delimited `names` batch, or both.
#[derive(Debug, Default, Deserialize)]
pub struct CreateParticipantsRequest {
    pub name: Option<String>,
    pub names: Option<String>,
}

/// A bare `{ name }` gets the participant back, a `{ names }` batch gets a list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateParticipantsResponse {
    One(Participant),
    Many(Vec<Participant>),
}

#[derive(Debug, Deserialize)]
pub struct RenameParticipantRequest {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParticipantQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub cleared: usize,
}

// -- Draw --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    pub participant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub assigned_to_name: String,
    pub already_assigned: bool,
}

/// What a participant's personal link resolves to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawPage {
    pub participant: DrawPageParticipant,
    /// Every participant name, used as the pool shown while the draw animates.
    pub all_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawPageParticipant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub has_revealed: bool,
    pub assigned_to_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
