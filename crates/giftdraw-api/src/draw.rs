use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use giftdraw_types::api::{DrawPage, DrawPageParticipant, RevealRequest, RevealResponse};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::{AppState, blocking};

/// POST /reveal
pub async fn reveal(
    State(state): State<AppState>,
    AppJson(req): AppJson<RevealRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let participant_id = req
        .participant_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Participant id required".into()))?;

    let outcome = blocking(&state, move |s| {
        Ok(s.db.reveal(&participant_id, s.policy, s.rng.as_ref())?)
    })
    .await?;

    Ok(Json(RevealResponse {
        assigned_to_name: outcome.assigned_to_name,
        already_assigned: outcome.already_assigned,
    }))
}

/// GET /draw/{slug}: what a personal link shows before and after the reveal.
pub async fn draw_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (row, all_names) = blocking(&state, move |s| {
        let row = s.db.get_participant_by_slug(&slug)?;
        let names = s.db.participant_names()?;
        Ok((row, names))
    })
    .await?;

    let row = row.ok_or_else(|| ApiError::NotFound("Participant not found".into()))?;

    Ok(Json(DrawPage {
        participant: DrawPageParticipant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            has_revealed: row.has_revealed,
            assigned_to_name: row.assigned_to_name,
        },
        all_names,
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
