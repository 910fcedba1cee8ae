use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use giftdraw_db::models::ParticipantRow;
use giftdraw_types::api::{
    CreateParticipantsRequest, CreateParticipantsResponse, DeleteParticipantQuery,
    RenameParticipantRequest, ResetResponse, SuccessResponse,
};
use giftdraw_types::{Participant, TargetRef};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::names;
use crate::state::{AppState, blocking};

/// GET /participants
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = blocking(&state, |s| Ok(s.db.list_participants()?)).await?;
    Ok(Json(rows.into_iter().map(to_participant).collect::<Vec<_>>()))
}

/// POST /participants, with `{ name }` or a newline-delimited `{ names }`.
pub async fn create_participants(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateParticipantsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = req.names.is_some();
    let entries = names::collect_names(req.name.as_deref(), req.names.as_deref());
    if entries.is_empty() {
        return Err(ApiError::Validation("Name required".into()));
    }

    let rows = blocking(&state, move |s| {
        let rows = s
            .db
            .insert_participants(&entries, |name| names::make_slug(name, s.rng.as_ref()))?;
        Ok(rows)
    })
    .await?;

    let mut created: Vec<Participant> = rows.into_iter().map(to_participant).collect();
    let body = match (batch, created.len()) {
        (false, 1) => CreateParticipantsResponse::One(created.remove(0)),
        _ => CreateParticipantsResponse::Many(created),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// PATCH /participants
pub async fn rename_participant(
    State(state): State<AppState>,
    AppJson(req): AppJson<RenameParticipantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = required(req.id, "Id required")?;
    let name = required(req.name, "Name required")?;

    let row = blocking(&state, move |s| Ok(s.db.rename_participant(&id, &name)?))
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant not found".into()))?;

    Ok(Json(to_participant(row)))
}

/// DELETE /participants?id=
pub async fn delete_participant(
    State(state): State<AppState>,
    Query(query): Query<DeleteParticipantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = required(query.id, "Id required")?;

    let deleted = blocking(&state, move |s| Ok(s.db.delete_participant(&id)?)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Participant not found".into()));
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /reset
pub async fn reset_draw(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cleared = blocking(&state, |s| Ok(s.db.reset_draw()?)).await?;
    info!("All assignments cleared by admin");
    Ok(Json(ResetResponse {
        success: true,
        cleared,
    }))
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(message.into()))
}

pub(crate) fn to_participant(row: ParticipantRow) -> Participant {
    let assigned_to = match (row.assigned_to_id, row.assigned_to_name) {
        (Some(id), Some(name)) => Some(TargetRef { id, name }),
        _ => None,
    };

    Participant {
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on participant '{}'", row.created_at, row.id);
            DateTime::default()
        }),
        id: row.id,
        name: row.name,
        slug: row.slug,
        has_revealed: row.has_revealed,
        assigned_to,
    }
}

/// SQLite's `datetime('now')` has no timezone; it is UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(assigned: Option<(&str, &str)>) -> ParticipantRow {
        ParticipantRow {
            id: "p1".into(),
            name: "Ana".into(),
            slug: "ana-000000".into(),
            has_revealed: assigned.is_some(),
            assigned_to_id: assigned.map(|(id, _)| id.to_string()),
            assigned_to_name: assigned.map(|(_, name)| name.to_string()),
            created_at: "2025-12-01 18:30:00".into(),
        }
    }

    #[test]
    fn converts_rows() {
        let p = to_participant(row(Some(("p2", "Luis"))));
        assert_eq!(p.assigned_to, Some(TargetRef { id: "p2".into(), name: "Luis".into() }));
        assert_eq!(p.created_at.to_rfc3339(), "2025-12-01T18:30:00+00:00");

        assert!(to_participant(row(None)).assigned_to.is_none());
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  x ".into()), "m").unwrap(), "x");
        assert!(matches!(required(Some("   ".into()), "m"), Err(ApiError::Validation(_))));
        assert!(matches!(required(None, "m"), Err(ApiError::Validation(_))));
    }
}
