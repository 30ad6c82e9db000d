//! Note endpoints

use super::payload::Payload;
use crate::app::AppState;
use crate::config::PLACEHOLDER_NOTE_ID;
use crate::database::{CreateNoteRequest, Note, NoteFields, StatusResponse, UpdateNoteRequest};
use crate::error::{AppError, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// List the notes on a board
pub async fn list_notes(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> Result<Json<Vec<Note>>> {
    state.repo.get_board(board_id).await?;
    let notes = state.repo.list_notes(board_id).await?;
    Ok(Json(notes))
}

/// Create a note; absent attributes take the sticky-note defaults
pub async fn create_note(
    State(state): State<AppState>,
    Payload(mut req): Payload<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    let board_id = req
        .board_id
        .take()
        .ok_or_else(|| AppError::validation("board_id required"))?;

    match state.repo.get_board(board_id).await {
        Ok(_) => {}
        Err(AppError::NotFound { .. }) => {
            return Err(AppError::validation(format!(
                "board_id {} does not reference an existing board",
                board_id
            )));
        }
        Err(e) => return Err(e),
    }

    let note = state
        .repo
        .create_note(board_id, &NoteFields::from(req))
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Patch whitelisted note fields; the placeholder id is accepted and ignored
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Payload<UpdateNoteRequest>>,
) -> Result<Json<StatusResponse>> {
    if id == PLACEHOLDER_NOTE_ID {
        tracing::trace!("Ignoring update to placeholder note");
        return Ok(Json(StatusResponse::ok()));
    }

    let Payload(req) = payload?;
    state.repo.update_note(id, req).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>> {
    state.repo.delete_note(id).await?;
    Ok(Json(StatusResponse::deleted()))
}
