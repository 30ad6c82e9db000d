//! Board endpoints
//!
//! Listing and creation are scoped to a project; every other operation
//! addresses a board by id.

use super::payload::Payload;
use crate::app::AppState;
use crate::config::DEFAULT_BOARD_NAME;
use crate::database::{
    Board, CreateBoardRequest, MoveBoardRequest, ReorderBoardsRequest, ReorderResponse,
    StatusResponse, UpdateBoardRequest,
};
use crate::error::{AppError, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`
fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 4 | 6 | 8)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// List the boards of a project
pub async fn list_boards(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Board>>> {
    state.repo.get_project(project_id).await?;
    let boards = state.repo.list_boards(project_id).await?;
    Ok(Json(boards))
}

/// Create a board in a project
pub async fn create_board(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Payload(req): Payload<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>)> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BOARD_NAME);

    tracing::info!("Creating board '{}' in project {}", name, project_id);
    let board = state.repo.create_board(project_id, name).await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// Patch background color, name or snapping
pub async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload(mut req): Payload<UpdateBoardRequest>,
) -> Result<Json<Board>> {
    if let Some(color) = &req.background_color {
        if !is_hex_color(color) {
            return Err(AppError::validation(format!(
                "background_color must be a hex color like #FFFFFF, got '{}'",
                color
            )));
        }
    }

    if let Some(name) = req.name.take() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Board name must not be empty"));
        }
        req.name = Some(name.to_string());
    }

    let board = state.repo.update_board(id, req).await?;
    Ok(Json(board))
}

/// Apply new positions; unknown ids are ignored
pub async fn reorder_boards(
    State(state): State<AppState>,
    Payload(req): Payload<ReorderBoardsRequest>,
) -> Result<Json<ReorderResponse>> {
    let updated = state.repo.reorder_boards(&req.order).await?;

    Ok(Json(ReorderResponse {
        status: "ok".to_string(),
        updated,
    }))
}

/// Delete a board with its notes, unless it is the last board
pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>> {
    tracing::info!("Deleting board: {}", id);
    state.repo.delete_board(id).await?;
    Ok(Json(StatusResponse::deleted()))
}

/// Deep-copy a board and its notes
pub async fn duplicate_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Board>)> {
    tracing::info!("Duplicating board: {}", id);
    let board = state.repo.duplicate_board(id).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// Reassign a board to another project
pub async fn move_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload(req): Payload<MoveBoardRequest>,
) -> Result<Json<Board>> {
    let project_id = req
        .project_id
        .ok_or_else(|| AppError::validation("project_id required"))?;

    tracing::info!("Moving board {} to project {}", id, project_id);
    let board = state.repo.move_board(id, project_id).await?;

    Ok(Json(board))
}
