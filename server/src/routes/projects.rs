//! Project endpoints
//!
//! Projects are listed, created and renamed here. The PIN is write-only:
//! responses only say whether one is set.

use super::payload::Payload;
use crate::app::AppState;
use crate::config::PIN_LENGTH;
use crate::database::{CreateProjectRequest, ProjectResponse, UpdateProjectRequest};
use crate::error::{AppError, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Trimmed project name, rejecting blanks
fn validate_name(name: Option<&str>) -> Result<&str> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(AppError::validation("Project name is required")),
    }
}

/// A blank or absent PIN means the project is open
fn validate_pin(pin: Option<&str>) -> Result<Option<&str>> {
    let pin = match pin {
        Some(pin) if !pin.is_empty() => pin,
        _ => return Ok(None),
    };

    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(format!(
            "PIN must be exactly {} digits",
            PIN_LENGTH
        )));
    }

    Ok(Some(pin))
}

/// List all projects
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state.repo.list_projects().await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Get a project by ID
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>> {
    let project = state.repo.get_project(id).await?;
    Ok(Json(project.into()))
}

/// Create a project, optionally protected by a PIN
pub async fn create_project(
    State(state): State<AppState>,
    Payload(req): Payload<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let name = validate_name(req.name.as_deref())?;
    let pin = validate_pin(req.pin.as_deref())?;

    tracing::info!("Creating project: {}", name);
    let project = state.repo.create_project(name, pin).await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Rename a project; no other field can be patched
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload(req): Payload<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>> {
    let project = match req.name.as_deref() {
        Some(name) => {
            let name = validate_name(Some(name))?;
            state.repo.rename_project(id, name).await?
        }
        None => state.repo.get_project(id).await?,
    };

    Ok(Json(project.into()))
}
