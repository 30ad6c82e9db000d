//! HTTP routes exposed to the client
//!
//! This module organizes handlers into logical submodules:
//! - `projects`: Project listing, creation and rename
//! - `boards`: Board CRUD, reorder, duplicate and move
//! - `notes`: Note CRUD
//! - `pages`: PIN-gated HTML entry page
//! - `payload`: JSON body extractor shared by the handlers

pub mod boards;
pub mod notes;
pub mod pages;
pub mod payload;
pub mod projects;

use crate::app::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // ===== Projects =====
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project).patch(projects::update_project),
        )
        .route(
            "/api/projects/{id}/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route("/project/{name}", get(pages::open_project))
        .route("/project/{name}/{pin}", get(pages::open_project_with_pin))
        // ===== Boards =====
        .route("/api/boards/reorder", patch(boards::reorder_boards))
        .route(
            "/api/boards/{id}",
            patch(boards::update_board).delete(boards::delete_board),
        )
        .route("/api/boards/{id}/duplicate", post(boards::duplicate_board))
        .route("/api/boards/{id}/move", patch(boards::move_board))
        .route("/api/boards/{id}/notes", get(notes::list_notes))
        // ===== Notes =====
        .route("/api/notes", post(notes::create_note))
        .route(
            "/api/notes/{id}",
            patch(notes::update_note).delete(notes::delete_note),
        )
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
