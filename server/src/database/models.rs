//! Database models
//!
//! Rust structs representing database entities and the request bodies
//! that create or patch them. All models use serde for the JSON API.

use crate::config::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level namespace grouping boards
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Four-digit access PIN, never sent to clients
    pub pin: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn has_pin(&self) -> bool {
        self.pin.is_some()
    }

    /// Whether `candidate` opens this project
    pub fn accepts_pin(&self, candidate: Option<&str>) -> bool {
        match &self.pin {
            Some(pin) => candidate == Some(pin.as_str()),
            None => true,
        }
    }
}

/// Project as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub has_pin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            has_pin: project.has_pin(),
            id: project.id,
            name: project.name,
            created_at: project.created_at,
        }
    }
}

/// Create project request
#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub pin: Option<String>,
}

/// Update project request; only the name can change
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
}

/// A canvas holding positioned notes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub background_color: String,
    pub snapping: bool,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// Create board request
#[derive(Debug, Default, Deserialize)]
pub struct CreateBoardRequest {
    pub name: Option<String>,
}

/// Partial board update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBoardRequest {
    pub background_color: Option<String>,
    pub name: Option<String>,
    pub snapping: Option<bool>,
}

/// One entry of a reorder request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardPosition {
    pub id: i64,
    pub position: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReorderBoardsRequest {
    #[serde(default)]
    pub order: Vec<BoardPosition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoveBoardRequest {
    pub project_id: Option<i64>,
}

/// Horizontal text alignment inside a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A positioned, styled text block on a board
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub board_id: i64,
    /// HTML produced by the client editor
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub z_index: i64,
    pub font: String,
    pub font_color: String,
    pub size: i64,
    pub h_align: HAlign,
    pub transparent_colors: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create note request; every field but `board_id` has a default
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub board_id: Option<i64>,
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub z_index: Option<i64>,
    pub font: Option<String>,
    pub font_color: Option<String>,
    pub size: Option<i64>,
    pub h_align: Option<HAlign>,
    pub transparent_colors: Option<bool>,
}

/// Note attributes after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub z_index: i64,
    pub font: String,
    pub font_color: String,
    pub size: i64,
    pub h_align: HAlign,
    pub transparent_colors: bool,
}

impl Default for NoteFields {
    fn default() -> Self {
        Self {
            content: String::new(),
            x: DEFAULT_NOTE_X,
            y: DEFAULT_NOTE_Y,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            color: DEFAULT_NOTE_COLOR.to_string(),
            z_index: DEFAULT_NOTE_Z_INDEX,
            font: DEFAULT_NOTE_FONT.to_string(),
            font_color: DEFAULT_NOTE_FONT_COLOR.to_string(),
            size: DEFAULT_NOTE_FONT_SIZE,
            h_align: HAlign::Left,
            transparent_colors: false,
        }
    }
}

impl From<CreateNoteRequest> for NoteFields {
    fn from(req: CreateNoteRequest) -> Self {
        let defaults = Self::default();
        Self {
            content: req.content.unwrap_or(defaults.content),
            x: req.x.unwrap_or(defaults.x),
            y: req.y.unwrap_or(defaults.y),
            width: req.width.unwrap_or(defaults.width),
            height: req.height.unwrap_or(defaults.height),
            color: req.color.unwrap_or(defaults.color),
            z_index: req.z_index.unwrap_or(defaults.z_index),
            font: req.font.unwrap_or(defaults.font),
            font_color: req.font_color.unwrap_or(defaults.font_color),
            size: req.size.unwrap_or(defaults.size),
            h_align: req.h_align.unwrap_or(defaults.h_align),
            transparent_colors: req.transparent_colors.unwrap_or(defaults.transparent_colors),
        }
    }
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        Self {
            content: note.content.clone(),
            x: note.x,
            y: note.y,
            width: note.width,
            height: note.height,
            color: note.color.clone(),
            z_index: note.z_index,
            font: note.font.clone(),
            font_color: note.font_color.clone(),
            size: note.size,
            h_align: note.h_align,
            transparent_colors: note.transparent_colors,
        }
    }
}

/// Whitelisted partial note update; unknown keys in the body are dropped
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub z_index: Option<i64>,
    pub font: Option<String>,
    pub font_color: Option<String>,
    pub size: Option<i64>,
    pub h_align: Option<HAlign>,
    pub transparent_colors: Option<bool>,
}

/// Acknowledgement body for operations with nothing else to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    pub fn deleted() -> Self {
        Self {
            status: "deleted".to_string(),
        }
    }
}

/// Result of a reorder request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub status: String,
    pub updated: u64,
}
