//! PIN-gated HTML entry point
//!
//! `/project/{name}` and `/project/{name}/{pin}` serve the board page for a
//! project. The page only bootstraps the client script; boards and notes are
//! fetched through the JSON API.

use crate::app::AppState;
use crate::database::{Project, ProjectResponse};
use crate::error::{AppError, Result};
use axum::extract::{Path, State};
use axum::response::Html;

/// Open a project that has no PIN
pub async fn open_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>> {
    render_project(&state, &name, None).await
}

/// Open a project with the PIN given in the path
pub async fn open_project_with_pin(
    State(state): State<AppState>,
    Path((name, pin)): Path<(String, String)>,
) -> Result<Html<String>> {
    render_project(&state, &name, Some(&pin)).await
}

async fn render_project(state: &AppState, name: &str, pin: Option<&str>) -> Result<Html<String>> {
    let project = state.repo.get_project_by_name(name).await?;

    if !project.accepts_pin(pin) {
        tracing::info!("Rejected PIN for project: {}", project.id);
        return Err(AppError::Forbidden(format!(
            "Invalid PIN for project '{}'",
            project.name
        )));
    }

    Ok(Html(board_page(&project)?))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Board page with the project embedded for the client script
fn board_page(project: &Project) -> Result<String> {
    let bootstrap = serde_json::to_string(&ProjectResponse::from(project.clone()))?
        .replace("</", "<\\/");
    let title = escape_html(&project.name);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} - StickyBoard</title>
  <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
  <div id="app" data-project-id="{id}"></div>
  <script>
    window.CURRENT_PROJECT = {bootstrap};
    const currentProjectId = {id};
  </script>
  <script src="/static/js/app.js"></script>
</body>
</html>
"#,
        id = project.id,
    ))
}
