//! Repository layer for database operations
//!
//! This module provides CRUD operations for projects, boards and notes.
//! Every operation that writes more than one row runs in a transaction.

use super::models::*;
use crate::config::{BOARD_COPY_SUFFIX, DEFAULT_BOARD_BACKGROUND};
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// Map a unique-index violation on `projects.name` to a validation error.
fn project_name_conflict(err: sqlx::Error, name: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::validation(format!("Project name already exists: {}", name))
        }
        _ => AppError::Database(err),
    }
}

/// Next free position at the end of a project's board ordering.
async fn next_board_position(conn: &mut SqliteConnection, project_id: i64) -> Result<i64> {
    let position: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM boards WHERE project_id = ?",
    )
    .bind(project_id)
    .fetch_one(conn)
    .await?;

    Ok(position)
}

async fn project_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(found.is_some())
}

async fn fetch_board(conn: &mut SqliteConnection, id: i64) -> Result<Board> {
    sqlx::query_as::<_, Board>("SELECT * FROM boards WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Board", id))
}

async fn board_count(conn: &mut SqliteConnection) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
        .fetch_one(conn)
        .await?;

    Ok(count)
}

async fn insert_note(
    conn: &mut SqliteConnection,
    board_id: i64,
    fields: &NoteFields,
) -> Result<Note> {
    let now = Utc::now();

    let note = sqlx::query_as::<_, Note>(
        r#"
        INSERT INTO notes (
            board_id, content, x, y, width, height, color, z_index,
            font, font_color, size, h_align, transparent_colors,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(board_id)
    .bind(&fields.content)
    .bind(fields.x)
    .bind(fields.y)
    .bind(fields.width)
    .bind(fields.height)
    .bind(&fields.color)
    .bind(fields.z_index)
    .bind(&fields.font)
    .bind(&fields.font_color)
    .bind(fields.size)
    .bind(fields.h_align)
    .bind(fields.transparent_colors)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(note)
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Projects =====

    /// List all projects ordered by id
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    /// Get a project by ID
    pub async fn get_project(&self, id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Project", id))
    }

    /// Get a project by its unique name
    pub async fn get_project_by_name(&self, name: &str) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Project", name))
    }

    /// Create a project; `name` and `pin` must already be validated
    pub async fn create_project(&self, name: &str, pin: Option<&str>) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, pin, created_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(pin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| project_name_conflict(e, name))?;

        tracing::debug!("Created project: {}", project.id);
        Ok(project)
    }

    /// Rename a project
    pub async fn rename_project(&self, id: i64, name: &str) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects SET name = ? WHERE id = ? RETURNING *",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| project_name_conflict(e, name))?
        .ok_or_else(|| AppError::not_found("Project", id))?;

        tracing::debug!("Renamed project {} to {}", id, name);
        Ok(project)
    }

    // ===== Boards =====

    /// List the boards of a project in display order
    pub async fn list_boards(&self, project_id: i64) -> Result<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT * FROM boards
            WHERE project_id = ?
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }

    /// Get a board by ID
    pub async fn get_board(&self, id: i64) -> Result<Board> {
        let mut conn = self.pool.acquire().await?;
        fetch_board(&mut conn, id).await
    }

    /// Create a board at the end of a project's ordering
    pub async fn create_board(&self, project_id: i64, name: &str) -> Result<Board> {
        let mut tx = self.pool.begin().await?;

        if !project_exists(&mut tx, project_id).await? {
            return Err(AppError::not_found("Project", project_id));
        }

        let position = next_board_position(&mut tx, project_id).await?;

        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (project_id, name, background_color, snapping, position, created_at)
            VALUES (?, ?, ?, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(name)
        .bind(DEFAULT_BOARD_BACKGROUND)
        .bind(position)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created board: {} in project: {}", board.id, project_id);
        Ok(board)
    }

    /// Apply a partial update to a board
    pub async fn update_board(&self, id: i64, req: UpdateBoardRequest) -> Result<Board> {
        let mut tx = self.pool.begin().await?;
        let board = fetch_board(&mut tx, id).await?;

        let board = sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards SET background_color = ?, name = ?, snapping = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(req.background_color.unwrap_or(board.background_color))
        .bind(req.name.unwrap_or(board.name))
        .bind(req.snapping.unwrap_or(board.snapping))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Updated board: {}", id);
        Ok(board)
    }

    /// Set board positions; ids with no matching board are skipped.
    ///
    /// Returns the number of boards that were updated.
    pub async fn reorder_boards(&self, order: &[BoardPosition]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for item in order {
            updated += sqlx::query("UPDATE boards SET position = ? WHERE id = ?")
                .bind(item.position)
                .bind(item.id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::debug!("Reordered {} of {} boards", updated, order.len());
        Ok(updated)
    }

    /// Delete a board and all of its notes.
    ///
    /// Refuses to delete the last remaining board of the whole database.
    pub async fn delete_board(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        fetch_board(&mut tx, id).await?;

        if board_count(&mut tx).await? <= 1 {
            return Err(AppError::InvariantViolation(
                "At least one board must exist".to_string(),
            ));
        }

        let notes = sqlx::query("DELETE FROM notes WHERE board_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Deleted board: {} with {} notes", id, notes);
        Ok(())
    }

    /// Copy a board and every note on it into a new board in the same project
    pub async fn duplicate_board(&self, id: i64) -> Result<Board> {
        let mut tx = self.pool.begin().await?;

        let source = fetch_board(&mut tx, id).await?;
        let position = next_board_position(&mut tx, source.project_id).await?;

        let copy = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (project_id, name, background_color, snapping, position, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(source.project_id)
        .bind(format!("{}{}", source.name, BOARD_COPY_SUFFIX))
        .bind(&source.background_color)
        .bind(source.snapping)
        .bind(position)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let notes = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE board_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        for note in &notes {
            insert_note(&mut tx, copy.id, &NoteFields::from(note)).await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Duplicated board: {} into {} with {} notes",
            id,
            copy.id,
            notes.len()
        );
        Ok(copy)
    }

    /// Reassign a board to another project, appending it to that project's ordering
    pub async fn move_board(&self, id: i64, project_id: i64) -> Result<Board> {
        let mut tx = self.pool.begin().await?;

        fetch_board(&mut tx, id).await?;

        if !project_exists(&mut tx, project_id).await? {
            return Err(AppError::not_found("Project", project_id));
        }

        let position = next_board_position(&mut tx, project_id).await?;

        let board = sqlx::query_as::<_, Board>(
            "UPDATE boards SET project_id = ?, position = ? WHERE id = ? RETURNING *",
        )
        .bind(project_id)
        .bind(position)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Moved board: {} to project: {}", id, project_id);
        Ok(board)
    }

    // ===== Notes =====

    /// List the notes on a board
    pub async fn list_notes(&self, board_id: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE board_id = ? ORDER BY id")
            .bind(board_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(notes)
    }

    /// Get a note by ID
    pub async fn get_note(&self, id: i64) -> Result<Note> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Note", id))
    }

    /// Create a note on an existing board
    pub async fn create_note(&self, board_id: i64, fields: &NoteFields) -> Result<Note> {
        let mut conn = self.pool.acquire().await?;
        let note = insert_note(&mut conn, board_id, fields).await?;

        tracing::debug!("Created note: {} on board: {}", note.id, board_id);
        Ok(note)
    }

    /// Apply a whitelisted partial update to a note and touch `updated_at`
    pub async fn update_note(&self, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE notes SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(content) = req.content {
            query.push(", content = ").push_bind(content);
        }
        if let Some(x) = req.x {
            query.push(", x = ").push_bind(x);
        }
        if let Some(y) = req.y {
            query.push(", y = ").push_bind(y);
        }
        if let Some(width) = req.width {
            query.push(", width = ").push_bind(width);
        }
        if let Some(height) = req.height {
            query.push(", height = ").push_bind(height);
        }
        if let Some(color) = req.color {
            query.push(", color = ").push_bind(color);
        }
        if let Some(z_index) = req.z_index {
            query.push(", z_index = ").push_bind(z_index);
        }
        if let Some(font) = req.font {
            query.push(", font = ").push_bind(font);
        }
        if let Some(font_color) = req.font_color {
            query.push(", font_color = ").push_bind(font_color);
        }
        if let Some(size) = req.size {
            query.push(", size = ").push_bind(size);
        }
        if let Some(h_align) = req.h_align {
            query.push(", h_align = ").push_bind(h_align);
        }
        if let Some(transparent_colors) = req.transparent_colors {
            query.push(", transparent_colors = ").push_bind(transparent_colors);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING *");

        let note = query
            .build_query_as::<Note>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Note", id))?;

        tracing::debug!("Updated note: {}", id);
        Ok(note)
    }

    /// Delete a note
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::not_found("Note", id));
        }

        tracing::debug!("Deleted note: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    async fn count_boards(repo: &Repository) -> i64 {
        let mut conn = repo.pool.acquire().await.unwrap();
        board_count(&mut conn).await.unwrap()
    }

    async fn default_board(repo: &Repository) -> Board {
        let project = repo.list_projects().await.unwrap().remove(0);
        repo.list_boards(project.id).await.unwrap().remove(0)
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let repo = create_test_repo().await;

        let project = repo.create_project("Work", Some("1234")).await.unwrap();
        assert_eq!(project.name, "Work");
        assert!(project.has_pin());

        let fetched = repo.get_project(project.id).await.unwrap();
        assert_eq!(fetched.name, "Work");

        let by_name = repo.get_project_by_name("Work").await.unwrap();
        assert_eq!(by_name.id, project.id);
    }

    #[tokio::test]
    async fn test_duplicate_project_name_rejected() {
        let repo = create_test_repo().await;

        repo.create_project("Home", None).await.unwrap();
        let result = repo.create_project("Home", None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rename_project() {
        let repo = create_test_repo().await;

        let project = repo.create_project("Old", None).await.unwrap();
        let renamed = repo.rename_project(project.id, "New").await.unwrap();
        assert_eq!(renamed.name, "New");

        let missing = repo.rename_project(9999, "Nope").await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));

        repo.create_project("Taken", None).await.unwrap();
        let conflict = repo.rename_project(project.id, "Taken").await;
        assert!(matches!(conflict, Err(AppError::Validation(_))));
        assert_eq!(repo.get_project(project.id).await.unwrap().name, "New");
    }

    #[tokio::test]
    async fn test_create_board_appends_position() {
        let repo = create_test_repo().await;
        let project = repo.create_project("Boards", None).await.unwrap();

        let first = repo.create_board(project.id, "One").await.unwrap();
        let second = repo.create_board(project.id, "Two").await.unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(first.background_color, "#FFFFFF");
        assert!(!first.snapping);

        let missing = repo.create_board(9999, "Orphan").await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_board_partial() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;

        let updated = repo
            .update_board(
                board.id,
                UpdateBoardRequest {
                    background_color: Some("#123456".to_string()),
                    name: None,
                    snapping: Some(true),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.background_color, "#123456");
        assert_eq!(updated.name, board.name);
        assert!(updated.snapping);
    }

    #[tokio::test]
    async fn test_reorder_skips_unknown_ids() {
        let repo = create_test_repo().await;
        let project = repo.create_project("Order", None).await.unwrap();
        let a = repo.create_board(project.id, "A").await.unwrap();
        let b = repo.create_board(project.id, "B").await.unwrap();

        let updated = repo
            .reorder_boards(&[
                BoardPosition { id: a.id, position: 5 },
                BoardPosition { id: 9999, position: 0 },
                BoardPosition { id: b.id, position: 2 },
            ])
            .await
            .unwrap();

        assert_eq!(updated, 2);

        let boards = repo.list_boards(project.id).await.unwrap();
        assert_eq!(boards[0].id, b.id);
        assert_eq!(boards[1].id, a.id);
        assert_eq!(boards[1].position, 5);
    }

    #[tokio::test]
    async fn test_cannot_delete_last_board() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;

        let result = repo.delete_board(board.id).await;
        assert!(matches!(result, Err(AppError::InvariantViolation(_))));
        assert_eq!(count_boards(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_delete_board_removes_notes() {
        let repo = create_test_repo().await;
        let keep = default_board(&repo).await;
        let doomed = repo.create_board(keep.project_id, "Doomed").await.unwrap();

        let note = repo
            .create_note(doomed.id, &NoteFields::default())
            .await
            .unwrap();

        repo.delete_board(doomed.id).await.unwrap();

        assert!(repo.get_board(doomed.id).await.is_err());
        assert!(repo.get_note(note.id).await.is_err());
        assert_eq!(count_boards(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_board_copies_notes() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;

        let styled = NoteFields {
            content: "<b>hi</b>".to_string(),
            x: 10.5,
            y: 20.0,
            color: "#AABBCC".to_string(),
            z_index: 7,
            font: "Courier".to_string(),
            h_align: HAlign::Right,
            transparent_colors: true,
            ..NoteFields::default()
        };
        let original = repo.create_note(board.id, &styled).await.unwrap();
        repo.create_note(board.id, &NoteFields::default()).await.unwrap();

        let copy = repo.duplicate_board(board.id).await.unwrap();
        assert_eq!(copy.name, format!("{} (copy)", board.name));
        assert_eq!(copy.project_id, board.project_id);
        assert_eq!(copy.background_color, board.background_color);

        let copied = repo.list_notes(copy.id).await.unwrap();
        assert_eq!(copied.len(), 2);
        assert_ne!(copied[0].id, original.id);
        assert_eq!(NoteFields::from(&copied[0]), styled);
    }

    #[tokio::test]
    async fn test_move_board() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;
        let target = repo.create_project("Target", None).await.unwrap();

        let moved = repo.move_board(board.id, target.id).await.unwrap();
        assert_eq!(moved.project_id, target.id);

        let missing = repo.move_board(board.id, 9999).await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_note_defaults_and_update() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;

        let note = repo
            .create_note(board.id, &NoteFields::default())
            .await
            .unwrap();

        assert_eq!(note.x, 50.0);
        assert_eq!(note.y, 50.0);
        assert_eq!(note.width, 200.0);
        assert_eq!(note.height, 150.0);
        assert_eq!(note.color, "#FFF59D");
        assert_eq!(note.h_align, HAlign::Left);

        let stale = Utc::now() - chrono::Duration::days(1);
        sqlx::query("UPDATE notes SET updated_at = ? WHERE id = ?")
            .bind(stale)
            .bind(note.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let updated = repo
            .update_note(
                note.id,
                UpdateNoteRequest {
                    content: Some("moved".to_string()),
                    x: Some(300.0),
                    h_align: Some(HAlign::Center),
                    ..UpdateNoteRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "moved");
        assert_eq!(updated.x, 300.0);
        assert_eq!(updated.y, 50.0);
        assert_eq!(updated.h_align, HAlign::Center);
        assert!(updated.updated_at > stale);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_note_on_missing_board_fails() {
        let repo = create_test_repo().await;

        let result = repo.create_note(9999, &NoteFields::default()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_delete_note() {
        let repo = create_test_repo().await;
        let board = default_board(&repo).await;

        let note = repo
            .create_note(board.id, &NoteFields::default())
            .await
            .unwrap();

        repo.delete_note(note.id).await.unwrap();

        let again = repo.delete_note(note.id).await;
        assert!(matches!(again, Err(AppError::NotFound { .. })));
        assert!(repo.list_notes(board.id).await.unwrap().is_empty());
    }
}
