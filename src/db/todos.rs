//! Todo persistence. Every query that touches an existing record filters on
//! both the record id and the owner, so another user's todo looks exactly
//! like a missing one.

use sqlx::{query, query_as, SqliteConnection};

use crate::error::{AppError, Result};
use crate::model::Todo;

pub const CONTENT_MIN_CHARS: usize = 3;
pub const CONTENT_MAX_CHARS: usize = 100;

fn validate_content(content: &str) -> Result<()> {
    let len = content.chars().count();
    if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&len) {
        return Err(AppError::Validation(format!(
            "content must be between {} and {} characters",
            CONTENT_MIN_CHARS, CONTENT_MAX_CHARS
        )));
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".to_string())
}

pub async fn create(
    conn: &mut SqliteConnection,
    owner_id: i64,
    content: &str,
    completed: bool,
) -> Result<Todo> {
    validate_content(content)?;

    let todo = query_as::<_, Todo>(
        "INSERT INTO todos (content, completed, user_id) VALUES (?, ?, ?) RETURNING id, content, completed, user_id",
    )
    .bind(content)
    .bind(completed)
    .bind(owner_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(todo)
}

pub async fn list(conn: &mut SqliteConnection, owner_id: i64) -> Result<Vec<Todo>> {
    let todos = query_as::<_, Todo>(
        "SELECT id, content, completed, user_id FROM todos WHERE user_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(todos)
}

pub async fn get(conn: &mut SqliteConnection, owner_id: i64, id: i64) -> Result<Todo> {
    query_as::<_, Todo>(
        "SELECT id, content, completed, user_id FROM todos WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(not_found)
}

/// Replaces content and completion flag. `payload_id`, when the client sends
/// one, must name the same record as `id`.
pub async fn update(
    conn: &mut SqliteConnection,
    owner_id: i64,
    id: i64,
    payload_id: Option<i64>,
    content: &str,
    completed: bool,
) -> Result<Todo> {
    let existing = get(conn, owner_id, id).await?;

    if payload_id.is_some_and(|payload_id| payload_id != existing.id) {
        return Err(AppError::Conflict(
            "Cannot change the ID of a todo item".to_string(),
        ));
    }
    validate_content(content)?;

    query_as::<_, Todo>(
        "UPDATE todos SET content = ?, completed = ? WHERE id = ? AND user_id = ? RETURNING id, content, completed, user_id",
    )
    .bind(content)
    .bind(completed)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(not_found)
}

pub async fn delete(conn: &mut SqliteConnection, owner_id: i64, id: i64) -> Result<()> {
    let rows_affected = query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}
