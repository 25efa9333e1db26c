use sqlx::{query_as, SqliteConnection};

use crate::error::{AppError, Result};
use crate::model::User;

const USER_COLUMNS: &str = "id, username, email, hashed_password";

pub async fn insert(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> Result<User> {
    let result = query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, hashed_password) VALUES (?, ?, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .fetch_one(&mut *conn)
    .await;

    match result {
        Ok(user) => Ok(user),
        // A concurrent signup can slip past the pre-checks; the constraint decides.
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            if db_err.message().contains("users.username") {
                Err(AppError::Validation("Username already registered".to_string()))
            } else {
                Err(AppError::Validation("Email already registered".to_string()))
            }
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>> {
    let user = query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
    let user = query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>> {
    let user = query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}
