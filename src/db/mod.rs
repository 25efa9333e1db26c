pub mod todos;
pub mod users;

use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::error::Result;

const SCHEMA: [&str; 4] = [
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0,
        user_id INTEGER NOT NULL REFERENCES users(id)
    );"#,
    "CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos (user_id);",
    "CREATE INDEX IF NOT EXISTS idx_todos_content ON todos (content);",
];

/// Opens a connection pool, creating the database file first if needed.
///
/// An in-memory URL gets a single connection that is never recycled, since
/// the database lives only as long as that connection.
pub async fn connect(url: &str, max_connections: u32) -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    if !in_memory && !Sqlite::database_exists(url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", url);
        Sqlite::create_database(url).await?;
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!("Connection to the database is successful");
    Ok(pool)
}

/// Creates the `users` and `todos` tables if they don't exist.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("database schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Pool<Sqlite> {
    let pool = connect("sqlite::memory:", 1).await.expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.expect("second run should be a no-op");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'todos') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, vec!["todos", "users"]);
    }

    #[tokio::test]
    async fn test_todo_without_existing_owner_is_refused() {
        let pool = test_pool().await;

        let result = sqlx::query("INSERT INTO todos (content, completed, user_id) VALUES ('orphan', 0, 12345)")
            .execute(&pool)
            .await;

        assert!(result.is_err(), "foreign key should reject unknown owner");
    }
}
