use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::{hash_password, verify_password},
    db::{todos, users},
    error::{AppError, Result},
    model::{CurrentUser, Todo},
    schema::{
        CreateTodoSchema, LoginSchema, SignupSchema, TokenResponse, UpdateTodoSchema,
        UserResponse,
    },
    AppState,
};

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 50;
const EMAIL_MAX_CHARS: usize = 100;

// Handler for the root route
pub async fn health_checker_handler() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "Welcome to the todo API!"
    }))
}

fn validate_signup(body: &SignupSchema) -> Result<()> {
    let username_len = body.username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_len) {
        return Err(AppError::Validation(format!(
            "username must be between {} and {} characters",
            USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
        )));
    }

    let email_len = body.email.chars().count();
    if email_len == 0 || email_len > EMAIL_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "email must be between 1 and {} characters",
            EMAIL_MAX_CHARS
        )));
    }

    if body.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }
    Ok(())
}

// Registers a new user; the stored password is hashed
pub async fn signup(
    State(data): State<Arc<AppState>>,
    body: std::result::Result<Json<SignupSchema>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(body) = body?;
    validate_signup(&body)?;

    let mut conn = data.db.acquire().await?;

    if users::find_by_username(&mut conn, &body.username).await?.is_some() {
        return Err(AppError::Validation("Username already registered".to_string()));
    }
    if users::find_by_email(&mut conn, &body.email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let hashed_password = hash_password(&body.password)?;
    let user = users::insert(&mut conn, &body.username, &body.email, &hashed_password).await?;

    tracing::info!(user_id = user.id, "registered user {}", user.username);
    Ok(Json(UserResponse::from(user)))
}

// Exchanges email and password for a bearer token
pub async fn login(
    State(data): State<Arc<AppState>>,
    body: std::result::Result<Json<LoginSchema>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(body) = body?;
    let mut conn = data.db.acquire().await?;

    let user = match users::find_by_email(&mut conn, &body.email).await? {
        Some(user) if verify_password(&body.password, &user.hashed_password) => user,
        _ => {
            tracing::info!("failed login for {}", body.email);
            return Err(AppError::InvalidCredentials);
        }
    };

    let access_token = data.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "login successful");
    Ok(Json(TokenResponse::bearer(access_token)))
}

// Handler for getting all Todo items of the current user
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Todo>>> {
    let mut conn = data.db.acquire().await?;
    let todos = todos::list(&mut conn, user.id).await?;
    Ok(Json(todos))
}

// Handler for creating a new Todo owned by the current user
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: std::result::Result<Json<CreateTodoSchema>, JsonRejection>,
) -> Result<Json<Todo>> {
    let Json(body) = body?;
    let mut conn = data.db.acquire().await?;
    let todo = todos::create(&mut conn, user.id, &body.content, body.completed).await?;

    tracing::debug!(user_id = user.id, todo_id = todo.id, "created todo");
    Ok(Json(todo))
}

// Handler for getting a specific Todo by ID
pub async fn get_todo(
    id: std::result::Result<Path<i64>, PathRejection>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    let mut conn = data.db.acquire().await?;
    let todo = todos::get(&mut conn, user.id, id).await?;
    Ok(Json(todo))
}

// Handler for updating a Todo by ID
pub async fn update_todo(
    id: std::result::Result<Path<i64>, PathRejection>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: std::result::Result<Json<UpdateTodoSchema>, JsonRejection>,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let mut conn = data.db.acquire().await?;
    let todo = todos::update(
        &mut conn,
        user.id,
        id,
        body.id,
        &body.content,
        body.completed,
    )
    .await?;
    Ok(Json(todo))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    id: std::result::Result<Path<i64>, PathRejection>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let mut conn = data.db.acquire().await?;
    todos::delete(&mut conn, user.id, id).await?;

    tracing::debug!(user_id = user.id, todo_id = id, "deleted todo");
    Ok(Json(json!({"message": "Todo deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_body(username: &str, email: &str, password: &str) -> SignupSchema {
        SignupSchema {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_signup_validation() {
        assert!(validate_signup(&signup_body("alice", "a@x.com", "secret123")).is_ok());
        assert!(validate_signup(&signup_body("al", "a@x.com", "secret123")).is_err());
        assert!(validate_signup(&signup_body(&"a".repeat(51), "a@x.com", "secret123")).is_err());
        assert!(validate_signup(&signup_body("alice", "", "secret123")).is_err());
        assert!(validate_signup(&signup_body("alice", &"e".repeat(101), "secret123")).is_err());
        assert!(validate_signup(&signup_body("alice", "a@x.com", "")).is_err());
    }
}
