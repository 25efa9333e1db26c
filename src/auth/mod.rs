//! Password hashing, access tokens and per-request identity resolution.
//!
//! - [`password`] hashes and verifies credentials with Argon2id
//! - [`token`] issues and verifies HS256 access tokens
//! - [`resolve_identity`] turns a presented token into a stored [`User`]

pub mod password;
pub mod token;

use sqlx::SqliteConnection;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::model::User;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

/// Resolves a bearer token to the user it was issued for.
///
/// Every failure, whether a bad token or a user that no longer exists,
/// surfaces as [`AppError::Unauthenticated`].
pub async fn resolve_identity(
    conn: &mut SqliteConnection,
    tokens: &TokenService,
    token: &str,
) -> Result<User> {
    let user_id = tokens.verify(token).map_err(|e| {
        tracing::debug!("rejected access token: {}", e);
        AppError::Unauthenticated
    })?;

    users::find_by_id(conn, user_id).await?.ok_or_else(|| {
        tracing::debug!(user_id, "token subject does not exist");
        AppError::Unauthenticated
    })
}
