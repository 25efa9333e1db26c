// Registered account; the password hash never leaves the server
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

// Data model representing a Todo item, always owned by exactly one user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct Todo {
    pub id: i64,
    pub content: String,
    // The web frontend reads and writes this flag as `isCompleted`
    #[serde(rename = "isCompleted", alias = "completed")]
    pub completed: bool,
    pub user_id: i64,
}

// Identity attached to a request by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
