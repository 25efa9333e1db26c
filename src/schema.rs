use crate::model::User;

// Request body for creating a new Todo; any owner or id the client sends is dropped
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateTodoSchema {
    pub content: String,
    #[serde(default, rename = "isCompleted", alias = "completed")]
    pub completed: bool,
}

// Request body for updating a Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdateTodoSchema {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
    #[serde(default, rename = "isCompleted", alias = "completed")]
    pub completed: bool,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SignupSchema {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginSchema {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
