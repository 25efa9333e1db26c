//! Multi-user todo API: signup and login with Argon2-hashed passwords,
//! bearer-token authentication, and todo CRUD scoped to the caller.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;

use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use sqlx::{Pool, Sqlite};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::TokenService, config::Config, error::AppError};

// Struct representing the application state
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: &Config) -> Self {
        Self {
            db,
            tokens: TokenService::new(&config.jwt_secret, config.token_ttl),
        }
    }
}

/// Router with CORS and request tracing applied.
pub fn build_app(app_state: Arc<AppState>, config: &Config) -> error::Result<Router> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| AppError::Config(format!("CORS_ORIGIN {:?} is invalid: {}", origin, e)))
        })
        .collect::<error::Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    Ok(route::create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
