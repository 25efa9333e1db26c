use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route("/todos/", get(get_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/", get(health_checker_handler))
        .with_state(app_state)
}
