use std::sync::Arc;

use axum::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_backend::{
    build_app,
    config::Config,
    db,
    error::{AppError, Result},
    AppState,
};

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("server failed to start: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url, config.database_max_connections).await?;
    db::init_schema(&pool).await?;

    let app_state = Arc::new(AppState::new(pool, &config));
    let app = build_app(app_state, &config)?;

    tracing::info!("Server started successfully on {}", config.server_addr);

    Server::try_bind(&config.server_addr)
        .map_err(|e| AppError::Config(format!("cannot bind {}: {}", config.server_addr, e)))?
        .serve(app.into_make_service())
        .await
        .map_err(|e| AppError::Internal(format!("server error: {}", e)))
}
