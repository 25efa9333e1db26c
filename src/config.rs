use std::net::SocketAddr;

use chrono::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub server_addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Builds the configuration from process environment variables.
    ///
    /// Call `dotenv::dotenv()` first if values should also come from `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::Config("JWT_SECRET must be set".to_string()))?;

        let token_ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(AppError::Config(format!(
                        "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive integer, got {:?}",
                        raw
                    )))
                }
            },
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        // Tokens issued now must still have a representable expiry.
        let token_ttl = Duration::try_minutes(token_ttl_minutes)
            .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "ACCESS_TOKEN_EXPIRE_MINUTES is out of range: {}",
                    token_ttl_minutes
                ))
            })?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if cors_origins.is_empty() {
            return Err(AppError::Config("CORS_ORIGIN lists no origins".to_string()));
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::Config(format!("DATABASE_MAX_CONNECTIONS is invalid: {:?}", raw))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let raw_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("SERVER_ADDR {:?} is invalid: {}", raw_addr, e)))?;

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            jwt_secret,
            token_ttl,
            server_addr,
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_in(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.token_ttl, Duration::minutes(30));
        assert_eq!(config.server_addr.to_string(), DEFAULT_SERVER_ADDR);
        assert_eq!(config.cors_origins, vec![DEFAULT_CORS_ORIGIN.to_string()]);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = Config::from_lookup(lookup_in(&[]));
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = Config::from_lookup(lookup_in(&[("JWT_SECRET", "")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "sqlite://other.db"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("SERVER_ADDR", "0.0.0.0:9000"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.token_ttl, Duration::minutes(5));
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        for raw in ["0", "-3", "soon"] {
            let result = Config::from_lookup(lookup_in(&[
                ("JWT_SECRET", "s3cret"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", raw),
            ]));
            assert!(matches!(result, Err(AppError::Config(_))), "{}", raw);
        }
    }

    #[test]
    fn test_out_of_range_ttl_is_rejected() {
        // 10^12 minutes is a valid duration but lands past the last representable date.
        for raw in [
            i64::MAX.to_string(),
            (i64::MAX / 60).to_string(),
            "1000000000000".to_string(),
        ] {
            let result = Config::from_lookup(lookup_in(&[
                ("JWT_SECRET", "s3cret"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", raw.as_str()),
            ]));
            assert!(matches!(result, Err(AppError::Config(_))), "{}", raw);
        }
    }

    #[test]
    fn test_cors_origin_list() {
        let config = Config::from_lookup(lookup_in(&[
            ("JWT_SECRET", "s3cret"),
            (
                "CORS_ORIGIN",
                "http://localhost:3000, https://todo.example.com,,",
            ),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://todo.example.com".to_string()
            ]
        );

        let result = Config::from_lookup(lookup_in(&[("JWT_SECRET", "s3cret"), ("CORS_ORIGIN", " , ")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
