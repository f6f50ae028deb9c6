use adpulse_core::tokens::SealKey;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Shared secret the scheduled trigger must present in `x-cron-secret`.
    pub cron_secret: String,
    /// AES-256 key sealing integration access tokens at rest.
    pub token_seal_key: SealKey,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                 |
    /// |------------------------|----------|-------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`               |
    /// | `PORT`                 | no       | `3000`                  |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                    |
    /// | `CRON_SECRET`          | **yes**  | --                      |
    /// | `TOKEN_SEAL_KEY`       | **yes**  | -- (64 hex chars)       |
    ///
    /// # Panics
    ///
    /// Panics on missing secrets or malformed values; misconfiguration
    /// should fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cron_secret =
            std::env::var("CRON_SECRET").expect("CRON_SECRET must be set in the environment");
        assert!(!cron_secret.is_empty(), "CRON_SECRET must not be empty");

        let token_seal_key = std::env::var("TOKEN_SEAL_KEY")
            .expect("TOKEN_SEAL_KEY must be set in the environment");
        let token_seal_key =
            SealKey::from_hex(&token_seal_key).expect("TOKEN_SEAL_KEY must be 64 hex characters");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cron_secret,
            token_seal_key,
            jwt,
        }
    }
}
