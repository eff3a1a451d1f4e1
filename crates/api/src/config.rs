//! Environment-backed service configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

use stockroom_infra::StoreConfig;

/// Everything `main` needs to bring the service up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address, `host:port`.
    pub bind_addr: String,

    /// The single origin allowed by the CORS layer.
    pub allowed_origin: HeaderValue,

    /// Store connection string and tuning.
    pub store: StoreConfig,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = get("DATABASE_URL")
            .context("DATABASE_URL environment variable not set")?;

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let origin = get("ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let allowed_origin = HeaderValue::from_str(&origin)
            .context("ALLOWED_ORIGIN is not a valid header value")?;

        let mut store = StoreConfig::new(database_url);
        if let Some(raw) = get("STORE_MAX_CONNECTIONS") {
            store.max_connections = raw
                .parse()
                .context("STORE_MAX_CONNECTIONS must be an integer")?;
        }
        if let Some(raw) = get("STORE_OP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .context("STORE_OP_TIMEOUT_SECS must be an integer")?;
            store.op_timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            bind_addr,
            allowed_origin,
            store,
        })
    }
}
