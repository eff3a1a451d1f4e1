use std::time::Duration;

/// Connection and deadline settings for [`super::PgStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Postgres connection string.
    pub url: String,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// How long to wait for a pooled connection before failing.
    pub acquire_timeout: Duration,

    /// Deadline applied to every store operation.
    pub op_timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            op_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let cfg = StoreConfig::new("postgres://localhost/stockroom");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.op_timeout, Duration::from_secs(5));
    }
}
