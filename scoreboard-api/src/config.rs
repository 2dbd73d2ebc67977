//! API configuration.
//!
//! Environment-variable driven with development defaults.

/// Server and CORS configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host (default `0.0.0.0`).
    pub bind_host: String,

    /// Bind port (default 3000).
    pub bind_port: u16,

    /// Allowed CORS origins. Empty means allow all (dev mode).
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            bind_port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `SCOREBOARD_BIND`: bind host (default: 0.0.0.0)
    /// - `SCOREBOARD_PORT` / `PORT`: bind port (default: 3000)
    /// - `SCOREBOARD_CORS_ORIGINS`: comma-separated origins (empty = allow all)
    pub fn from_env() -> Self {
        let bind_host =
            std::env::var("SCOREBOARD_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());

        let bind_port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("SCOREBOARD_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let cors_origins = std::env::var("SCOREBOARD_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_host,
            bind_port,
            cors_origins,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.bind_port)
    }
}
