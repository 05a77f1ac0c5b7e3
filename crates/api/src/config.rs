use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum number of public events read into a feed computation
    /// (default: `200`).
    pub feed_limit: i64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Mapping/places API configuration.
    pub places: PlacesConfig,
}

/// Configuration for the external places / mapping API.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL of the places API.
    pub base_url: String,
    /// API key sent as a query parameter. `None` disables the places
    /// endpoints (they return 502 with an explanatory message).
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                 |
    /// | `FEED_LIMIT`           | `200`                                |
    /// | `PLACES_API_URL`       | `https://places.example.com/api`     |
    /// | `PLACES_API_KEY`       | unset (places endpoints disabled)    |
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

        let feed_limit: i64 = std::env::var("FEED_LIMIT")
            .unwrap_or_else(|_| "200".into())
            .parse()
            .expect("FEED_LIMIT must be a valid i64");

        let jwt = JwtConfig::from_env();

        let places = PlacesConfig {
            base_url: std::env::var("PLACES_API_URL")
                .unwrap_or_else(|_| "https://places.example.com/api".into()),
            api_key: std::env::var("PLACES_API_KEY").ok().filter(|k| !k.is_empty()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            feed_limit,
            jwt,
            places,
        }
    }
}
