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
    /// Externally reachable base URL, shown in webhook-info.
    pub public_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Path token for the inbound webhook (default: `ghost`).
    pub webhook_endpoint: String,
    /// Scheduler poll interval in milliseconds (default: `1000`).
    pub scheduler_poll_ms: u64,
    /// Cap on concurrently executing invocations (default: `10`).
    pub scheduler_concurrency: usize,
    /// listmonk connection settings.
    pub listmonk: ListmonkConfig,
}

/// listmonk API connection settings.
#[derive(Debug, Clone)]
pub struct ListmonkConfig {
    /// Base URL of the listmonk instance (default: `http://localhost:9000`).
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `PUBLIC_URL`            | `http://localhost:3000` |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `WEBHOOK_ENDPOINT`      | `ghost`                 |
    /// | `SCHEDULER_POLL_MS`     | `1000`                  |
    /// | `SCHEDULER_CONCURRENCY` | `10`                    |
    /// | `LISTMONK_URL`          | `http://localhost:9000` |
    /// | `LISTMONK_USERNAME`     | `listmonk`              |
    /// | `LISTMONK_PASSWORD`     | `listmonk`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let webhook_endpoint =
            std::env::var("WEBHOOK_ENDPOINT").unwrap_or_else(|_| "ghost".into());

        let scheduler_poll_ms: u64 = std::env::var("SCHEDULER_POLL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("SCHEDULER_POLL_MS must be a valid u64");

        let scheduler_concurrency: usize = std::env::var("SCHEDULER_CONCURRENCY")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SCHEDULER_CONCURRENCY must be a valid usize");

        let listmonk = ListmonkConfig {
            url: std::env::var("LISTMONK_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into())
                .trim_end_matches('/')
                .to_string(),
            username: std::env::var("LISTMONK_USERNAME").unwrap_or_else(|_| "listmonk".into()),
            password: std::env::var("LISTMONK_PASSWORD").unwrap_or_else(|_| "listmonk".into()),
        };

        Self {
            host,
            port,
            public_url,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            webhook_endpoint,
            scheduler_poll_ms,
            scheduler_concurrency,
            listmonk,
        }
    }
}
