use std::time::Duration;

/// Default per-request handler budget (30 seconds).
const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 30;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub handler_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `MCP_GUIDE_HANDLER_TIMEOUT_SECS` (optional, default 30) — max
    ///   seconds a handler may run before its request is cancelled
    pub fn from_env() -> Result<Self, String> {
        let handler_timeout_secs = match std::env::var("MCP_GUIDE_HANDLER_TIMEOUT_SECS") {
            Ok(val) => val.parse::<u64>().map_err(|_| {
                "MCP_GUIDE_HANDLER_TIMEOUT_SECS must be a positive integer".to_string()
            })?,
            Err(_) => DEFAULT_HANDLER_TIMEOUT_SECS,
        };

        Ok(Self {
            handler_timeout: Duration::from_secs(handler_timeout_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            handler_timeout: Duration::from_secs(DEFAULT_HANDLER_TIMEOUT_SECS),
        }
    }
}
