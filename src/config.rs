//! Environment-driven configuration
//!
//! Endpoint URLs come from the runtime environment. An absent URL means the
//! live tier is unavailable: lookups route straight to the bundled fallback
//! without attempting a request.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How often the passive rate board re-fetches live rates.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How long the assistant waits after a handoff reply before closing the
/// panel and redirecting to video help.
pub const DEFAULT_HANDOFF_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct Config {
    pub fee_endpoint: Option<String>,
    pub rate_endpoint: Option<String>,
    pub port: u16,
    pub poll_interval: Duration,
    pub state_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let fee_endpoint = non_empty(env::var("FEE_API_URL").ok());
        let rate_endpoint = non_empty(env::var("EXCHANGE_API_URL").ok());

        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let poll_interval = env::var("RATE_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let state_path = env::var("CLIENT_STATE_PATH").ok().map(PathBuf::from);

        Self {
            fee_endpoint,
            rate_endpoint,
            port,
            poll_interval,
            state_path,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.trim_end_matches('/').to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_filters_blank_and_trailing_slash() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(
            non_empty(Some("https://api.example.com/fees/".into())),
            Some("https://api.example.com/fees".to_string())
        );
    }
}
