//! Build-time configuration.
//!
//! Values are baked in at compile time through environment variables:
//! `TASKBOARD_API_URL`, `TASKBOARD_REALTIME_URL` and `TASKBOARD_LOG_LEVEL`.

use std::str::FromStr;

use chrono::Duration;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub realtime_url: String,
    pub log_level: Level,
    /// How long a cached query counts as fresh
    pub stale_time: Duration,
    pub toast_lifetime_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None)
    }
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("TASKBOARD_API_URL"),
            option_env!("TASKBOARD_REALTIME_URL"),
            option_env!("TASKBOARD_LOG_LEVEL"),
        )
    }

    fn from_values(api_url: Option<&str>, realtime_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let realtime_url = realtime_url
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| realtime_url_for(&api_base_url));
        let log_level = log_level.and_then(|s| Level::from_str(s.trim()).ok()).unwrap_or(Level::INFO);

        Self {
            api_base_url,
            realtime_url,
            log_level,
            stale_time: Duration::minutes(5),
            toast_lifetime_ms: 5_000,
        }
    }
}

/// `http(s)://host/api` -> `ws(s)://host/ws`
pub fn realtime_url_for(api_base_url: &str) -> String {
    let (scheme, rest) = match api_base_url.split_once("://") {
        Some(("https", rest)) => ("wss", rest),
        Some((_, rest)) => ("ws", rest),
        None => ("ws", api_base_url),
    };
    let rest = rest.trim_end_matches('/');
    let root = rest.strip_suffix("/api").unwrap_or(rest);
    format!("{scheme}://{root}/ws")
}
