//! Client configuration from `PRECAST_*` environment variables.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use precast_core::page::{clamp_page_size, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token; session refresh is handled elsewhere.
    pub token: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` with an injectable lookup (tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let base_url = get("PRECAST_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(d.base_url);
        let token = get("PRECAST_API_TOKEN").filter(|s| !s.trim().is_empty());
        let timeout = get("PRECAST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(Duration::from_secs)
            .unwrap_or(d.timeout);
        let page_size = get("PRECAST_PAGE_SIZE")
            .and_then(|s| s.parse::<u32>().ok())
            .map(clamp_page_size)
            .unwrap_or(d.page_size);
        let export_dir = get("PRECAST_EXPORT_DIR").map(PathBuf::from).unwrap_or(d.export_dir);
        Self { base_url, token, timeout, page_size, export_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let c = ClientConfig::from_lookup(|_| None);
        assert_eq!(c, ClientConfig::default());
    }

    #[test]
    fn reads_and_sanitises_values() {
        let env: HashMap<&str, &str> = [
            ("PRECAST_API_URL", "https://precast.example/api/"),
            ("PRECAST_API_TOKEN", "abc"),
            ("PRECAST_TIMEOUT_SECS", "5"),
            ("PRECAST_PAGE_SIZE", "9999"),
        ]
        .into_iter()
        .collect();
        let c = ClientConfig::from_lookup(|k| env.get(k).map(|s| s.to_string()));
        assert_eq!(c.base_url, "https://precast.example/api");
        assert_eq!(c.token.as_deref(), Some("abc"));
        assert_eq!(c.timeout, Duration::from_secs(5));
        assert_eq!(c.page_size, precast_core::page::MAX_PAGE_SIZE);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let c = ClientConfig::from_lookup(|k| match k {
            "PRECAST_TIMEOUT_SECS" => Some("0".into()),
            "PRECAST_PAGE_SIZE" => Some("ten".into()),
            _ => None,
        });
        assert_eq!(c.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(c.page_size, DEFAULT_PAGE_SIZE);
    }
}
