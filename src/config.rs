use std::time::Duration;

use url::Url;

use crate::error::AppError;

pub const API_BASE_ENV: &str = "FASTAPI_BASE_URL";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_LOAD_LIMIT: u32 = 50;
pub const LOAD_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 10..=500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: Url,
    pub request_timeout: Duration,
    pub load_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Only the backend
    /// location is configurable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw = lookup(API_BASE_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self {
            api_base: parse_api_base(&raw)?,
            request_timeout: REQUEST_TIMEOUT,
            load_limit: DEFAULT_LOAD_LIMIT,
        })
    }
}

/// Parses the backend location. The path always ends in `/` so endpoint
/// paths join beneath it instead of replacing its last segment.
pub fn parse_api_base(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "{API_BASE_ENV} must be an http(s) URL, got '{raw}'"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
