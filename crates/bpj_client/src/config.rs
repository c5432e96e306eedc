use std::env;
use std::fmt;
use std::time::Duration;

use bpj_core::{Error, Result};
use url::Url;

pub const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
pub const READ_KEY_VARS: [&str; 3] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY", "SUPABASE_KEY"];
pub const SERVICE_KEY_VARS: [&str; 4] = [
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_KEY",
    "SUPABASE_ANON_KEY",
    "VITE_SUPABASE_ANON_KEY",
];

/// Connection settings for the hosted data API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    key: String,
    pub timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: &str, key: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("unsupported scheme: {}", trimmed)));
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::Config("API key is empty".to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            key: key.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read-only settings from the environment (and `.env`). `Ok(None)` when
    /// the URL or key is not set.
    pub fn from_env() -> Result<Option<Self>> {
        Self::with_overrides(None, None, &READ_KEY_VARS)
    }

    /// Settings for writes, preferring the service role key.
    pub fn service_from_env() -> Result<Option<Self>> {
        Self::with_overrides(None, None, &SERVICE_KEY_VARS)
    }

    /// Explicit values win over the environment.
    pub fn with_overrides(
        url: Option<String>,
        key: Option<String>,
        key_vars: &[&str],
    ) -> Result<Option<Self>> {
        dotenvy::dotenv().ok();
        let url = non_blank(url).or_else(|| env_value(&URL_VARS));
        let key = non_blank(key).or_else(|| env_value(key_vars));
        Self::resolve(url, key)
    }

    pub fn resolve(url: Option<String>, key: Option<String>) -> Result<Option<Self>> {
        match (non_blank(url), non_blank(key)) {
            (Some(url), Some(key)) => Self::new(&url, &key).map(Some),
            _ => Ok(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// `{base}/rest/v1/{path}`
    pub fn rest_url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/rest/v1/{}", self.base_url, path))?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_value(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| non_blank(env::var(name).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_removed() {
        let config = ApiConfig::new("https://demo.supabase.co/", "anon").unwrap();
        assert_eq!(config.base_url(), "https://demo.supabase.co");
        assert_eq!(
            config.rest_url("journal_posts").unwrap().as_str(),
            "https://demo.supabase.co/rest/v1/journal_posts"
        );
    }

    #[test]
    fn test_missing_values_resolve_to_none() {
        assert!(ApiConfig::resolve(None, Some("k".to_string())).unwrap().is_none());
        assert!(ApiConfig::resolve(Some("https://x.co".to_string()), Some("  ".to_string()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        assert!(ApiConfig::resolve(Some("not a url".to_string()), Some("k".to_string())).is_err());
        assert!(ApiConfig::new("ftp://files.example.com", "k").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ApiConfig::new("https://demo.supabase.co", "secret-key").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
