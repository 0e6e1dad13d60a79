//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the client. The core
//! never reads environment variables itself; the command line loads them (including `.env`) and
//! hands the raw values to [`CoreConfig::from_values`].

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_NOTION_VERSION};
use crate::{NotionError, NotionResult};
use ntn_types::NonEmptyText;

/// Core configuration resolved at startup.
#[derive(Clone)]
pub struct CoreConfig {
    token: NonEmptyText,
    api_base_url: String,
    notion_version: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the default endpoint and API version.
    ///
    /// # Errors
    ///
    /// Returns `NotionError::MissingToken` if `token` is blank.
    pub fn new(token: impl AsRef<str>) -> NotionResult<Self> {
        let token = NonEmptyText::new(token).map_err(|_| NotionError::MissingToken)?;
        Ok(Self {
            token,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        })
    }

    /// Build configuration from optional raw values, typically environment variables.
    ///
    /// Blank optional values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `NotionError::MissingToken` if no usable token is provided, and
    /// `NotionError::InvalidInput` if the base URL is not an http(s) URL.
    pub fn from_values(
        token: Option<String>,
        api_base_url: Option<String>,
        notion_version: Option<String>,
    ) -> NotionResult<Self> {
        let mut config = Self::new(token.unwrap_or_default())?;
        if let Some(url) = NonEmptyText::from_optional(api_base_url) {
            config = config.with_api_base_url(url.as_str())?;
        }
        if let Some(version) = NonEmptyText::from_optional(notion_version) {
            config.notion_version = version.into_string();
        }
        Ok(config)
    }

    /// Point the client at a different endpoint (tests use a local mock server).
    pub fn with_api_base_url(mut self, url: &str) -> NotionResult<Self> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NotionError::InvalidInput(format!(
                "API base URL must start with http:// or https://, got: '{}'",
                url
            )));
        }
        self.api_base_url = url.to_string();
        Ok(self)
    }

    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn notion_version(&self) -> &str {
        &self.notion_version
    }
}

// Keep the token out of logs and panic messages.
impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("notion_version", &self.notion_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_config_error() {
        assert!(matches!(
            CoreConfig::from_values(None, None, None),
            Err(NotionError::MissingToken)
        ));
        assert!(matches!(
            CoreConfig::from_values(Some("   ".into()), None, None),
            Err(NotionError::MissingToken)
        ));
    }

    #[test]
    fn test_defaults_applied() {
        let config = CoreConfig::from_values(Some("secret_abc".into()), Some("".into()), None)
            .unwrap();
        assert_eq!(config.token(), "secret_abc");
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.notion_version(), DEFAULT_NOTION_VERSION);
    }

    #[test]
    fn test_overrides_applied_and_trailing_slash_removed() {
        let config = CoreConfig::from_values(
            Some("secret_abc".into()),
            Some("http://127.0.0.1:9000/v1/".into()),
            Some("2025-09-03".into()),
        )
        .unwrap();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:9000/v1");
        assert_eq!(config.notion_version(), "2025-09-03");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = CoreConfig::new("secret_abc")
            .unwrap()
            .with_api_base_url("ftp://example.com");
        assert!(matches!(result, Err(NotionError::InvalidInput(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CoreConfig::new("secret_abc").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret_abc"));
        assert!(rendered.contains("<redacted>"));
    }
}
