//! Startup configuration for fxgate.
//!
//! Everything is read from the environment exactly once and carried in an
//! immutable [`Settings`] value; nothing reads ambient globals afterwards.

use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::{FxError, FxResult};

/// Default base URL of the upstream Frankfurter API.
pub const DEFAULT_API_BASE: &str = "https://api.frankfurter.dev/v1";

/// Default log file path.
pub const DEFAULT_LOG_FILE: &str = "/tmp/fxgate.log";

/// Immutable process configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the upstream rate API.
    pub api_base: Url,
    /// File every log line is appended to, in addition to the console.
    pub log_file: PathBuf,
    /// GitHub OAuth credentials; `Some` iff `ENABLE_AUTH=true`.
    pub auth: Option<AuthSettings>,
}

/// Credentials for the GitHub-backed access guard.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub client_id: String,
    pub client_secret: String,
    /// Public base URL of this server, advertised in auth challenges.
    pub base_url: Url,
}

impl Settings {
    /// Read configuration from the process environment.
    pub fn from_env() -> FxResult<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup (test seam).
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> FxResult<Self> {
        let api_base = match get("FXGATE_API_BASE") {
            Some(raw) => Url::parse(&raw)?,
            None => Url::parse(DEFAULT_API_BASE)?,
        };

        let log_file = get("FXGATE_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let enable_auth = get("ENABLE_AUTH")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let auth = if enable_auth {
            Some(AuthSettings::from_vars(&get)?)
        } else {
            None
        };

        Ok(Self {
            api_base,
            log_file,
            auth,
        })
    }
}

impl AuthSettings {
    /// Collect the required auth variables, failing with a message that
    /// names every missing one.
    fn from_vars(get: &impl Fn(&str) -> Option<String>) -> FxResult<Self> {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| match get(name).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let client_id = required("GITHUB_CLIENT_ID");
        let client_secret = required("GITHUB_CLIENT_SECRET");
        let base_url = required("AUTH_BASE_URL");

        if !missing.is_empty() {
            return Err(FxError::Config(format!(
                "ENABLE_AUTH=true but required environment variables are not set: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            client_id,
            client_secret,
            base_url: Url::parse(&base_url)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn settings_from(pairs: &[(&str, &str)]) -> FxResult<Settings> {
        let env = vars(pairs);
        Settings::from_vars(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_without_auth() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(settings.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(settings.auth.is_none());
    }

    #[test]
    fn enable_auth_is_case_insensitive() {
        let settings = settings_from(&[
            ("ENABLE_AUTH", "TRUE"),
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "secret"),
            ("AUTH_BASE_URL", "https://fx.example.com"),
        ])
        .unwrap();
        let auth = settings.auth.expect("auth should be enabled");
        assert_eq!(auth.client_id, "id");
        assert_eq!(auth.base_url.as_str(), "https://fx.example.com/");
    }

    #[test]
    fn missing_auth_vars_are_all_listed() {
        let err = settings_from(&[("ENABLE_AUTH", "true"), ("GITHUB_CLIENT_ID", "id")])
            .expect_err("startup must fail");
        let message = err.to_string();
        assert!(message.contains("GITHUB_CLIENT_SECRET"), "{message}");
        assert!(message.contains("AUTH_BASE_URL"), "{message}");
        assert!(!message.contains("GITHUB_CLIENT_ID,"), "{message}");
    }

    #[test]
    fn empty_auth_var_counts_as_missing() {
        let err = settings_from(&[
            ("ENABLE_AUTH", "true"),
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "  "),
            ("AUTH_BASE_URL", "https://fx.example.com"),
        ])
        .expect_err("blank secret must fail");
        assert!(err.to_string().contains("GITHUB_CLIENT_SECRET"));
    }

    #[test]
    fn auth_disabled_ignores_credentials() {
        let settings = settings_from(&[("ENABLE_AUTH", "false")]).unwrap();
        assert!(settings.auth.is_none());
    }
}
