//! Configuration file parser for ~/.config/playlstr/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Credentials may live in the file but the `FEEDLY_USER_ID` and
//! `FEEDLY_ACCESS_TOKEN` environment variables take precedence.
use crate::feedly::DEFAULT_URL;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const USER_ID_ENV: &str = "FEEDLY_USER_ID";
pub const ACCESS_TOKEN_ENV: &str = "FEEDLY_ACCESS_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("FEEDLY_ACCESS_TOKEN must be set")]
    MissingAccessToken,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Custom Debug impl masks `access_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// feedly API root.
    pub base_url: String,

    /// Label of the board to read albums from.
    pub board: String,

    /// Entries requested per page. 0 = server default.
    pub page_size: u32,

    /// Maximum number of stream pages to walk.
    pub max_pages: usize,

    /// Only consider unread entries.
    pub unread_only: bool,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// feedly user id (alternative to FEEDLY_USER_ID).
    pub user_id: Option<String>,

    /// feedly access token (alternative to FEEDLY_ACCESS_TOKEN).
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            board: "Yr Next Playlist".to_string(),
            page_size: 0,
            max_pages: 50,
            unread_only: false,
            request_timeout_secs: 30,
            user_id: None,
            access_token: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("board", &self.board)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("unread_only", &self.unread_only)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_id", &self.user_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Blank input yields defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "base_url",
                "board",
                "page_size",
                "max_pages",
                "unread_only",
                "request_timeout_secs",
                "user_id",
                "access_token",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(base_url = %config.base_url, board = %config.board, "Loaded configuration");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves credentials from the process environment, falling back to
    /// the values in this config.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials_from(|key| std::env::var(key).ok())
    }

    /// Like [`credentials`](Self::credentials) with an explicit variable
    /// lookup.
    pub fn credentials_from<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let access_token = non_empty(lookup(ACCESS_TOKEN_ENV))
            .or_else(|| non_empty(self.access_token.clone()))
            .ok_or(ConfigError::MissingAccessToken)?;
        let user_id =
            non_empty(lookup(USER_ID_ENV)).or_else(|| non_empty(self.user_id.clone()));

        Ok(Credentials {
            user_id,
            access_token: SecretString::from(access_token),
        })
    }
}

/// Resolved feedly credentials, handed to the transport at construction.
#[derive(Clone)]
pub struct Credentials {
    pub user_id: Option<String>,
    pub access_token: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://cloud.feedly.com");
        assert_eq!(config.board, "Yr Next Playlist");
        assert_eq!(config.page_size, 0);
        assert_eq!(config.max_pages, 50);
        assert!(!config.unread_only);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/playlstr_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.board, "Yr Next Playlist");
    }

    #[test]
    fn test_whitespace_only_returns_default() {
        let config = Config::from_toml("   \n  \n  ").unwrap();
        assert_eq!(config.max_pages, 50);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("playlstr_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "board = \"Listen Later\"\nmax_pages = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.board, "Listen Later");
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.base_url, "https://cloud.feedly.com"); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::from_toml("board = \"x\"\ntotally_fake_key = 1\n").unwrap();
        assert_eq!(config.board, "x");
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::from_toml("max_pages = \"many\"\n").is_err());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("playlstr_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_token_takes_precedence() {
        let config = Config {
            access_token: Some("from-file".into()),
            user_id: Some("file-user".into()),
            ..Config::default()
        };
        let creds = config
            .credentials_from(env(&[(ACCESS_TOKEN_ENV, "from-env"), (USER_ID_ENV, "env-user")]))
            .unwrap();
        assert_eq!(creds.access_token.expose_secret(), "from-env");
        assert_eq!(creds.user_id.as_deref(), Some("env-user"));
    }

    #[test]
    fn test_file_token_used_when_env_missing() {
        let config = Config {
            access_token: Some("from-file".into()),
            ..Config::default()
        };
        let creds = config.credentials_from(env(&[])).unwrap();
        assert_eq!(creds.access_token.expose_secret(), "from-file");
        assert_eq!(creds.user_id, None);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let config = Config::default();
        let err = config
            .credentials_from(env(&[(ACCESS_TOKEN_ENV, "  "), (USER_ID_ENV, "u")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingAccessToken));
        assert_eq!(err.to_string(), "FEEDLY_ACCESS_TOKEN must be set");
    }

    #[test]
    fn test_debug_masks_access_token() {
        let config = Config {
            access_token: Some("super-secret-token-12345".into()),
            ..Config::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-token-12345"));
        assert!(debug_output.contains("[REDACTED]"));

        let creds = config.credentials_from(env(&[])).unwrap();
        assert!(!format!("{:?}", creds).contains("super-secret-token-12345"));
    }
}
