use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_ENV_PREFIX, DEFAULT_GREETING, DEFAULT_MAINTENANCE_MESSAGE,
    DEFAULT_MAX_MESSAGES, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STORAGE_KEY, DEFAULT_TITLE,
    SIMULATED_DELAY_MAX_MS, SIMULATED_DELAY_MIN_MS,
};
use crate::utils::WidgetError;

/// Corner of the host page the widget is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
        };
        f.write_str(name)
    }
}

/// Widget configuration, fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Widget position on screen
    pub position: Position,
    /// Custom brand color (hex, rgb, or hsl format)
    pub brand_color: Option<String>,
    /// Greeting shown when there is no stored history
    pub greeting_message: String,
    /// Widget title
    pub title: String,
    /// Online status indicator (display only)
    pub is_online: bool,
    /// Reject every submission while set
    pub is_maintenance_mode: bool,
    /// Message shown during maintenance
    pub maintenance_message: String,
    /// Custom avatar URL for bot messages
    pub avatar_url: Option<String>,
    /// Endpoint for the remote responder
    pub api_endpoint: Option<String>,
    /// Start widget in open state
    pub default_open: bool,
    /// Save messages between sessions
    pub persist_messages: bool,
    /// Maximum number of messages to store
    pub max_messages: usize,
    /// Namespace the log is stored under
    pub storage_key: String,
    /// Directory for file-backed storage; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
    /// Upper bound on a single response, in seconds
    pub request_timeout_secs: u64,
    pub simulated_delay_min_ms: u64,
    pub simulated_delay_max_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            position: Position::default(),
            brand_color: None,
            greeting_message: DEFAULT_GREETING.to_string(),
            title: DEFAULT_TITLE.to_string(),
            is_online: true,
            is_maintenance_mode: false,
            maintenance_message: DEFAULT_MAINTENANCE_MESSAGE.to_string(),
            avatar_url: None,
            api_endpoint: None,
            default_open: false,
            persist_messages: true,
            max_messages: DEFAULT_MAX_MESSAGES,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            simulated_delay_min_ms: SIMULATED_DELAY_MIN_MS,
            simulated_delay_max_ms: SIMULATED_DELAY_MAX_MS,
        }
    }
}

impl WidgetConfig {
    /// Check the invariants the session relies on
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.max_messages == 0 {
            return Err(WidgetError::ConfigError(
                "max_messages must be at least 1".to_string(),
            ));
        }
        if self.greeting_message.trim().is_empty() {
            return Err(WidgetError::ConfigError(
                "greeting_message must not be empty".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(WidgetError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(WidgetError::ConfigError(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.simulated_delay_min_ms > self.simulated_delay_max_ms {
            return Err(WidgetError::ConfigError(format!(
                "simulated delay window is inverted ({}ms > {}ms)",
                self.simulated_delay_min_ms, self.simulated_delay_max_ms
            )));
        }
        if let Some(endpoint) = self.endpoint() {
            reqwest::Url::parse(endpoint).map_err(|e| {
                WidgetError::ConfigError(format!("invalid api_endpoint '{}': {}", endpoint, e))
            })?;
        }
        Ok(())
    }

    /// Configured endpoint, treating a blank string as unset
    pub fn endpoint(&self) -> Option<&str> {
        self.api_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<WidgetConfig> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(format!(".{}/config.toml", APP_NAME));

    let mut figment = Figment::from(Serialized::defaults(WidgetConfig::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    figment = figment.merge(Env::prefixed(CONFIG_ENV_PREFIX));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file layered over the defaults
pub fn load_config_from(path: &Path) -> Result<WidgetConfig> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }
    Figment::from(Serialized::defaults(WidgetConfig::default()))
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join(APP_NAME);
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Get the directory file-backed message logs live in
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.data_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".local").join("share").join(APP_NAME))
    }
}

/// Save configuration to file
pub fn save_config(config: &WidgetConfig, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path of the global config file.
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&WidgetConfig::default(), Some(config_file.clone()))?;
        tracing::info!(path = %config_file.display(), "created default configuration");
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.greeting_message, DEFAULT_GREETING);
        assert_eq!(config.max_messages, 100);
        assert!(config.persist_messages);
        assert!(!config.default_open);
        assert_eq!(config.position, Position::BottomRight);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = WidgetConfig {
            max_messages: 0,
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(WidgetError::ConfigError(_))));

        let config = WidgetConfig {
            api_endpoint: Some("not a url".to_string()),
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(WidgetError::ConfigError(_))));

        let config = WidgetConfig {
            simulated_delay_min_ms: 10,
            simulated_delay_max_ms: 5,
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(WidgetError::ConfigError(_))));

        let config = WidgetConfig {
            storage_key: "  ".to_string(),
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(WidgetError::ConfigError(_))));
    }

    #[test]
    fn test_blank_endpoint_is_unset() {
        let config = WidgetConfig {
            api_endpoint: Some("   ".to_string()),
            ..WidgetConfig::default()
        };
        assert_eq!(config.endpoint(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
greeting_message = "Hello there"
max_messages = 5
position = "top-left"
api_endpoint = "http://localhost:8080/chat"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.greeting_message, "Hello there");
        assert_eq!(config.max_messages, 5);
        assert_eq!(config.position, Position::TopLeft);
        assert_eq!(config.endpoint(), Some("http://localhost:8080/chat"));
        // Untouched fields keep their defaults
        assert_eq!(config.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = WidgetConfig {
            title: "Support".to_string(),
            is_maintenance_mode: true,
            ..WidgetConfig::default()
        };

        save_config(&config, Some(path.clone())).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }
}
