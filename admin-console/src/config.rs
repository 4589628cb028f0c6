use std::path::{Path, PathBuf};
use std::str::FromStr;

use admin_sdk::AdminConfig;
use serde::Deserialize;

use crate::utils::errors::{ConsoleError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "./admin-console.toml";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub login_location: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Where remembered sessions are kept between runs
    pub cookie_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConsoleError::Configuration(format!(
                "Unknown log format: {other}"
            ))),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 30,
            login_location: "/login".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_file: PathBuf::from(".admin-session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load from the TOML file named by `ADMIN_CONSOLE_CONFIG` (or the
    /// default path), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("ADMIN_CONSOLE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::from_file(Path::new(&config_path))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse `path`, or fall back to defaults when it does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str::<AppConfig>(&config_str).map_err(|e| {
            ConsoleError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Environment variables override file settings.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("ADMIN_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("ADMIN_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = timeout.trim().parse().map_err(|e| {
                ConsoleError::Configuration(format!("Invalid request timeout: {}", e))
            })?;
        }
        if let Some(file) = lookup("ADMIN_SESSION_FILE") {
            self.session.cookie_file = PathBuf::from(file);
        }
        if let Some(format) = lookup("ADMIN_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig::new(self.api.base_url.clone())
            .with_timeout(self.api.request_timeout_secs)
            .with_login_location(self.api.login_location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::from_file(Path::new("/nonexistent/admin-console.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.cookie_file, PathBuf::from(".admin-session.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin-console.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://shop.example\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example");
        assert_eq!(config.api.login_location, "/login");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert_matches!(
            AppConfig::from_file(&path),
            Err(ConsoleError::Configuration(_))
        );
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ADMIN_API_BASE_URL", "http://staging:4000"),
            ("ADMIN_API_TIMEOUT_SECS", "5"),
            ("ADMIN_SESSION_FILE", "/tmp/session.json"),
            ("ADMIN_LOG_FORMAT", "JSON"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "http://staging:4000");
        assert_eq!(config.session.cookie_file, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.logging.format, LogFormat::Json);

        let sdk = config.admin_config();
        assert_eq!(sdk.request_timeout().as_secs(), 5);
        assert_eq!(sdk.login_location, "/login");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|key| (key == "ADMIN_API_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert_matches!(err, ConsoleError::Configuration(_));
    }
}
