//! Configuration management
//!
//! Settings come from `config/<environment>.toml` (or an explicit path),
//! fall back to built-in defaults, and are then overridden by `FARMX_*`
//! environment variables.

use crate::errors::ConfigError;
use crate::pages::Theme;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    Testing,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            "testing" | "test" => Ok(Environment::Testing),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(ConfigError::UnknownEnvironment(value.to_string())),
        }
    }

    pub fn config_path(self) -> PathBuf {
        let name = match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Testing => "testing",
            Environment::Development => "development",
        };
        PathBuf::from(format!("config/{name}.toml"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub assets: AssetsConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl WebConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Resolved configuration plus where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: WebConfig,
    environment: Environment,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration for the environment named by `FARMX_ENV`.
    ///
    /// An explicit `path` must exist; the per-environment file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = match env::var("FARMX_ENV") {
            Ok(value) => Environment::parse(&value)?,
            Err(_) => Environment::Development,
        };
        Self::load_with(environment, path, |key| env::var(key).ok())
    }

    /// Load with an explicit environment and variable lookup.
    pub fn load_with<F>(
        environment: Environment,
        path: Option<&Path>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(environment.config_path()).filter(|p| p.exists()),
        };

        let mut config = match &source {
            Some(path) => Self::load_config_from_file(path)?,
            None => WebConfig::default(),
        };
        Self::apply_env_overrides(&mut config, lookup)?;

        Ok(Self {
            config,
            environment,
            source,
        })
    }

    pub fn get_config(&self) -> &WebConfig {
        &self.config
    }

    pub fn into_config(self) -> WebConfig {
        self.config
    }

    pub fn get_environment(&self) -> Environment {
        self.environment
    }

    /// File the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn load_config_from_file(path: &Path) -> Result<WebConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides<F>(config: &mut WebConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = get("FARMX_HOST") {
            config.server.host = value;
        }

        if let Some(value) = get("FARMX_PORT") {
            config.server.port = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FARMX_PORT",
                value,
            })?;
        }

        if let Some(value) = get("FARMX_MODELS_DIR") {
            config.models.dir = PathBuf::from(value);
        }

        if let Some(value) = get("FARMX_ASSETS_DIR") {
            config.assets.dir = PathBuf::from(value);
        }

        if let Some(value) = get("FARMX_THEME") {
            config.ui.default_theme =
                Theme::parse(&value).ok_or(ConfigError::InvalidValue {
                    key: "FARMX_THEME",
                    value,
                })?;
        }

        if let Some(value) = get("FARMX_LOG_LEVEL") {
            config.logging.level = value;
        }

        if let Some(value) = get("FARMX_LOG_FORMAT") {
            config.logging.format = value;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn environment_names() {
        assert_eq!(Environment::parse("prod").unwrap(), Environment::Production);
        assert_eq!(Environment::parse(" Test ").unwrap(), Environment::Testing);
        assert!(Environment::parse("moon").is_err());
        assert_eq!(
            Environment::Staging.config_path(),
            PathBuf::from("config/staging.toml")
        );
    }

    #[test]
    fn explicit_file_is_parsed_with_defaults_for_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[ui]\ndefault_theme = \"green\"\n"
        )
        .unwrap();

        let manager =
            ConfigManager::load_with(Environment::Testing, Some(file.path()), no_env).unwrap();
        let config = manager.get_config();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.ui.default_theme, Theme::Green);
        assert_eq!(config.models.dir, PathBuf::from("models"));
        assert_eq!(manager.source(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigManager::load_with(
            Environment::Development,
            Some(Path::new("/nonexistent/farmx.toml")),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn env_overrides_apply_on_top_of_file() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FARMX_PORT", "8080"),
            ("FARMX_MODELS_DIR", "/srv/models"),
            ("FARMX_THEME", "Green"),
            ("FARMX_LOG_FORMAT", "json"),
            ("FARMX_HOST", "   "),
        ]);
        let manager = ConfigManager::load_with(Environment::Production, None, |key| {
            vars.get(key).map(|v| v.to_string())
        })
        .unwrap();
        let config = manager.get_config();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.models.dir, PathBuf::from("/srv/models"));
        assert_eq!(config.ui.default_theme, Theme::Green);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ConfigManager::load_with(Environment::Testing, None, |key| {
            (key == "FARMX_PORT").then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "FARMX_PORT",
                ..
            }
        ));
    }
}
