use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Which storage backend the app writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataRepo {
    /// Files in the private data directory
    #[default]
    #[value(name = "local")]
    LocalFile,
    /// A remote WebDAV share
    #[value(name = "webdav")]
    Webdav,
}

impl DataRepo {
    /// Parses a stored/env value; anything unrecognized falls back to the
    /// local backend.
    fn parse(value: &str) -> Self {
        match value {
            "webdav" => DataRepo::Webdav,
            _ => DataRepo::LocalFile,
        }
    }
}

impl std::fmt::Display for DataRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataRepo::LocalFile => write!(f, "local"),
            DataRepo::Webdav => write!(f, "webdav"),
        }
    }
}

/// WebDAV connection parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebdavSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl WebdavSettings {
    /// Returns true if url, username and password are all present
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.username.is_some() && self.password.is_some()
    }

    pub fn credentials(&self) -> Option<(String, String, String)> {
        match (&self.url, &self.username, &self.password) {
            (Some(url), Some(user), Some(pass)) => {
                Some((url.clone(), user.clone(), pass.clone()))
            }
            _ => None,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Active storage backend
    pub data_repo: DataRepo,
    /// Directory holding the local logbook files
    pub data_dir: ConfigValue<PathBuf>,
    /// Remembered bottle content in milliliters
    pub bottle_ml: Option<u32>,
    /// WebDAV connection parameters
    pub webdav: WebdavSettings,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for the config file on disk
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    data_repo: Option<DataRepo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bottle_ml: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webdav: Option<WebdavSettings>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_repo = DataRepo::default();
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut bottle_ml = None;
        let mut webdav = WebdavSettings::default();
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(repo) = file_config.data_repo {
                data_repo = repo;
            }
            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(ml) = file_config.bottle_ml {
                bottle_ml = Some(ml);
            }
            if let Some(dav) = file_config.webdav {
                webdav = dav;
            }
        }

        // Apply environment variable overrides
        if let Ok(repo) = std::env::var("LUNA_DATA_REPO") {
            data_repo = DataRepo::parse(&repo);
        }
        if let Ok(dir) = std::env::var("LUNA_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("LUNA_WEBDAV_URL") {
            webdav.url = Some(url);
        }
        if let Ok(user) = std::env::var("LUNA_WEBDAV_USERNAME") {
            webdav.username = Some(user);
        }
        if let Ok(pass) = std::env::var("LUNA_WEBDAV_PASSWORD") {
            webdav.password = Some(pass);
        }

        Ok(Self {
            data_repo,
            data_dir,
            bottle_ml,
            webdav,
            config_file,
        })
    }

    /// Writes the settings back to the config file (the one they were
    /// loaded from, or the default path on first save).
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(Self::default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(path.clone(), e))?;
        }

        let file_config = ConfigFile {
            data_repo: Some(self.data_repo),
            // Only persist a data dir the user chose; the default stays
            // derived from the platform dirs.
            data_dir: match self.data_dir.source {
                ConfigSource::File => Some(self.data_dir.value.clone()),
                _ => None,
            },
            bottle_ml: self.bottle_ml,
            webdav: Some(self.webdav.clone()),
        };
        let yaml = serde_yaml::to_string(&file_config)
            .map_err(|e| ConfigError::SerializeError(path.clone(), e))?;
        std::fs::write(&path, yaml).map_err(|e| ConfigError::WriteError(path.clone(), e))?;
        Ok(path)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/luna/
    /// - macOS: ~/Library/Application Support/luna/
    /// - Windows: %APPDATA%/luna/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("luna")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/luna/
    /// - macOS: ~/Library/Application Support/luna/
    /// - Windows: %APPDATA%/luna/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("luna")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    WriteError(PathBuf, std::io::Error),
    SerializeError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::SerializeError(path, e) => {
                write!(
                    f,
                    "Failed to serialize config file '{}': {}",
                    path.display(),
                    e
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_repo, DataRepo::LocalFile);
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert!(config.bottle_ml.is_none());
        assert!(!config.webdav.is_configured());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_repo: webdav").unwrap();
        writeln!(file, "data_dir: /custom/path").unwrap();
        writeln!(file, "bottle_ml: 120").unwrap();
        writeln!(file, "webdav:").unwrap();
        writeln!(file, "  url: https://dav.example.org/luna").unwrap();
        writeln!(file, "  username: user").unwrap();
        writeln!(file, "  password: secret").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.data_repo, DataRepo::Webdav);
        assert_eq!(config.data_dir.value, PathBuf::from("/custom/path"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.bottle_ml, Some(120));
        assert!(config.webdav.is_configured());
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_partial_file_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "bottle_ml: 90").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_repo, DataRepo::LocalFile);
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.bottle_ml, Some(90));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::load(Some(config_path.clone())).unwrap();
        config.config_file = Some(config_path.clone());
        config.data_repo = DataRepo::Webdav;
        config.bottle_ml = Some(150);
        config.webdav = WebdavSettings {
            url: Some("https://dav.example.org/luna".to_string()),
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
        };
        config.save().unwrap();

        let reloaded = Config::load(Some(config_path)).unwrap();
        assert_eq!(reloaded.data_repo, DataRepo::Webdav);
        assert_eq!(reloaded.bottle_ml, Some(150));
        assert!(reloaded.webdav.is_configured());
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_repo: webdav").unwrap();

        std::env::set_var("LUNA_DATA_REPO", "localfile");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_repo, DataRepo::LocalFile);

        std::env::remove_var("LUNA_DATA_REPO");
    }

    #[test]
    fn test_unknown_repo_value_falls_back_to_local() {
        assert_eq!(DataRepo::parse("floppy"), DataRepo::LocalFile);
        assert_eq!(DataRepo::parse("webdav"), DataRepo::Webdav);
    }
}
