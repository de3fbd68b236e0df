use directories::ProjectDirs;
use nearby::client::GOOGLE_PLACES_URL;
use nearby::{ApiKey, Coordinate, PlacesClient};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "WHEEL";
pub const DEFAULT_PROXY_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlacesConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProxyConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_endpoint")]
    pub upstream: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upstream: default_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub location: Option<Coordinate>,
}

fn default_endpoint() -> String {
    GOOGLE_PLACES_URL.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PROXY_PORT
}

impl Config {
    /// The configured key wins over `GOOGLE_PLACES_API_KEY`.
    pub fn api_key(&self) -> Option<ApiKey> {
        self.places
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(ApiKey::from)
            .or_else(ApiKey::from_env)
    }

    pub fn places_client(&self) -> PlacesClient {
        PlacesClient::new(self.places.endpoint.clone(), self.api_key())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "wheeloffood", "wheel-of-food").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Directory holding persisted preferences.
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn load_config_from(path: PathBuf) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(get_config_path()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, DEFAULT_CONFIG).unwrap();

        let config = load_config_from(path).unwrap();
        assert_eq!(config.places.endpoint, GOOGLE_PLACES_URL);
        assert_eq!(config.proxy.port, DEFAULT_PROXY_PORT);
        assert_eq!(config.proxy.host, "127.0.0.1");
        assert!(config.location.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.proxy, ProxyConfig::default());
        assert_eq!(config.places, PlacesConfig::default());
    }

    #[test]
    fn test_location_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(
            &path,
            "[location]\nlatitude = 51.5\nlongitude = -0.12\n\n[proxy]\nport = 8080\n",
        )
        .unwrap();

        let config = load_config_from(path).unwrap();
        assert_eq!(config.location, Some(Coordinate::new(51.5, -0.12)));
        assert_eq!(config.proxy.port, 8080);
        assert_eq!(config.proxy.upstream, GOOGLE_PLACES_URL);
    }

    #[test]
    fn test_configured_key_wins() {
        let config = Config {
            places: PlacesConfig {
                api_key: Some("from-file".to_string()),
                ..PlacesConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(config.api_key().unwrap().as_str(), "from-file");
    }
}
