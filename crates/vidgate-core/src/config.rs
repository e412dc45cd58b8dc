use log::LevelFilter;
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::route::{
    RouteTable, DEFAULT_API_PREFIXES, DEFAULT_ASSET_EXTENSIONS, DEFAULT_ASSET_PREFIX,
};

/// Loads the deploy-time manifest (`vidgate.toml`). The manifest is the
/// only configuration surface: adapters compile it in via `include_str!`
/// and substitute values at deploy time; there is no environment-variable
/// lookup at runtime.
#[derive(Debug)]
pub struct ConfigLoader {
    config: Arc<GatewayConfig>,
}

impl ConfigLoader {
    pub fn load_from_str(contents: &str) -> Self {
        let config: GatewayConfig =
            toml::from_str(contents).expect("vidgate manifest should be valid TOML");
        config
            .validate()
            .expect("vidgate manifest failed validation");
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, io::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&contents)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        config
            .validate()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GatewayConfig {
    #[serde(default)]
    #[validate(nested)]
    pub backend: BackendConfig,
    #[serde(default)]
    #[validate(nested)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub origins: OriginsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(
            self.routes.asset_prefix.clone(),
            self.routes.asset_extensions.clone(),
            self.routes.api_prefixes.clone(),
        )
    }

    pub fn backend_base(&self) -> &str {
        &self.backend.base_url
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.logging.level.into()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BackendConfig {
    #[serde(default = "default_backend_base")]
    #[validate(custom(function = validate_absolute_url))]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_base(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoutesConfig {
    #[serde(default = "default_asset_prefix")]
    #[validate(custom(function = validate_leading_slash))]
    pub asset_prefix: String,
    #[serde(default = "default_asset_extensions")]
    #[validate(custom(function = validate_extensions))]
    pub asset_extensions: Vec<String>,
    #[serde(default = "default_api_prefixes")]
    #[validate(custom(function = validate_prefixes))]
    pub api_prefixes: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            asset_prefix: default_asset_prefix(),
            asset_extensions: default_asset_extensions(),
            api_prefixes: default_api_prefixes(),
        }
    }
}

/// Origin endpoints that only some adapters need. Workers fetch assets
/// same-origin and ignore `asset_base`; the local dev adapter rewrites
/// asset requests onto it.
#[derive(Debug, Default, Deserialize)]
pub struct OriginsConfig {
    pub asset_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_backend_base() -> String {
    "https://video-downloader-api.onrender.com".to_string()
}

fn default_asset_prefix() -> String {
    DEFAULT_ASSET_PREFIX.to_string()
}

fn default_asset_extensions() -> Vec<String> {
    DEFAULT_ASSET_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

fn default_api_prefixes() -> Vec<String> {
    DEFAULT_API_PREFIXES
        .iter()
        .map(|prefix| (*prefix).to_string())
        .collect()
}

fn validate_absolute_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("base_url must be an absolute http(s) URL"))
    }
}

fn validate_leading_slash(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("path prefix must begin with '/'"))
    }
}

fn validate_prefixes(values: &Vec<String>) -> Result<(), ValidationError> {
    if values.iter().all(|prefix| prefix.starts_with('/')) {
        Ok(())
    } else {
        Err(ValidationError::new("api prefixes must begin with '/'"))
    }
}

fn validate_extensions(values: &Vec<String>) -> Result<(), ValidationError> {
    if values.iter().all(|ext| ext.starts_with('.')) {
        Ok(())
    } else {
        Err(ValidationError::new("asset extensions must begin with '.'"))
    }
}
