use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub static DEFAULT_CONFIG_PATH: &str = "data/config.json";
pub static CONFIG_PATH_ENV: &str = "BOT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read config file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config is not valid JSON")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("config must be a JSON object")]
    NotAnObject,
    #[error("token missing: the config has no `token` field")]
    MissingToken,
    #[error("token invalid: expected a string, found {found}")]
    InvalidToken { found: &'static str },
    #[error("token empty: the `token` field must not be an empty string")]
    EmptyToken,
}

/// Shape of `data/config.json`. Unknown keys are ignored.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default, alias = "TOKEN")]
    token: Option<Value>,
}

/// Startup configuration, read once and never written back.
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl BotConfig {
    /// Resolves the config path from `$BOT_CONFIG`, falling back to `data/config.json`.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let config = Self::from_json(&raw)?;
        info!("Configuration loaded successfully.");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        if !value.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let file: ConfigFile =
            serde_json::from_value(value).map_err(|source| ConfigError::Parse { source })?;

        match file.token {
            None | Some(Value::Null) => Err(ConfigError::MissingToken),
            Some(Value::String(token)) if token.is_empty() => Err(ConfigError::EmptyToken),
            Some(Value::String(token)) => Ok(Self { token }),
            Some(other) => Err(ConfigError::InvalidToken {
                found: json_type(&other),
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
