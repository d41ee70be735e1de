//! Configuration loading and parsing

use anyhow::{Context, Result};
use callbacks::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Messages printed by the two built-in handlers
pub const DEFAULT_MESSAGES: [&str; 2] = ["Hello from handler 1", "Hello from handler 2"];

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Line printed before the registry is created
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Number of times the registry is dispatched
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Handlers in registration order (empty = the two built-in handlers)
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

fn default_greeting() -> String {
    "Hello world!".to_string()
}

fn default_rounds() -> u32 {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            rounds: default_rounds(),
            registry: RegistryConfig::default(),
            handlers: Vec::new(),
        }
    }
}

/// One `[[handlers]]` entry
///
/// Either `message` is set, or both `library` and `symbol` are.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HandlerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// A validated handler entry
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerSpec {
    /// Print a line on every dispatch
    Message(String),
    /// Call a C function exported by a dynamic library
    Library { path: PathBuf, symbol: String },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("handler #{0}: set either `message` or `library` + `symbol`, not both")]
    Ambiguous(usize),

    #[error("handler #{0}: `library` and `symbol` must be given together")]
    IncompleteLibrary(usize),

    #[error("handler #{0}: no `message` or `library` given")]
    Empty(usize),
}

impl HandlerConfig {
    /// Handler that prints `message`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Check this entry and turn it into a [`HandlerSpec`]
    pub fn resolve(&self, index: usize) -> std::result::Result<HandlerSpec, ConfigError> {
        match (&self.message, &self.library, &self.symbol) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ConfigError::Ambiguous(index)),
            (Some(message), None, None) => Ok(HandlerSpec::Message(message.clone())),
            (None, Some(path), Some(symbol)) => Ok(HandlerSpec::Library {
                path: path.clone(),
                symbol: symbol.clone(),
            }),
            (None, Some(_), None) | (None, None, Some(_)) => {
                Err(ConfigError::IncompleteLibrary(index))
            }
            (None, None, None) => Err(ConfigError::Empty(index)),
        }
    }
}

impl AppConfig {
    /// Validated handler list, falling back to the built-in handlers
    pub fn handler_specs(&self) -> std::result::Result<Vec<HandlerSpec>, ConfigError> {
        if self.handlers.is_empty() {
            return Ok(DEFAULT_MESSAGES
                .iter()
                .map(|message| HandlerSpec::Message(message.to_string()))
                .collect());
        }

        self.handlers
            .iter()
            .enumerate()
            .map(|(index, handler)| handler.resolve(index + 1))
            .collect()
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .handler_specs()
        .with_context(|| format!("Invalid handler in config file: {:?}", path))?;

    Ok(config)
}
