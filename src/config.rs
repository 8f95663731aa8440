//! Marshaling Configuration
//!
//! Handles parsing and management of louis.toml configuration files.
//!
//! ```toml
//! [engine]
//! library = "louis"
//! search_paths = ["/opt/louis/lib"]
//!
//! [tables]
//! directory = "/usr/share/liblouis/tables"
//!
//! [encoding]
//! width = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ffi::{Engine, EngineError, LibraryLoader, DEFAULT_LIBRARY};
use crate::tables::{DirectoryTableResolver, ResolverError};
use crate::wide::{width, MarshalError, WideCharWidth};

/// Name of the configuration file searched for by [`MarshalConfig::find_and_load`]
pub const CONFIG_FILE: &str = "louis.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("No table directory configured")]
    NoTableDirectory,

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching louis.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MarshalConfig {
    /// Foreign engine location
    #[serde(default)]
    pub engine: EngineConfig,

    /// Table directory
    #[serde(default)]
    pub tables: TablesConfig,

    /// Wide character settings
    #[serde(default)]
    pub encoding: EncodingConfig,
}

impl MarshalConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MarshalConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configured unit width, validated
    pub fn width(&self) -> ConfigResult<Option<WideCharWidth>> {
        Ok(self
            .encoding
            .width
            .map(WideCharWidth::from_bytes)
            .transpose()?)
    }

    /// Pin the process width if one is configured.
    pub fn apply_width(&self) -> ConfigResult<Option<WideCharWidth>> {
        let configured = self.width()?;
        if let Some(w) = configured {
            width::pin(w)?;
        }
        Ok(configured)
    }

    /// Resolver over the configured table directory
    pub fn table_resolver(&self) -> ConfigResult<DirectoryTableResolver> {
        let dir = self
            .tables
            .directory
            .as_ref()
            .ok_or(ConfigError::NoTableDirectory)?;
        Ok(DirectoryTableResolver::new(dir)?)
    }

    /// Library loader with the configured search paths ahead of the defaults
    pub fn loader(&self) -> LibraryLoader {
        let mut loader = LibraryLoader::new();
        for path in self.engine.search_paths.iter().rev() {
            loader.add_search_path(path);
        }
        loader
    }

    /// Load the configured engine
    pub fn load_engine(&self) -> ConfigResult<Engine> {
        Ok(Engine::load_with(&self.loader(), &self.engine.library)?)
    }
}

/// Foreign engine location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Library name or path
    #[serde(default = "default_library")]
    pub library: String,

    /// Extra directories searched before the platform defaults
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            search_paths: Vec::new(),
        }
    }
}

/// Table directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TablesConfig {
    /// Directory holding translation tables
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Wide character configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EncodingConfig {
    /// Bytes per code unit (2 or 4); the platform `wchar_t` when unset
    #[serde(default)]
    pub width: Option<usize>,
}
