//! YAML-backed configuration store for the CLI.
//!
//! Values are addressed by dot-path strings (`"author.name"`) and
//! persisted under `.multicloud/config.yaml` in the project directory.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Dot-path key/value store over a YAML configuration file.
///
/// The file is loaded lazily and seeded with a default configuration on
/// first use. An unreadable file falls back to the defaults without
/// overwriting it.
pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
    data: Option<Value>,
}

impl ConfigStore {
    /// Store rooted at the current working directory.
    pub fn new() -> ConfigResult<Self> {
        Ok(Self::at(env::current_dir()?))
    }

    /// Store rooted at an explicit project directory.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(".multicloud");
        let config_file = config_dir.join("config.yaml");
        Self {
            config_dir,
            config_file,
            data: None,
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load the configuration, creating and persisting the defaults if
    /// no file exists yet.
    pub fn load(&mut self) -> ConfigResult<Value> {
        if let Some(data) = &self.data {
            return Ok(data.clone());
        }

        if self.config_file.exists() {
            let text = fs::read_to_string(&self.config_file)?;
            match serde_yaml::from_str(&text) {
                // An empty file deserializes to null; treat it as an
                // empty mapping so dot-path lookups behave.
                Ok(Value::Null) => self.data = Some(Value::Mapping(Mapping::new())),
                Ok(value) => self.data = Some(value),
                Err(err) => {
                    error!("error loading config: {}", err);
                    self.data = Some(default_config());
                }
            }
        } else {
            self.data = Some(default_config());
            self.save()?;
        }

        Ok(self.data.clone().unwrap_or_else(default_config))
    }

    /// Persist the current configuration, creating the config directory
    /// if needed.
    pub fn save(&self) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir)?;

        let data = self.data.clone().unwrap_or_else(default_config);
        fs::write(&self.config_file, serde_yaml::to_string(&data)?)?;
        Ok(())
    }

    /// Get a configuration value using dot notation.
    pub fn get(&mut self, key: &str) -> ConfigResult<Option<Value>> {
        let config = self.load()?;

        let mut value = &config;
        for part in key.split('.') {
            match value.get(part) {
                Some(next) => value = next,
                None => return Ok(None),
            }
        }
        Ok(Some(value.clone()))
    }

    /// Set a configuration value using dot notation, creating
    /// intermediate mappings as needed, and persist the result.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ConfigResult<()> {
        let mut config = self.load()?;

        let parts: Vec<&str> = key.split('.').collect();
        let (leaf, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        let mut current = &mut config;
        for part in parents {
            if !current.is_mapping() {
                *current = Value::Mapping(Mapping::new());
            }
            if let Value::Mapping(map) = current {
                current = map
                    .entry(Value::String((*part).to_string()))
                    .or_insert_with(|| Value::Mapping(Mapping::new()));
            }
        }

        if !current.is_mapping() {
            *current = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(map) = current {
            map.insert(Value::String((*leaf).to_string()), value.into());
        }

        self.data = Some(config);
        self.save()
    }

    /// Delete the persisted configuration; the next load reseeds the
    /// defaults.
    pub fn reset(&mut self) -> ConfigResult<()> {
        if self.config_file.exists() {
            fs::remove_file(&self.config_file)?;
        }
        self.data = None;
        Ok(())
    }
}

fn default_config() -> Value {
    let mut author = Mapping::new();
    author.insert("name".into(), "".into());
    author.insert("email".into(), "".into());

    let mut defaults = Mapping::new();
    defaults.insert("runtime".into(), "rust".into());
    defaults.insert("memory".into(), "128Mi".into());
    defaults.insert("timeout".into(), "30s".into());
    defaults.insert("log_level".into(), "INFO".into());
    defaults.insert("license".into(), "".into());
    defaults.insert("version".into(), "0.1.0".into());

    let mut platforms = Mapping::new();
    for platform in ["knative", "aws", "azure", "gcp"] {
        platforms.insert(platform.into(), Value::Mapping(Mapping::new()));
    }

    let mut root = Mapping::new();
    root.insert("author".into(), Value::Mapping(author));
    root.insert("defaults".into(), Value::Mapping(defaults));
    root.insert("platforms".into(), Value::Mapping(platforms));
    Value::Mapping(root)
}
