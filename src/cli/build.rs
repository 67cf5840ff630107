//! Build packaging for function projects.
//!
//! Deliberately small: the build step loads and validates the project's
//! `multicloud.yaml` and stages the function sources into `build/`.
//! Platform-specific bundling belongs to the deployment tooling.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_yaml::Value;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("multicloud.yaml not found in {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid multicloud.yaml: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Stages platform deployment packages for a function project.
pub struct Builder {
    project_path: PathBuf,
    config_file: PathBuf,
    build_dir: PathBuf,
}

impl Builder {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let config_file = project_path.join("multicloud.yaml");
        let build_dir = project_path.join("build");
        Self {
            project_path,
            config_file,
            build_dir,
        }
    }

    /// Load and validate the project's `multicloud.yaml`.
    pub fn load_config(&self) -> Result<Value, BuildError> {
        if !self.config_file.exists() {
            return Err(BuildError::MissingConfig(self.project_path.clone()));
        }

        let text = fs::read_to_string(&self.config_file)?;
        let config: Value =
            serde_yaml::from_str(&text).map_err(|e| BuildError::InvalidConfig(e.to_string()))?;

        if function_name(&config).is_none() {
            return Err(BuildError::InvalidConfig(
                "missing required key 'function.name'".to_string(),
            ));
        }

        Ok(config)
    }

    /// Stage the project's top-level files into the build directory and
    /// return the package path.
    pub fn stage(&self) -> Result<PathBuf, BuildError> {
        let config = self.load_config()?;
        let name = function_name(&config).unwrap_or("function").to_string();

        let target = self.build_dir.join(&name);
        fs::create_dir_all(&target)?;

        let mut staged = 0usize;
        for entry in fs::read_dir(&self.project_path)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(file_name) = path.file_name() {
                fs::copy(&path, target.join(file_name))?;
                staged += 1;
            }
        }

        info!(function = %name, staged, build_dir = %target.display(), "staged function sources");
        Ok(target)
    }
}

fn function_name(config: &Value) -> Option<&str> {
    config
        .get("function")
        .and_then(|function| function.get("name"))
        .and_then(Value::as_str)
}
