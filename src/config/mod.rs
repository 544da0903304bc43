//! Project configuration from `coffee.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                               |
//! |---------------|-------------------------------------------------------|
//! | `[build]`     | Working directory, environment name, env inheritance  |
//! | `[build.env]` | Environment overrides for external tools              |
//! | `[coffee]`    | Default compiler options (loosely typed)              |
//!
//! # Example
//!
//! ```toml
//! [build]
//! working_dir = "."
//! environment = "production"
//!
//! [build.env]
//! NODE_ENV = "production"
//!
//! [coffee]
//! Bare = true
//! ```

mod error;
mod util;

pub use error::ConfigError;
pub use util::find_config_file;

use crate::{
    build::{BuildSpec, DEFAULT_ENVIRONMENT, ExecEnv},
    coffee::{CoffeeOptions, decode_options},
    log,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use util::expand_tilde;

/// Default config file name.
pub const DEFAULT_CONFIG: &str = "coffee.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing coffee.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    pub build: BuildSection,

    /// Compiler options, decoded leniently by [`decode_options`]
    pub coffee: toml::Table,
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Working directory, relative to the project root (default: root)
    pub working_dir: Option<String>,

    /// Exported to tools as `BUILD_ENVIRONMENT`
    pub environment: String,

    /// Pass the ambient environment on to tools
    pub inherit_env: bool,

    /// Environment overrides for tools
    pub env: BTreeMap<String, String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            working_dir: None,
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            inherit_env: true,
            env: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Load configuration.
    ///
    /// With `explicit`, that file must exist. Otherwise `coffee.toml` is
    /// searched upward from `cwd`; without one, defaults rooted at `cwd`
    /// are used.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let found = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Some(path)
            }
            None => find_config_file(cwd, Path::new(DEFAULT_CONFIG)),
        };

        let Some(path) = found else {
            return Ok(Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            });
        };

        let mut config = Self::from_path(&path)?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        config.config_path = Some(path);
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Working directory tools run in.
    pub fn working_dir(&self) -> PathBuf {
        match &self.build.working_dir {
            Some(dir) => self.root.join(expand_tilde(dir)),
            None => self.root.clone(),
        }
    }

    /// Build specification shared by all transformations.
    pub fn build_spec(&self) -> BuildSpec {
        let overrides = self
            .build
            .env
            .iter()
            .map(|(k, v)| (k.clone(), expand_tilde(v)))
            .collect();

        BuildSpec::new(self.working_dir())
            .with_environment(&self.build.environment)
            .with_env(ExecEnv {
                inherit: self.build.inherit_env,
                overrides,
            })
    }

    /// Compiler options from the `[coffee]` section.
    pub fn coffee_options(&self) -> Result<CoffeeOptions, ConfigError> {
        if self.coffee.is_empty() {
            return Ok(CoffeeOptions::default());
        }
        let value = serde_json::to_value(&self.coffee).unwrap_or_default();
        Ok(decode_options(value.as_object())?)
    }
}

// ============================================================================
// tests
// ============================================================================
