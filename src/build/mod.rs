//! Build specification shared by all transformations of a build.

mod env;

pub use env::ExecEnv;

use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

/// Default value of `BUILD_ENVIRONMENT`.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Read-only settings every transformation in a build sees.
///
/// Shared between concurrent transformations behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BuildSpec {
    /// Project root; tools are looked up under and run in this directory.
    pub working_dir: PathBuf,
    /// Environment name exported to tools (e.g. `production`).
    pub environment: String,
    /// Rule deriving the environment of external tools.
    pub env: ExecEnv,
}

impl BuildSpec {
    /// Relative working directories are resolved against the current directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        Self {
            working_dir: std::path::absolute(&working_dir).unwrap_or(working_dir),
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            env: ExecEnv::default(),
        }
    }

    pub fn with_env(mut self, env: ExecEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Environment external tools run with.
    pub fn exec_environ(&self) -> BTreeMap<OsString, OsString> {
        self.env.derive(&self.working_dir, &self.environment)
    }

    /// Executable search path of the derived environment.
    pub fn search_path(&self) -> Option<OsString> {
        self.exec_environ().remove(OsStr::new("PATH"))
    }
}
