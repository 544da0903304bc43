//! Compiler binary discovery.

use crate::build::BuildSpec;
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

/// Name of the compiler executable.
pub const BINARY_NAME: &str = "coffee";

/// Where project-local npm binaries live, relative to the working directory.
pub const LOCAL_BIN_DIR: &str = "node_modules/.bin";

/// Where a compiler binary was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// `<working_dir>/node_modules/.bin/coffee`
    Local(PathBuf),
    /// Found on the executable search path.
    Global(PathBuf),
}

impl Located {
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) | Self::Global(path) => path,
        }
    }
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{} (local)", path.display()),
            Self::Global(path) => write!(f, "{} (PATH)", path.display()),
        }
    }
}

/// Find the compiler, preferring the project-local install.
///
/// The global lookup searches the `PATH` of the environment tools are run
/// with, so project overrides apply to discovery as well.
pub fn locate(spec: &BuildSpec) -> Option<Located> {
    let working_dir = spec.working_dir();
    let local = working_dir.join(LOCAL_BIN_DIR).join(BINARY_NAME);

    if let Ok(path) = which::which_in(&local, None::<OsString>, working_dir) {
        return Some(Located::Local(path));
    }

    let search_path = spec.search_path()?;
    which::which_in(BINARY_NAME, Some(search_path), working_dir)
        .ok()
        .map(Located::Global)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::build::ExecEnv;
    use crate::testing::{ECHO_STUB, isolated_spec, write_stub};
    use tempfile::TempDir;

    #[test]
    fn test_local_binary() {
        let site = TempDir::new().unwrap();
        let stub = write_stub(&site.path().join(LOCAL_BIN_DIR), ECHO_STUB);
        let spec = isolated_spec(site.path(), None);

        assert_eq!(locate(&spec), Some(Located::Local(stub)));
    }

    #[test]
    fn test_local_wins_over_path() {
        let site = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        write_stub(global.path(), ECHO_STUB);
        let local = write_stub(&site.path().join(LOCAL_BIN_DIR), ECHO_STUB);
        let spec = isolated_spec(site.path(), Some(global.path()));

        assert_eq!(locate(&spec), Some(Located::Local(local)));
    }

    #[test]
    fn test_global_fallback() {
        let site = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let stub = write_stub(global.path(), ECHO_STUB);
        let spec = isolated_spec(site.path(), Some(global.path()));

        let found = locate(&spec).unwrap();
        assert_eq!(found, Located::Global(stub));
        assert!(found.to_string().ends_with("(PATH)"));
    }

    #[test]
    fn test_not_executable_is_ignored() {
        let site = TempDir::new().unwrap();
        let bin = site.path().join(LOCAL_BIN_DIR);
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(BINARY_NAME), ECHO_STUB).unwrap();
        let spec = isolated_spec(site.path(), None);

        assert_eq!(locate(&spec), None);
    }

    #[test]
    fn test_nothing_found() {
        let site = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let spec = isolated_spec(site.path(), Some(empty.path()));
        assert_eq!(locate(&spec), None);

        let no_path = crate::build::BuildSpec::new(site.path()).with_env(ExecEnv {
            inherit: false,
            overrides: Default::default(),
        });
        assert_eq!(locate(&no_path), None);
    }
}
