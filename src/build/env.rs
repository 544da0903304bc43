//! Subprocess environment derivation.
//!
//! External tools run with the ambient environment plus a few variables
//! describing the build, then project-level overrides on top:
//!
//! | Variable            | Value                                        |
//! |---------------------|----------------------------------------------|
//! | `NODE_PATH`         | `<working_dir>/node_modules` + ambient value |
//! | `PWD`               | working directory                            |
//! | `BUILD_ENVIRONMENT` | configured environment name                  |

use std::{
    collections::BTreeMap,
    env,
    ffi::{OsStr, OsString},
    path::Path,
};

/// Rule for deriving the environment of external tools.
#[derive(Debug, Clone)]
pub struct ExecEnv {
    /// Start from the ambient process environment.
    pub inherit: bool,
    /// Project-level overrides, applied last.
    pub overrides: BTreeMap<String, String>,
}

impl Default for ExecEnv {
    fn default() -> Self {
        Self {
            inherit: true,
            overrides: BTreeMap::new(),
        }
    }
}

impl ExecEnv {
    /// Derive the environment for a tool running in `working_dir`.
    pub fn derive(&self, working_dir: &Path, environment: &str) -> BTreeMap<OsString, OsString> {
        let ambient: Vec<(OsString, OsString)> = if self.inherit {
            env::vars_os().collect()
        } else {
            Vec::new()
        };
        self.derive_from(ambient, working_dir, environment)
    }

    fn derive_from(
        &self,
        ambient: impl IntoIterator<Item = (OsString, OsString)>,
        working_dir: &Path,
        environment: &str,
    ) -> BTreeMap<OsString, OsString> {
        let mut vars: BTreeMap<OsString, OsString> = ambient.into_iter().collect();

        let node_modules = working_dir.join("node_modules");
        let node_path = match vars.get(OsStr::new("NODE_PATH")) {
            Some(existing) if !existing.is_empty() => {
                let paths = std::iter::once(node_modules.clone()).chain(env::split_paths(existing));
                env::join_paths(paths).unwrap_or_else(|_| node_modules.into_os_string())
            }
            _ => node_modules.into_os_string(),
        };
        vars.insert("NODE_PATH".into(), node_path);
        vars.insert("PWD".into(), working_dir.as_os_str().to_owned());
        vars.insert("BUILD_ENVIRONMENT".into(), environment.into());

        for (key, value) in &self.overrides {
            vars.insert(key.into(), value.into());
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn get<'a>(vars: &'a BTreeMap<OsString, OsString>, key: &str) -> Option<&'a OsStr> {
        vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    #[test]
    fn test_build_variables() {
        let root = PathBuf::from("/site");
        let vars = ExecEnv::default().derive_from(Vec::new(), &root, "production");

        assert_eq!(get(&vars, "NODE_PATH"), Some(root.join("node_modules").as_os_str()));
        assert_eq!(get(&vars, "PWD"), Some(OsStr::new("/site")));
        assert_eq!(get(&vars, "BUILD_ENVIRONMENT"), Some(OsStr::new("production")));
    }

    #[test]
    fn test_node_path_keeps_ambient_entries() {
        let root = PathBuf::from("/site");
        let ambient = vec![("NODE_PATH".into(), OsString::from("/global/lib"))];
        let vars = ExecEnv::default().derive_from(ambient, &root, "production");

        let paths: Vec<PathBuf> = env::split_paths(get(&vars, "NODE_PATH").unwrap()).collect();
        assert_eq!(paths, vec![root.join("node_modules"), PathBuf::from("/global/lib")]);
    }

    #[test]
    fn test_overrides_win() {
        let mut rule = ExecEnv::default();
        rule.overrides.insert("PWD".into(), "/elsewhere".into());
        rule.overrides.insert("NODE_ENV".into(), "development".into());

        let ambient = vec![("NODE_ENV".into(), OsString::from("production"))];
        let vars = rule.derive_from(ambient, Path::new("/site"), "production");

        assert_eq!(get(&vars, "PWD"), Some(OsStr::new("/elsewhere")));
        assert_eq!(get(&vars, "NODE_ENV"), Some(OsStr::new("development")));
    }

    #[test]
    fn test_without_inherit() {
        let rule = ExecEnv {
            inherit: false,
            overrides: BTreeMap::new(),
        };
        let vars = rule.derive(Path::new("/site"), "staging");
        assert_eq!(vars.len(), 3);
        assert_eq!(get(&vars, "BUILD_ENVIRONMENT"), Some(OsStr::new("staging")));
    }
}
