//! Test helpers: stub compilers and isolated build specifications.

use crate::build::{BuildSpec, ExecEnv};
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// Copies stdin to stdout unchanged.
pub const ECHO_STUB: &str = "#!/bin/sh\nexec /bin/cat\n";

/// Consumes stdin, complains on stderr and exits 1.
pub const FAIL_STUB: &str =
    "#!/bin/sh\n/bin/cat >/dev/null\necho 'error: unexpected indentation' >&2\nexit 1\n";

/// Prints its arguments.
pub const ARGS_STUB: &str = "#!/bin/sh\n/bin/cat >/dev/null\necho \"$@\"\n";

/// Prints a few variables of its environment.
pub const ENV_STUB: &str =
    "#!/bin/sh\n/bin/cat >/dev/null\nprintf '%s|%s|%s' \"$BUILD_ENVIRONMENT\" \"$NODE_ENV\" \"$PWD\"\n";

/// Write an executable `coffee` script into `dir`, returning its path.
pub fn write_stub(dir: &Path, body: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(crate::coffee::BINARY_NAME);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Build spec rooted at `root` whose `PATH` holds only `search_dir`.
///
/// Keeps tests independent of any `coffee` installed on the machine.
pub fn isolated_spec(root: &Path, search_dir: Option<&Path>) -> BuildSpec {
    let mut env = ExecEnv::default();
    let path = search_dir.map_or_else(
        || "/nonexistent/coffee-transform-test".to_owned(),
        |dir| dir.display().to_string(),
    );
    env.overrides.insert("PATH".into(), path);
    BuildSpec::new(root).with_env(env)
}
