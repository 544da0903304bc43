//! `locate` command.

use crate::{
    coffee::{BINARY_NAME, LOCAL_BIN_DIR, Located, locate},
    config::ProjectConfig,
    log,
};
use anyhow::{Result, bail};

/// Report which compiler a build would use.
pub fn run_locate(config: &ProjectConfig) -> Result<Located> {
    let spec = config.build_spec();
    match locate(&spec) {
        Some(found) => {
            log!("coffee"; "{}", found);
            Ok(found)
        }
        None => bail!(
            "`{}` not found in {} or on PATH (npm install --save-dev coffeescript)",
            BINARY_NAME,
            spec.working_dir().join(LOCAL_BIN_DIR).display()
        ),
    }
}
