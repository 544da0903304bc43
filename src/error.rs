//! Transformation error types.

use crate::utils::exec::ExecError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors produced while running a resource transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The external tool backing the transformation is not installed.
    ///
    /// Callers may recover from this, e.g. by keeping a prebuilt asset.
    #[error("`{tool}` is not available (install it into node_modules or on PATH)")]
    FeatureNotAvailable { tool: &'static str },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("failed to encode transformation settings")]
    Key(#[from] serde_json::Error),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

impl TransformError {
    /// Whether the transformation was skipped because its tool is missing.
    pub fn is_feature_not_available(&self) -> bool {
        matches!(self, Self::FeatureNotAvailable { .. })
    }
}
