//! Per-invocation transformation context.

use super::MediaType;
use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Handle passed to a transformation for one resource.
///
/// Exposes the input and output streams plus the metadata a transformation
/// may rewrite. `out_path` starts equal to `in_path`.
pub struct TransformContext<'a> {
    /// Source bytes of the resource.
    pub from: &'a mut (dyn Read + Send),
    /// Sink for the transformed bytes.
    pub to: &'a mut dyn Write,
    /// Target path of the resource before this step.
    pub in_path: PathBuf,
    /// Target path after this step.
    pub out_path: PathBuf,
    pub in_media_type: MediaType,
    pub out_media_type: MediaType,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        from: &'a mut (dyn Read + Send),
        to: &'a mut dyn Write,
        path: &Path,
        media_type: MediaType,
    ) -> Self {
        Self {
            from,
            to,
            in_path: path.to_path_buf(),
            out_path: path.to_path_buf(),
            in_media_type: media_type.clone(),
            out_media_type: media_type,
        }
    }

    /// Set `out_path` to `in_path` with its extension replaced.
    ///
    /// `ext` may be given with or without the leading dot.
    pub fn replace_out_path_extension(&mut self, ext: &str) {
        self.out_path = self.in_path.with_extension(ext.trim_start_matches('.'));
    }

    /// Replace the resource path for this and all following steps.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.in_path = path.into();
        self.out_path = self.in_path.clone();
    }
}
