//! In-memory resources and the transformation entry point.

use super::{MediaType, ResourceTransformation, TransformContext, TransformationKey};
use crate::error::TransformError;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

/// Anything a transformation can be applied to.
pub trait ResourceTransformer {
    /// Run `transformation` over this resource, producing a new resource.
    fn transform(
        &self,
        transformation: &dyn ResourceTransformation,
    ) -> Result<Resource, TransformError>;
}

/// A named build artifact held in memory.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Target path, relative to the output root.
    path: PathBuf,
    media_type: MediaType,
    content: Vec<u8>,
    /// Keys of the transformations that produced this resource, in order.
    keys: Vec<TransformationKey>,
}

impl Resource {
    pub fn new(path: impl Into<PathBuf>, media_type: MediaType, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            media_type,
            content: content.into(),
            keys: Vec::new(),
        }
    }

    /// Load `rel` (relative to `root`), guessing its media type from the extension.
    pub fn from_file(root: &Path, rel: &Path) -> Result<Self, TransformError> {
        let source = root.join(rel);
        let content = fs::read(&source).map_err(|err| TransformError::Io(source, err))?;
        Ok(Self::new(rel, MediaType::from_path(rel), content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn keys(&self) -> &[TransformationKey] {
        &self.keys
    }

    /// Write the content to `dir` joined with the resource path.
    ///
    /// Returns the written file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, TransformError> {
        let dest = dir.join(&self.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|err| TransformError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&dest, &self.content).map_err(|err| TransformError::Io(dest.clone(), err))?;
        Ok(dest)
    }
}

impl ResourceTransformer for Resource {
    /// The output buffer is discarded unless the transformation succeeds.
    fn transform(
        &self,
        transformation: &dyn ResourceTransformation,
    ) -> Result<Resource, TransformError> {
        let key = transformation.key()?;
        let mut from = Cursor::new(self.content.as_slice());
        let mut to = Vec::new();

        let (path, media_type) = {
            let mut ctx =
                TransformContext::new(&mut from, &mut to, &self.path, self.media_type.clone());
            transformation.transform(&mut ctx)?;
            (ctx.out_path, ctx.out_media_type)
        };

        let mut keys = self.keys.clone();
        keys.push(key);

        Ok(Resource {
            path,
            media_type,
            content: to,
            keys,
        })
    }
}
