//! CoffeeScript to JavaScript transformation.
//!
//! Delegates compilation to the `coffee` CLI (`npm install --save-dev
//! coffeescript`). The compiler is looked up in `node_modules/.bin` of the
//! working directory first, then on `PATH`; when neither exists the
//! transformation fails with [`TransformError::FeatureNotAvailable`] so the
//! caller can fall back to prebuilt assets.
//!
//! The output can be fed to further transformations (bundling, minifying).

mod locate;
mod options;

pub use locate::{BINARY_NAME, LOCAL_BIN_DIR, Located, locate};
pub use options::{CoffeeOptions, FieldError, OptionsError, decode_options};

use crate::{
    build::BuildSpec,
    debug,
    error::TransformError,
    pipeline::{
        MediaType, Resource, ResourceTransformation, ResourceTransformer, TransformContext,
        TransformationKey,
    },
    utils::exec::Cmd,
};
use std::sync::Arc;

/// Name the transformation is keyed under.
pub const TRANSFORMATION_NAME: &str = "coffee";

/// Reads the source from stdin and compiles it.
const STDIO_COMPILE: &str = "-sc";

/// Client used to run CoffeeScript transformations for one build.
#[derive(Debug, Clone)]
pub struct CoffeeClient {
    spec: Arc<BuildSpec>,
}

impl CoffeeClient {
    pub fn new(spec: Arc<BuildSpec>) -> Self {
        Self { spec }
    }

    /// Compile `resource` to JavaScript.
    pub fn process<R>(&self, resource: &R, options: CoffeeOptions) -> Result<Resource, TransformError>
    where
        R: ResourceTransformer + ?Sized,
    {
        resource.transform(&CoffeeTransformation::new(Arc::clone(&self.spec), options))
    }

    /// The compiler this client would run, if any.
    pub fn locate(&self) -> Option<Located> {
        locate(&self.spec)
    }
}

/// One CoffeeScript compilation step.
#[derive(Debug, Clone)]
pub struct CoffeeTransformation {
    options: CoffeeOptions,
    spec: Arc<BuildSpec>,
}

impl CoffeeTransformation {
    pub fn new(spec: Arc<BuildSpec>, options: CoffeeOptions) -> Self {
        Self { options, spec }
    }

    pub fn options(&self) -> &CoffeeOptions {
        &self.options
    }

    /// Full argument list passed to the compiler.
    pub fn command_args(&self) -> Vec<&'static str> {
        let mut args = vec![STDIO_COMPILE];
        args.extend(self.options.to_args());
        args
    }
}

impl ResourceTransformation for CoffeeTransformation {
    fn key(&self) -> Result<TransformationKey, TransformError> {
        TransformationKey::new(TRANSFORMATION_NAME, &self.options).map_err(TransformError::from)
    }

    fn transform(&self, ctx: &mut TransformContext<'_>) -> Result<(), TransformError> {
        let Some(binary) = locate(&self.spec) else {
            // Typical on CI servers without node tooling.
            return Err(TransformError::FeatureNotAvailable { tool: BINARY_NAME });
        };
        debug!("coffee"; "compiling {} with {}", ctx.in_path.display(), binary);

        ctx.out_media_type = MediaType::JAVASCRIPT;
        if self.options.output_path.is_empty() {
            ctx.replace_out_path_extension(".js");
        } else {
            ctx.set_path(&self.options.output_path);
        }

        Cmd::new(binary.path())
            .args(self.command_args())
            .cwd(self.spec.working_dir())
            .env_clear()
            .envs(self.spec.exec_environ())
            .stream(&mut *ctx.from, &mut *ctx.to)?;

        Ok(())
    }
}
