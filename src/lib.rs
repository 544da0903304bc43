//! CoffeeScript transformation for static-site asset pipelines.
//!
//! Compiles CoffeeScript resources by streaming them through the external
//! `coffee` compiler and rewriting the resource metadata (media type, path)
//! to describe the produced JavaScript.
//!
//! ```ignore
//! let spec = Arc::new(BuildSpec::new(site_root));
//! let client = CoffeeClient::new(spec);
//! let js = client.process(&resource, CoffeeOptions { bare: true, ..Default::default() })?;
//! ```

pub mod build;
pub mod cli;
pub mod coffee;
pub mod config;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod utils;

#[cfg(all(test, unix))]
mod testing;

pub use build::BuildSpec;
pub use coffee::{CoffeeClient, CoffeeOptions, CoffeeTransformation, decode_options};
pub use error::TransformError;
