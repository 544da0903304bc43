//! Resource transformation pipeline boundary.
//!
//! The pieces a transformation is written against:
//!
//! | Type                     | Role                                          |
//! |--------------------------|-----------------------------------------------|
//! | `ResourceTransformation` | one processing step (key + transform)         |
//! | `TransformContext`       | streams and mutable metadata for one step     |
//! | `ResourceTransformer`    | something a step can be applied to            |
//! | `Resource`               | in-memory artifact implementing the above     |

mod context;
mod key;
mod media;
mod resource;

pub use context::TransformContext;
pub use key::TransformationKey;
pub use media::MediaType;
pub use resource::{Resource, ResourceTransformer};

use crate::error::TransformError;

/// A single named processing step applied to a resource.
pub trait ResourceTransformation: Send + Sync {
    /// Identity of this step including everything that varies its output.
    fn key(&self) -> Result<TransformationKey, TransformError>;

    /// Read `ctx.from`, write `ctx.to`, and update the output metadata.
    fn transform(&self, ctx: &mut TransformContext<'_>) -> Result<(), TransformError>;
}
