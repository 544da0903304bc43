//! Identity keys declared by transformations.

use crate::utils::hash;
use serde::Serialize;
use std::fmt;

/// Identifies a transformation together with everything that varies its output
/// apart from the input content.
///
/// Two transformations with equal keys over equal input are interchangeable,
/// which is what an owning pipeline's cache relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformationKey {
    name: &'static str,
    fingerprint: String,
}

impl TransformationKey {
    /// Build a key from a transformation name and its serialized settings.
    pub fn new<T: Serialize + ?Sized>(
        name: &'static str,
        settings: &T,
    ) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_vec(settings)?;
        Ok(Self {
            name,
            fingerprint: hash::fingerprint(&encoded),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl fmt::Display for TransformationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.fingerprint)
    }
}
