//! Media types of pipeline resources.

use std::{borrow::Cow, fmt, path::Path};

/// MIME type attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(Cow<'static, str>);

impl MediaType {
    pub const JAVASCRIPT: Self = Self(Cow::Borrowed("application/javascript"));
    pub const COFFEESCRIPT: Self = Self(Cow::Borrowed("text/coffeescript"));
    pub const CSS: Self = Self(Cow::Borrowed("text/css"));
    pub const JSON: Self = Self(Cow::Borrowed("application/json"));
    pub const OCTET_STREAM: Self = Self(Cow::Borrowed("application/octet-stream"));

    /// Create a media type from an arbitrary MIME string.
    pub fn new(mime: impl Into<Cow<'static, str>>) -> Self {
        Self(mime.into())
    }

    /// Guess media type from file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("coffee" | "litcoffee") => Self::COFFEESCRIPT,
            Some("js" | "mjs" | "cjs") => Self::JAVASCRIPT,
            Some("css") => Self::CSS,
            Some("json" | "map") => Self::JSON,
            _ => Self::OCTET_STREAM,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
