//! CoffeeScript compiler options.
//!
//! Options arrive as a loosely typed mapping (template parameters, the
//! `[coffee]` config table) and are decoded into [`CoffeeOptions`]:
//!
//! ```toml
//! [coffee]
//! OutputPath = "js/main.js"
//! InlineMap = true
//! bare = "true"        # strings and numbers are coerced
//! no_header = 1
//! ```

use crate::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Options of the `coffee` CLI, see <https://coffeescript.org/#cli>.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CoffeeOptions {
    /// Custom output path of the JS file (empty = source path with `.js`).
    pub output_path: String,
    /// Include the source map directly in the compiled JavaScript file.
    pub inline_map: bool,
    /// Compile without the top-level function safety wrapper.
    pub bare: bool,
    /// Suppress the "Generated by CoffeeScript" header.
    pub no_header: bool,
}

impl CoffeeOptions {
    /// Compiler flags for these options, in the order the CLI documents them.
    ///
    /// `output_path` has no flag; it only changes the resource path.
    pub fn to_args(&self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.inline_map {
            args.push("--inline-map");
        }
        if self.bare {
            args.push("--bare");
        }
        if self.no_header {
            args.push("--no-header");
        }
        args
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// A single field that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Key as written in the input mapping.
    pub key: String,
    /// Expected type (`bool` or `string`).
    pub expected: &'static str,
    /// Offending value, JSON-encoded.
    pub found: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: expected {}, found {}", self.key, self.expected, self.found)
    }
}

/// Options mapping could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coffee options: {}", list(.0))]
pub struct OptionsError(pub Vec<FieldError>);

impl OptionsError {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

fn list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Clone, Copy)]
enum Field {
    OutputPath,
    InlineMap,
    Bare,
    NoHeader,
}

impl Field {
    /// Match a key ignoring ASCII case, `_` and `-`.
    fn lookup(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "outputpath" => Some(Self::OutputPath),
            "inlinemap" => Some(Self::InlineMap),
            "bare" => Some(Self::Bare),
            "noheader" => Some(Self::NoHeader),
            _ => None,
        }
    }
}

/// Decode options from a loosely typed mapping.
///
/// `None` yields the defaults. Unknown keys are ignored. Values are coerced
/// where the meaning is unambiguous (`"true"`, `1`, `null`); anything else
/// fails the whole decode with every offending field listed.
pub fn decode_options(input: Option<&Map<String, Value>>) -> Result<CoffeeOptions, OptionsError> {
    let mut opts = CoffeeOptions::default();
    let Some(map) = input else {
        return Ok(opts);
    };

    let mut errors = Vec::new();
    for (key, value) in map {
        let Some(field) = Field::lookup(key) else {
            debug!("coffee"; "ignoring unknown option `{}`", key);
            continue;
        };

        let decoded = match field {
            Field::OutputPath => weak_string(value).map(|v| opts.output_path = v),
            Field::InlineMap => weak_bool(value).map(|v| opts.inline_map = v),
            Field::Bare => weak_bool(value).map(|v| opts.bare = v),
            Field::NoHeader => weak_bool(value).map(|v| opts.no_header = v),
        };

        if let Err(expected) = decoded {
            errors.push(FieldError {
                key: key.clone(),
                expected,
                found: value.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(opts)
    } else {
        Err(OptionsError(errors))
    }
}

/// Coerce a value to bool, returning the expected type name on failure.
fn weak_bool(value: &Value) -> Result<bool, &'static str> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.as_str() {
            "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            _ => Err("bool"),
        },
        Value::Array(_) | Value::Object(_) => Err("bool"),
    }
}

/// Coerce a value to string, returning the expected type name on failure.
fn weak_string(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_owned()),
        Value::Number(n) => Ok(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // Plain decimal notation, shortest form.
            (_, _, Some(f)) => format!("{f}"),
            _ => n.to_string(),
        }),
        Value::Array(_) | Value::Object(_) => Err("string"),
    }
}
