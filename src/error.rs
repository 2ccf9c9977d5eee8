// Error handling for cardtemplate

use std::fmt;

/// Failures that abort a render and trigger the fallback to the original template text.
///
/// Absent paths and unmatched `$when` predicates are not errors; they are resolved
/// where they occur and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    MalformedInput(String),
    MissingField(String),
    NotAnArray(String),
    IndexOutOfRange { path: String, index: usize },
    DepthExceeded(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            RenderError::MissingField(field) => write!(f, "Missing required field: {}", field),
            RenderError::NotAnArray(path) => write!(f, "Expected an array at '{}'", path),
            RenderError::IndexOutOfRange { path, index } => {
                write!(f, "Index {} is out of range for '{}'", index, path)
            }
            RenderError::DepthExceeded(max) => {
                write!(f, "Template nesting exceeds the maximum depth of {}", max)
            }
        }
    }
}

impl std::error::Error for RenderError {}

// Helper to tag JSON decoding failures
impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::MalformedInput(err.to_string())
    }
}
