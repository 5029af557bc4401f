//! Text validation and excerpts.
//!
//! Lengths are counted in characters, not bytes.

use thiserror::Error;

/// Minimum accepted text length.
pub const MIN_TEXT_CHARS: usize = 10;

/// Maximum accepted text length.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Length of an excerpt before the ellipsis.
pub const EXCERPT_CHARS: usize = 200;

/// Why a text field was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{0}' is required")]
    Missing(&'static str),

    #[error("field '{0}' must be a string")]
    NotAString(&'static str),

    #[error("field '{field}' must be a boolean")]
    NotABoolean { field: &'static str },

    #[error("text must have at least {min} characters (got {len})")]
    TooShort { len: usize, min: usize },

    #[error("text must have at most {max} characters (got {len})")]
    TooLong { len: usize, max: usize },
}

/// Check that `text` is between [`MIN_TEXT_CHARS`] and [`MAX_TEXT_CHARS`]
/// characters long.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort {
            len,
            min: MIN_TEXT_CHARS,
        });
    }
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}

/// Pull a required string field out of a JSON object and validate it.
pub fn required_text<'a>(
    body: &'a serde_json::Value,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    let value = body
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::Missing(field))?;
    let text = value.as_str().ok_or(ValidationError::NotAString(field))?;
    validate_text(text)?;
    Ok(text)
}

/// Pull an optional boolean field out of a JSON object, defaulting to
/// `false`.
pub fn optional_flag(body: &serde_json::Value, field: &'static str) -> Result<bool, ValidationError> {
    match body.get(field) {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or(ValidationError::NotABoolean { field }),
    }
}

/// First [`EXCERPT_CHARS`] characters of `text`, followed by `...` when
/// the text is longer.
pub fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
