//! Feedback value object for moderation verdicts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Minimum feedback/reason length when rejecting.
pub const MIN_FEEDBACK_LEN: usize = 10;

/// Maximum feedback/reason length.
pub const MAX_FEEDBACK_LEN: usize = 1000;

/// Validated feedback text attached to a moderation verdict.
///
/// Construction enforces the length constraints, so a `Feedback` value in
/// hand means validation already passed and storage may be touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback(String);

impl Feedback {
    /// Creates feedback for a rejection; text is mandatory.
    pub fn required(field: &str, text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        // Bounds are in characters, not bytes.
        let length = trimmed.chars().count();
        if length < MIN_FEEDBACK_LEN || length > MAX_FEEDBACK_LEN {
            return Err(ValidationError::length_out_of_range(
                field,
                MIN_FEEDBACK_LEN,
                MAX_FEEDBACK_LEN,
                length,
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Creates feedback for an approval; absent text becomes empty.
    pub fn optional(field: &str, text: Option<String>) -> Result<Self, ValidationError> {
        match text {
            None => Ok(Self(String::new())),
            Some(text) => {
                let trimmed = text.trim();
                let length = trimmed.chars().count();
                if length > MAX_FEEDBACK_LEN {
                    return Err(ValidationError::length_out_of_range(
                        field,
                        0,
                        MAX_FEEDBACK_LEN,
                        length,
                    ));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    }

    /// Returns the inner text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
