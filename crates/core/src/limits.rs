//! Size limits for encoded values
//!
//! Limits are enforced by the codec: text fields and the total encoding are
//! bounded on encode, and the input is bounded on decode before any parsing
//! happens. Custom limits are set through configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits enforced by the codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum length of a single text field in bytes (default: 64KB)
    pub max_text_bytes: usize,

    /// Maximum length of an encoded value in bytes (default: 1MB)
    pub max_encoded_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_text_bytes: 64 * 1024,
            max_encoded_bytes: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_text_bytes: 16,
            max_encoded_bytes: 64,
        }
    }

    /// Validate a text field length
    pub fn validate_text(&self, text: &str) -> Result<(), LimitError> {
        if text.len() > self.max_text_bytes {
            return Err(LimitError::TextTooLong {
                actual: text.len(),
                max: self.max_text_bytes,
            });
        }
        Ok(())
    }

    /// Validate an encoded length
    pub fn validate_encoded(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_encoded_bytes {
            return Err(LimitError::EncodingTooLarge {
                actual: len,
                max: self.max_encoded_bytes,
            });
        }
        Ok(())
    }

    /// Check the limits themselves are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_bytes == 0 {
            return Err("max_text_bytes must be greater than zero".to_string());
        }
        if self.max_encoded_bytes < 2 {
            return Err("max_encoded_bytes must allow at least an empty object".to_string());
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// A text field exceeds the maximum length
    #[error("text of {actual} bytes exceeds maximum {max}")]
    TextTooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// The encoding exceeds the maximum size
    #[error("encoding of {actual} bytes exceeds maximum {max}")]
    EncodingTooLarge {
        /// Actual size in bytes
        actual: usize,
        /// Maximum allowed size
        max: usize,
    },
}
