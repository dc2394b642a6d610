//! Error types for the CAM tools crate.
//!
//! The interpreters never fail: unrecognised input is skipped. The only
//! fallible operations here parse user-supplied classification hints.

use thiserror::Error;

/// Errors that can occur while parsing CAM tool inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CamToolError {
    /// A layer role name was not recognised.
    #[error("Unknown layer role: {0}")]
    UnknownRole(String),

    /// A classification hint could not be parsed.
    #[error("Invalid hint '{hint}': {reason}")]
    InvalidHint { hint: String, reason: String },
}

impl CamToolError {
    pub fn invalid_hint(hint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHint {
            hint: hint.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for CAM tool operations.
pub type Result<T> = std::result::Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CamToolError::UnknownRole("top_kapton".to_string());
        assert_eq!(err.to_string(), "Unknown layer role: top_kapton");

        let err = CamToolError::invalid_hint("board.gbr", "expected PATTERN=ROLE");
        assert_eq!(
            err.to_string(),
            "Invalid hint 'board.gbr': expected PATTERN=ROLE"
        );
    }
}
