//! # Error Types
//!
//! Domain-specific error types for tube-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tube-core errors (this file)                                          │
//! │  └── CoreError        - Malformed cookie lines, bad version tags       │
//! │                                                                         │
//! │  tube-store errors (separate crate)                                    │
//! │  └── StoreError       - File and settings failures                     │
//! │                                                                         │
//! │  tube-update errors (separate crate)                                   │
//! │  └── UpdateError      - Release check / download / install failures    │
//! │                                                                         │
//! │  Tauri API errors (in app)                                             │
//! │  └── ApiError         - What the toolbar sees (serialized)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Empty address-bar input is not an error: `classify` returns `None`.

use thiserror::Error;

/// Core logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A line could not be parsed with the Set-Cookie grammar.
    ///
    /// ## When This Occurs
    /// - Garbage or truncated line in `cookies.txt`
    /// - Missing `name=value` pair
    /// - Empty cookie name (`=value`)
    #[error("Invalid cookie line: {reason}")]
    InvalidCookie { reason: String },

    /// A release tag is not a dotted numeric version.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

impl From<cookie::ParseError> for CoreError {
    fn from(err: cookie::ParseError) -> Self {
        CoreError::InvalidCookie {
            reason: err.to_string(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidVersion("banana".to_string());
        assert_eq!(err.to_string(), "Invalid version: banana");

        let err = CoreError::InvalidCookie {
            reason: "empty line".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid cookie line: empty line");
    }

    #[test]
    fn test_cookie_parse_error_converts() {
        let parse_err = match cookie::Cookie::parse("no-pair-here") {
            Err(e) => e,
            Ok(_) => panic!("line without '=' must not parse"),
        };
        let core_err: CoreError = parse_err.into();
        assert!(matches!(core_err, CoreError::InvalidCookie { .. }));
    }
}
