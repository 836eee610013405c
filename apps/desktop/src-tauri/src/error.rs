//! # API Error Type
//!
//! Unified error type for Tauri commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in TubeClient                             │
//! │                                                                         │
//! │  Toolbar / page script          Rust Backend                            │
//! │  ─────────────────────          ────────────                            │
//! │                                                                         │
//! │  invoke('navigate', { input })                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad address? ────── ApiError::validation("...") ──────────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Window gone? ────── tauri::Error ──► WINDOW_ERROR ────────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await invoke('navigate', { input })                                  │
//! │  } catch (e) {                                                          │
//! │    // e.code = "WINDOW_ERROR"                                           │
//! │    // e.message = "Content view is not open"                            │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tauri Error Serialization
//! Tauri requires errors to be serializable. `ApiError` carries a
//! machine-readable `code` and a human-readable `message`.

use serde::Serialize;

/// API error returned from Tauri commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "WINDOW_ERROR",
///   "message": "Content view is not open"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input could not be used (bad URL from a page script)
    ValidationError,

    /// Window or webview operation failed, or the view is gone
    WindowError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a window error.
    pub fn window(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::WindowError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts Tauri runtime errors to API errors.
impl From<tauri::Error> for ApiError {
    fn from(err: tauri::Error) -> Self {
        tracing::error!("Window operation failed: {}", err);
        ApiError::window(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::window("Content view is not open");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "WINDOW_ERROR");
        assert_eq!(json["message"], "Content view is not open");
    }

    #[test]
    fn test_display() {
        let err = ApiError::validation("not a URL");
        assert_eq!(err.to_string(), "[ValidationError] not a URL");
    }
}
