//! Core error types for Kho

use std::fmt::Display;
use thiserror::Error;

/// Result type alias for Kho operations
pub type KhoResult<T> = Result<T, KhoError>;

/// Extension trait for adding context to Result types
///
/// The error keeps the variant its `From` conversion gives it; the context
/// lands in that variant's context slot.
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: Display>(self, context: C) -> KhoResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> KhoResult<T>;
}

impl<T, E: Into<KhoError>> ResultExt<T> for Result<T, E> {
    fn context<C: Display>(self, context: C) -> KhoResult<T> {
        self.map_err(|e| Into::<KhoError>::into(e).with_context(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> KhoResult<T> {
        self.map_err(|e| Into::<KhoError>::into(e).with_context(f().to_string()))
    }
}

/// Extension trait turning a missing value into a `NotFound` error
pub trait OptionExt<T> {
    /// Convert Option to Result with context message
    fn context<C: Display>(self, context: C) -> KhoResult<T>;

    /// Convert Option to Result with lazy context message
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> KhoResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> KhoResult<T> {
        self.ok_or_else(|| KhoError::not_found(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> KhoResult<T> {
        self.ok_or_else(|| KhoError::not_found(f().to_string()))
    }
}

/// Main error type for Kho
///
/// Every variant owns plain strings so the error stays `Clone`; shared
/// in-flight fetches hand the same error to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KhoError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Durable store errors (unavailable, quota, corrupt payload)
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        key: Option<String>,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Page data fetch callback failed
    #[error("Fetch error: {message}")]
    Fetch {
        message: String,
        key: Option<String>,
    },

    /// Cache errors
    #[error("Cache error: {message}")]
    Cache {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_context_keeps_variant() {
        let parsed: KhoResult<serde_json::Value> =
            serde_json::from_str("{ nope").context("Parsing cached products");
        let err = parsed.unwrap_err();
        assert!(matches!(err, KhoError::Json { .. }));
        assert_eq!(err.context(), Some("Parsing cached products"));
    }

    #[test]
    fn test_result_with_context_is_lazy() {
        let ok: Result<u8, std::io::Error> = Ok(3);
        let value = ok
            .with_context(|| -> String { panic!("context built for an Ok value") })
            .unwrap();
        assert_eq!(value, 3);

        let failed: KhoResult<()> = Err(KhoError::storage("quota exceeded"));
        let err = failed.with_context(|| "Flushing tab data").unwrap_err();
        assert!(matches!(err, KhoError::Storage { .. }));
        assert_eq!(err.context(), Some("Flushing tab data"));
    }

    #[test]
    fn test_option_context_is_not_found() {
        let missing: Option<u8> = None;
        let err = missing.context("No cached data for /kho-products").unwrap_err();
        assert_eq!(err.error_code(), "KHO_NOT_FOUND");
        assert_eq!(err.to_string(), "Not found: No cached data for /kho-products");

        assert_eq!(Some(7).with_context(|| "unused").unwrap(), 7);
    }
}
