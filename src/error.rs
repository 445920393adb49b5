//! Error handling for the flowscope crate
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate.

use thiserror::Error;

/// Main error type for flowscope operations
#[derive(Error, Debug)]
pub enum FlowScopeError {
    /// A selector value that can never match anything (empty label set,
    /// unknown label or working-hour token)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A field name outside the enumeration a view accepts
    #[error("Invalid field `{field}` for {view}: {message}")]
    InvalidField {
        view: &'static str,
        field: String,
        message: String,
    },

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowScopeError>,
    },
}

impl FlowScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid-field error for a named view
    pub fn invalid_field(
        view: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FlowScopeError::InvalidField {
            view,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for flowscope operations
pub type Result<T> = std::result::Result<T, FlowScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlowScopeError::InvalidSelection("empty label selection".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid selection: empty label selection"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = FlowScopeError::Config("missing file".to_string());
        let with_ctx = err.with_context("Failed to load dashboard config");
        assert!(with_ctx.to_string().contains("Failed to load dashboard config"));
    }

    #[test]
    fn test_invalid_field_error() {
        let err = FlowScopeError::invalid_field("scatter", "bandwidth", "unknown metric");
        assert!(err.to_string().contains("bandwidth"));
        assert!(err.to_string().contains("scatter"));
    }
}
