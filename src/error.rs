//! Error types for xsdgen
//!
//! This module defines all error types used throughout the library.
//! Missing extension types are not errors: they are reported through
//! `tracing` and the offending edge is dropped.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdgen Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// The class hierarchy cannot be expressed in the generated code
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(#[from] HierarchyError),

    /// A precondition established by an earlier pass does not hold
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Invalid generator configuration
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// An enumeration class extends a complex type it cannot absorb
#[derive(Debug, Clone)]
pub struct HierarchyError {
    /// Error message
    pub message: String,
    /// Qualified name of the class being resolved
    pub class: Option<String>,
    /// Qualified name of the offending base class
    pub base: Option<String>,
}

impl HierarchyError {
    /// Create a new hierarchy error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            class: None,
            base: None,
        }
    }

    /// Set the class being resolved
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the base class
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref class) = self.class {
            write!(f, "\n\nClass: {}", class)?;
        }

        if let Some(ref base) = self.base {
            write!(f, "\n\nBase: {}", base)?;
        }

        Ok(())
    }
}

impl std::error::Error for HierarchyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_error_display() {
        let err = HierarchyError::new("Enumeration class with a complex extension.")
            .with_class("{urn:a}Colors")
            .with_base("{urn:a}Palette");

        let msg = format!("{}", err);
        assert!(msg.contains("Enumeration class with a complex extension."));
        assert!(msg.contains("Class: {urn:a}Colors"));
        assert!(msg.contains("Base: {urn:a}Palette"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = HierarchyError::new("test").into();
        assert!(matches!(err, Error::InvalidHierarchy(_)));

        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_xml_error_conversion() {
        let err: Error = roxmltree::Document::parse("<a>").unwrap_err().into();
        assert!(matches!(err, Error::Xml(_)));
        assert!(err.to_string().starts_with("XML error"));
    }
}
