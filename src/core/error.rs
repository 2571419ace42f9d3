//! Custom error types for formrunner
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for formrunner operations
#[derive(Error, Debug)]
pub enum FormError {
    /// Descriptor carries no class/id/name/value fragment
    #[error("Field descriptor has no selector fragments")]
    EmptyDescriptor,

    /// Selector matched nothing on the current page
    #[error("No element matches selector '{selector}'")]
    ElementNotFound { selector: String },

    /// Page navigation failed
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Click or typing call failed on a resolved element
    #[error("Interaction with '{selector}' failed: {reason}")]
    Interaction { selector: String, reason: String },

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Registry read/write errors
    #[error("Registry error: {0}")]
    Persistence(String),

    /// Malformed form schema
    #[error("Invalid form schema: {0}")]
    InvalidSchema(String),

    /// Target url could not be parsed
    #[error("Invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Menu or toggle selection out of range
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for formrunner operations
pub type Result<T> = std::result::Result<T, FormError>;

impl FormError {
    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a registry persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a navigation error
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an interaction error
    pub fn interaction(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Interaction {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error only means "this field is not on the page".
    ///
    /// Resolution failures are skipped per field; everything else ends the
    /// attempt.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::EmptyDescriptor | Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_failure_classification() {
        assert!(FormError::EmptyDescriptor.is_resolution_failure());
        assert!(FormError::ElementNotFound {
            selector: "#x".to_string()
        }
        .is_resolution_failure());
        assert!(!FormError::navigation("https://a.test", "timeout").is_resolution_failure());
        assert!(!FormError::interaction("#x", "detached").is_resolution_failure());
        assert!(!FormError::persistence("disk full").is_resolution_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = FormError::ElementNotFound {
            selector: "#subBtn".to_string(),
        };
        assert_eq!(err.to_string(), "No element matches selector '#subBtn'");
    }
}
