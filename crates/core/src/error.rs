use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for document environment failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document could not be enumerated into a snapshot
    Enumeration,
    /// Injected script failed or returned an unexpected shape
    ScriptExecution,
    /// Network-level failures (HTTP errors, unreachable hosts)
    Fetch,
    /// Browser/driver errors
    Browser,
    /// Markup or URL parsing errors
    Parsing,
    /// Writing downloads or reports failed
    Storage,
    /// The element is no longer part of the document
    Detached,
    /// Waiting on the page took too long
    Timeout,
    /// The gate task ended without delivering its report
    Abandoned,
    /// Unknown or uncategorized errors
    Unknown,
}

/// Structured error with context, shared by every document environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{category:?}] {message}")]
pub struct DocumentError {
    /// Error category for programmatic handling
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Optional context (URL, selector, element id, etc.)
    pub context: serde_json::Value,
}

impl DocumentError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            context: serde_json::json!({}),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    // Convenience constructors
    pub fn enumeration_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Enumeration, message)
    }

    pub fn script_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ScriptExecution, message)
    }

    pub fn fetch_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(ErrorCategory::Fetch, message).with_context(serde_json::json!({ "url": url }))
    }

    pub fn browser_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Browser, message)
    }

    pub fn parsing_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Parsing, message)
    }

    pub fn storage_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Storage, message)
    }

    pub fn detached(element: impl Into<String>) -> Self {
        let element = element.into();
        Self::new(ErrorCategory::Detached, format!("Element is detached: {}", element))
            .with_context(serde_json::json!({ "element": element }))
    }

    pub fn timeout_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, message)
    }

    pub fn abandoned(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Abandoned, message)
    }
}
