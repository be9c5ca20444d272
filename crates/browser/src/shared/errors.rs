use curtain_core::DocumentError;

pub fn to_document_error(e: impl std::fmt::Display, action: &str) -> DocumentError {
    let s = e.to_string();
    if s.contains("timeout") || s.contains("Timeout") {
        DocumentError::timeout_error(format!("{} timed out: {}", action, s))
    } else if s.contains("Cannot find context") || s.contains("Execution context was destroyed") {
        DocumentError::script_error(format!("{} lost its page: {}", action, s))
    } else if s.contains("not found") {
        DocumentError::detached(format!("{}: {}", action, s))
    } else {
        DocumentError::browser_error(format!("{} failed: {}", action, s))
    }
}

/// Context loss while the page is still settling is worth a retry.
pub fn is_context_lost(e: &DocumentError) -> bool {
    e.message.contains("lost its page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_core::ErrorCategory;

    #[test]
    fn classifies_by_message() {
        assert_eq!(
            to_document_error("Request Timeout", "Navigate").category,
            ErrorCategory::Timeout
        );
        assert_eq!(
            to_document_error("Element not found", "HideLoader").category,
            ErrorCategory::Detached
        );
        assert_eq!(
            to_document_error("socket closed", "Evaluate").category,
            ErrorCategory::Browser
        );
    }

    #[test]
    fn context_loss_is_retryable() {
        let err = to_document_error("Execution context was destroyed", "CheckReady");
        assert_eq!(err.category, ErrorCategory::ScriptExecution);
        assert!(is_context_lost(&err));
    }
}
