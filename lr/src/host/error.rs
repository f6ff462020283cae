//! Host error types

use thiserror::Error;

/// Faults raised while reading host state or performing a host action
///
/// An absent object or an unavailable editor is not a fault: reads report
/// those as `Ok(None)`. `HostError` covers reads that broke part way, such
/// as a mesh that became invalid mid-read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("Host facility unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid host state: {0}")]
    InvalidState(String),

    #[error("Action {action} failed: {reason}")]
    ActionFailed { action: String, reason: String },
}

impl HostError {
    /// Build an `ActionFailed` error for the named action
    pub fn action(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActionFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

/// Result of a host read or action
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = HostError::action("enter-mode", "no active object");
        assert_eq!(err.to_string(), "Action enter-mode failed: no active object");
    }

    #[test]
    fn test_invalid_state_display() {
        let err = HostError::InvalidState("mesh freed".to_string());
        assert!(err.to_string().contains("mesh freed"));
    }
}
