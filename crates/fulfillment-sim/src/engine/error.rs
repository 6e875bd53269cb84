use thiserror::Error;

/// Errors the order lifecycle engine reports back to its caller.
///
/// Mismatched picks and timeout evictions are not errors; they are scored outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid transition in {operation}: {reason}")]
    InvalidTransition {
        operation: &'static str,
        reason: String,
    },
    #[error("Catalog is empty")]
    EmptyCatalog,
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl EngineError {
    pub fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, EngineError::InvalidTransition { .. })
    }
}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::ActorCommunication(msg)
    }
}
