//! # Framework Errors
//!
//! This module defines the common error types used throughout the actor framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! all actors and clients.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// The state rejected the command. The boxed value is the state's own `Error` type and can be
    /// recovered with `downcast`.
    #[error("Command rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}
