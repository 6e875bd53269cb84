//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `StateClient` and `StateActor`.

use crate::error::FrameworkError;
use crate::state::ActorState;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// There are only two shapes of request: a typed [`ActorState::Command`] that may mutate the state,
/// and a read-only `Snapshot`. Timer ticks never travel through the channel; they are produced by
/// the actor's own [`Timers`](crate::Timers) registry.
#[derive(Debug)]
pub enum StateRequest<S: ActorState> {
    Command {
        command: S::Command,
        respond_to: Response<S::Reply>,
    },
    Snapshot {
        respond_to: Response<S::Snapshot>,
    },
}
