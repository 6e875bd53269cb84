//! # ActorState Trait
//!
//! The `ActorState` trait defines the contract that a single-owner state value must implement to be
//! driven by the generic `StateActor`. It specifies associated types for commands, replies,
//! snapshots, timer keys, context and errors, and the hooks the actor calls when a command arrives
//! or a registered timer fires.
//!
//! # Architecture Note
//! Why a single state value instead of a store of entities?
//! Some resources are one aggregate with cross-cutting invariants (e.g. "at most one order is being
//! picked"). Splitting them into independent entities would require coordination between actors.
//! Keeping the whole aggregate inside one actor means every invariant is checked on a single task,
//! and commands and timer ticks can never interleave.
//!
//! # Synchronous Hooks
//! Unlike an entity hook that may call other actors, `handle` and `on_timer` are **synchronous**.
//! Each call runs to completion before the actor looks at the next message or tick, so there is no
//! suspension point in the middle of a state transition.

use crate::timers::Timers;
use std::fmt::Debug;
use std::hash::Hash;
use tokio::time::Instant;

/// Trait that a state aggregate must implement to be managed by `StateActor`.
///
/// # Context
/// The `Context` type is injected into every hook, the same "Late Binding" used for actor
/// dependencies: it is passed to `run()` rather than `new()`.
///
/// # Timers
/// Hooks receive the actor's [`Timers`] registry. Registering a timer from inside a hook makes the
/// actor deliver [`ActorState::on_timer`] calls on that schedule; cancelling it from inside a hook
/// guarantees no further tick for that key is delivered, because the registry is owned by the same
/// task that runs the hooks.
pub trait ActorState: Send + 'static {
    /// Requests the state understands (e.g. `StartMatch`, `PickItem`).
    type Command: Send + Debug;

    /// The result type returned by a successful command.
    type Reply: Send + Debug;

    /// A read-only copy of the state handed to clients.
    type Snapshot: Send + Debug;

    /// Keys identifying the periodic timers this state registers.
    type Timer: Copy + Eq + Hash + Send + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for rejected commands.
    ///
    /// # Design Note: Error Granularity
    ///
    /// One error enum per state, not one per command. Clients deal with a single type, and the
    /// framework boxes it into [`FrameworkError::Rejected`](crate::FrameworkError::Rejected) so
    /// that typed errors can be recovered with `downcast`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once when the actor loop starts, before any message is processed.
    fn on_start(&mut self, _timers: &mut Timers<Self::Timer>, _ctx: &Self::Context) {}

    /// Handle a command. A rejected command must leave the state unchanged.
    fn handle(
        &mut self,
        command: Self::Command,
        timers: &mut Timers<Self::Timer>,
        ctx: &Self::Context,
    ) -> Result<Self::Reply, Self::Error>;

    /// Called when a registered timer fires. `now` is captured once per tick.
    fn on_timer(
        &mut self,
        timer: Self::Timer,
        now: Instant,
        timers: &mut Timers<Self::Timer>,
        ctx: &Self::Context,
    );

    /// Produce a read-only snapshot of the current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Called once after the channel closes and all timers have been dropped.
    fn on_stop(&mut self, _ctx: &Self::Context) {}
}
