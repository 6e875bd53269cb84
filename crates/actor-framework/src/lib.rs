//! # Actor Framework
//!
//! This crate provides the foundational building blocks for running a stateful aggregate as a
//! single-owner actor on Tokio. One task owns the state; clients talk to it through channels;
//! periodic timers are registered by the state itself and delivered on the same task.
//!
//! ## Why a Single-Owner Actor?
//!
//! Some domains have invariants that span the whole aggregate ("at most one order is being
//! picked", "no tick may touch state after the match was stopped"). The actor model gives those
//! invariants a home:
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing: every command and every timer tick runs to completion before the next
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model) - Foundational concurrency pattern by Carl Hewitt
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **State Layer** ([`ActorState`]) - Your business logic and domain model
//! 2. **Runtime Layer** ([`StateActor`], [`Timers`]) - Message processing, timer delivery, concurrency
//! 3. **Interface Layer** ([`StateClient`], [`ActorClient`]) - Type-safe communication
//!
//! You write your transitions **once** as plain synchronous methods on the state, and the
//! framework handles the async message passing, timer polling and error boxing.
//!
//! ## Timers Live Inside the Actor
//!
//! A state registers periodic work through the [`Timers`] registry handed to every hook:
//!
//! ```rust,ignore
//! fn handle(&mut self, cmd: Cmd, timers: &mut Timers<Tick>, ctx: &Ctx) -> Result<Reply, Error> {
//!     match cmd {
//!         Cmd::Start => timers.schedule(Tick::Second, Duration::from_secs(1)),
//!         Cmd::Stop => timers.cancel_all(), // no Tick::Second is delivered after this line
//!     }
//!     Ok(Reply::Done)
//! }
//! ```
//!
//! Because the registry is polled by the same loop that runs the hooks, cancellation is
//! synchronous: there is no spawned timer task that could still be holding a pending tick.
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via the `run()` method, not at construction time. A
//! state that publishes events receives the publisher as its `Context`:
//!
//! ```rust,ignore
//! let (actor, client) = StateActor::new(engine, 32);
//! let (events, _) = tokio::sync::broadcast::channel(64);
//! tokio::spawn(actor.run(events.clone()));
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module hands out real `StateClient`s backed by scripted responses, so client
//! wrappers can be tested without a running actor. Timer-driven behavior is best tested against a
//! real actor under `#[tokio::test(start_paused = true)]`.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod message;
pub mod mock;
pub mod state;
pub mod timers;

// Re-export core types for convenience
pub use actor::StateActor;
pub use client::StateClient;
pub use client_trait::ActorClient;
pub use error::FrameworkError;
pub use message::{Response, StateRequest};
pub use state::ActorState;
pub use timers::Timers;
