//! # Simulator Actor
//!
//! Runs the [`SimEngine`] as the state of a [`StateActor`], so every trainee command and every
//! timer tick is applied on one task, one at a time.
//!
//! ## Structure
//!
//! - [`state`] - [`ActorState`](actor_framework::ActorState) implementation for [`SimEngine`]
//! - [`actions`] - [`SimCommand`] and [`SimReply`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Timers
//!
//! Starting a match registers three periodic timers (see [`SimTimer`]). Exiting cancels them
//! before the engine clears its state, and the clock cancels them itself when the match ends.
//!
//! ## Usage
//!
//! ```rust
//! use fulfillment_sim::engine::SimEngine;
//! use fulfillment_sim::providers::{SimSettings, StaticCatalog};
//! use fulfillment_sim::sim_actor::{self, SimCommand, SimReply};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = SimEngine::new(
//!         Arc::new(StaticCatalog::convenience_store()),
//!         Arc::new(SimSettings::default()),
//!     );
//!     let (actor, client) = sim_actor::new(engine);
//!     let (events, _) = tokio::sync::broadcast::channel(64);
//!     tokio::spawn(actor.run(events));
//!
//!     let reply = client.send(SimCommand::StartMatch).await?;
//!     assert!(matches!(reply, SimReply::MatchStarted { first_order: Some(_) }));
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod state;

pub use actions::*;
pub use state::*;

use crate::engine::SimEngine;
use actor_framework::{StateActor, StateClient};

/// Creates a new simulator actor and its client.
pub fn new(engine: SimEngine) -> (StateActor<SimEngine>, StateClient<SimEngine>) {
    StateActor::new(engine, 32)
}
