//! # System Lifecycle & Orchestration
//!
//! Starts the simulator actor, wires its dependencies and shuts it down again.
//!
//! ## Dependency Injection via Context
//!
//! The engine is built with its providers up front, but the event publisher is injected when the
//! actor starts, through `run(context)`:
//!
//! ```rust,ignore
//! let (actor, client) = sim_actor::new(engine);
//! let (events, _) = broadcast::channel(256);
//! let handle = tokio::spawn(actor.run(events.clone()));
//! ```
//!
//! Subscribers attach to the sender kept by [`SimSystem`], so they can come and go without the
//! actor knowing.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the client** - closes the sender side of the command channel
//! 2. **Actor detects closure** - `receiver.recv()` returns `None`
//! 3. **Actor cleans up** - cancels its timers and logs `Shutdown`
//! 4. **Await completion** - [`SimSystem::shutdown`] waits for the task
//!
//! ## Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging for the binary; see the
//! [`tracing`](self::tracing) module for what gets logged at which level.

pub mod sim_system;
pub mod tracing;

pub use self::sim_system::*;
pub use self::tracing::*;
