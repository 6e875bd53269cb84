//! # Fulfillment Simulator
//!
//! The order lifecycle engine of an order-fulfillment training simulator: simulated delivery
//! orders arrive, the trainee picks the requested items, packs them and hands them to a driver
//! before the order times out or the match clock runs down.
//!
//! - **[model]**: Pure data ([`Item`](model::Item), [`Order`](model::Order), sessions).
//! - **[providers]**: The catalog and settings the engine reads but does not own.
//! - **[engine]**: The synchronous, tick-driven [`SimEngine`](engine::SimEngine).
//! - **[sim_actor]**: The engine running as a single-owner actor with its own timers.
//! - **[clients]**: [`SimClient`](clients::SimClient), the typed API over the actor.
//! - **[lifecycle]**: [`SimSystem`](lifecycle::SimSystem) wiring and tracing setup.

pub mod clients;
pub mod engine;
pub mod lifecycle;
pub mod model;
pub mod providers;
pub mod sim_actor;
