//! Domain-specific wrappers around the generic `StateClient`.

pub mod sim_client;

pub use sim_client::SimClient;
