//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the `tracing-subscriber` fmt layer used by the binary. Library code
//! only emits events; it never installs a subscriber itself.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: `Actor started` / `Shutdown` with the state type
//! - **Match milestones** at `info`: match started, order spawned, packed, picked up, match ended
//! - **Rejected commands and mistakes** at `warn`: invalid transitions, mismatched picks, timeouts
//! - **Per-command and per-tick detail** at `debug`, with the command as a `?command` field
//!
//! ## Usage Examples
//!
//! ```bash
//! # Milestones only
//! RUST_LOG=info cargo run -p fulfillment-sim
//!
//! # Every command and tick
//! RUST_LOG=debug cargo run -p fulfillment-sim
//!
//! # Countdown included
//! RUST_LOG=fulfillment_sim=trace cargo run -p fulfillment-sim
//! ```
//!
//! With `RUST_LOG=info` a short match looks like:
//!
//! ```text
//! INFO Actor started state_type="SimEngine"
//! INFO Match started settings=SimSettings { order_timeout_seconds: 60, .. }
//! INFO Order spawned order_id=4821 platform=UberEats live=1
//! INFO Order packed order_id=4821 score=10
//! INFO Order picked up order_id=4821 score=30
//! INFO Match ended score=30 mistakes=0
//! INFO Shutdown state_type="SimEngine"
//! ```

/// Initializes the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
