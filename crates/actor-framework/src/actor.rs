//! # Generic Actor Server
//!
//! This module defines the `StateActor`, the core component that owns a single state aggregate.
//! It implements the "Server" side of the Actor Model, processing commands and timer ticks
//! sequentially and ensuring exclusive access to the state.

use crate::client::StateClient;
use crate::error::FrameworkError;
use crate::message::StateRequest;
use crate::state::ActorState;
use crate::timers::Timers;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// The generic actor that owns one `ActorState` value.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state, the timer registry and the
/// receiver end of the channel.
///
/// **Concurrency Model**:
/// Commands from any number of cloned clients and ticks from any number of registered timers are
/// multiplexed onto one Tokio task. Each one is handled to completion before the next is looked at,
/// so the state needs no `Mutex` and two transitions can never interleave.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `StateActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorState, StateActor, Timers};
/// use tokio::time::Instant;
///
/// #[derive(Debug, Default)] struct Tally { hits: u32 }
/// #[derive(Debug)] struct Hit;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] enum NoTimer {}
/// #[derive(Debug, thiserror::Error)] #[error("tally error")] struct TallyError;
///
/// impl ActorState for Tally {
///     type Command = Hit;
///     type Reply = u32;
///     type Snapshot = u32;
///     type Timer = NoTimer;
///     type Context = ();
///     type Error = TallyError;
///
///     fn handle(&mut self, _: Hit, _: &mut Timers<NoTimer>, _: &()) -> Result<u32, TallyError> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
///     fn on_timer(&mut self, _: NoTimer, _: Instant, _: &mut Timers<NoTimer>, _: &()) {}
///     fn snapshot(&self) -> u32 { self.hits }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     // 1. Create
///     let (actor, client) = StateActor::new(Tally::default(), 10);
///
///     // 2. Wire & Run
///     tokio::spawn(actor.run(()));
///
///     // 3. Use
///     assert_eq!(client.send(Hit).await.unwrap(), 1);
///     assert_eq!(client.snapshot().await.unwrap(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Command**: calls [`ActorState::handle`]; an `Err` is boxed into
///   [`FrameworkError::Rejected`].
/// * **Snapshot**: calls [`ActorState::snapshot`].
/// * **Timer tick**: calls [`ActorState::on_timer`] with `now` captured once for the tick.
pub struct StateActor<S: ActorState> {
    receiver: mpsc::Receiver<StateRequest<S>>,
    state: S,
    timers: Timers<S::Timer>,
}

impl<S: ActorState> StateActor<S> {
    /// Creates a new `StateActor` and its associated `StateClient`.
    ///
    /// # Arguments
    ///
    /// * `state` - The initial state value.
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(state: S, buffer_size: usize) -> (Self, StateClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state,
            timers: Timers::new(),
        };
        let client = StateClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every state hook. This allows the state to reach
    /// external dependencies (like an event publisher) that were created *after* the actor was
    /// instantiated but *before* the loop started.
    pub async fn run(mut self, context: S::Context) {
        // Extract just the type name (e.g., "SimEngine" instead of "fulfillment_sim::engine::SimEngine")
        let state_type = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(state_type, "Actor started");

        self.state.on_start(&mut self.timers, &context);

        loop {
            // Ticks due at this instant are applied before any request that arrived alongside.
            tokio::select! {
                biased;

                timer = self.timers.next_tick() => {
                    let now = Instant::now();
                    debug!(state_type, ?timer, "Tick");
                    self.state.on_timer(timer, now, &mut self.timers, &context);
                }
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        StateRequest::Command { command, respond_to } => {
                            debug!(state_type, ?command, "Command");
                            let result = self
                                .state
                                .handle(command, &mut self.timers, &context)
                                .map_err(|e| FrameworkError::Rejected(Box::new(e)));
                            if let Err(e) = &result {
                                warn!(state_type, error = %e, "Command rejected");
                            }
                            let _ = respond_to.send(result);
                        }
                        StateRequest::Snapshot { respond_to } => {
                            let _ = respond_to.send(Ok(self.state.snapshot()));
                        }
                    }
                }
            }
        }

        self.timers.cancel_all();
        self.state.on_stop(&context);
        info!(state_type, "Shutdown");
    }
}
