//! # Mock Framework & Testing Guide
//!
//! The `MockClient<S>` type hands out the same `StateClient<S>` as production code, but answers
//! requests from a queue of scripted responses instead of a running actor. It lets you unit-test
//! client wrappers deterministically without spawning a `StateActor`.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler and timers |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Unit testing logic *around* the client | Testing the state itself or full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Client Logic Test (Pure Mock)</b></summary>
//!
//! **When to use**: Testing how a client wrapper translates replies and errors.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorState, FrameworkError, Timers};
//! use tokio::time::Instant;
//!
//! #[derive(Debug, Default)] struct Lamp { on: bool }
//! #[derive(Debug)] enum LampCommand { Toggle }
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] enum NoTimer {}
//! #[derive(Debug, thiserror::Error)] #[error("lamp error")] struct LampError;
//!
//! impl ActorState for Lamp {
//!     type Command = LampCommand; type Reply = bool; type Snapshot = bool;
//!     type Timer = NoTimer; type Context = (); type Error = LampError;
//!     fn handle(&mut self, _: LampCommand, _: &mut Timers<NoTimer>, _: &()) -> Result<bool, LampError> {
//!         self.on = !self.on;
//!         Ok(self.on)
//!     }
//!     fn on_timer(&mut self, _: NoTimer, _: Instant, _: &mut Timers<NoTimer>, _: &()) {}
//!     fn snapshot(&self) -> bool { self.on }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Lamp>::new();
//!     mock.expect_command().return_ok(true);
//!     mock.expect_snapshot().return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert!(client.send(LampCommand::Toggle).await.unwrap());
//!     assert!(matches!(client.snapshot().await, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Single Actor Test (Fast, Isolated)</b></summary>
//!
//! Spawn a real `StateActor` with a hand-built initial state. Pair it with
//! `#[tokio::test(start_paused = true)]` so registered timers fire as soon as the test awaits a
//! `sleep`, without waiting on the wall clock.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System Integration Test (Comprehensive)</b></summary>
//!
//! Build the whole system through its orchestrator and drive it only through the public client.
//! See `tests/integration_test.rs` in the `fulfillment-sim` crate.
//! </details>
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent [`MockClient`] API.

use crate::client::StateClient;
use crate::error::FrameworkError;
use crate::message::StateRequest;
use crate::state::ActorState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
enum Expectation<S: ActorState> {
    Command {
        response: Result<S::Reply, FrameworkError>,
    },
    Snapshot {
        response: Result<S::Snapshot, FrameworkError>,
    },
}

type Expectations<S> = Arc<Mutex<VecDeque<Expectation<S>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in the order they were registered. A request that does not match the
/// next expectation makes the background task panic, which surfaces in the test as
/// `FrameworkError::ActorDropped`.
pub struct MockClient<S: ActorState> {
    client: StateClient<S>,
    expectations: Expectations<S>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<S: ActorState> Default for MockClient<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ActorState> MockClient<S> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StateRequest<S>>(100);
        let expectations: Expectations<S> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone
                    .lock()
                    .expect("expectation lock poisoned")
                    .pop_front();

                match (request, expectation) {
                    (
                        StateRequest::Command { respond_to, .. },
                        Some(Expectation::Command { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (StateRequest::Snapshot { respond_to }, Some(Expectation::Snapshot { response })) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: StateClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StateClient<S> {
        self.client.clone()
    }

    /// Expects a command.
    pub fn expect_command(&mut self) -> CommandExpectationBuilder<S> {
        CommandExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a snapshot request.
    pub fn expect_snapshot(&mut self) -> SnapshotExpectationBuilder<S> {
        SnapshotExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().expect("expectation lock poisoned");
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for command expectations.
pub struct CommandExpectationBuilder<S: ActorState> {
    expectations: Expectations<S>,
}

impl<S: ActorState> CommandExpectationBuilder<S> {
    /// Sets the expectation to return a successful reply.
    pub fn return_ok(self, reply: S::Reply) {
        self.push(Ok(reply));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<S::Reply, FrameworkError>) {
        self.expectations
            .lock()
            .expect("expectation lock poisoned")
            .push_back(Expectation::Command { response });
    }
}

/// Builder for snapshot expectations.
pub struct SnapshotExpectationBuilder<S: ActorState> {
    expectations: Expectations<S>,
}

impl<S: ActorState> SnapshotExpectationBuilder<S> {
    /// Sets the expectation to return a snapshot.
    pub fn return_ok(self, snapshot: S::Snapshot) {
        self.push(Ok(snapshot));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<S::Snapshot, FrameworkError>) {
        self.expectations
            .lock()
            .expect("expectation lock poisoned")
            .push_back(Expectation::Snapshot { response });
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// The client sends messages to a channel we control (`receiver`). We can then inspect the
/// messages arriving on that channel and assert they are correct, answering each one by hand.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<S: ActorState>(
    buffer_size: usize,
) -> (StateClient<S>, mpsc::Receiver<StateRequest<S>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StateClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Command request
pub async fn expect_command<S: ActorState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<(
    S::Command,
    oneshot::Sender<Result<S::Reply, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(StateRequest::Command {
            command,
            respond_to,
        }) => Some((command, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot<S: ActorState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<oneshot::Sender<Result<S::Snapshot, FrameworkError>>> {
    match receiver.recv().await {
        Some(StateRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::Timers;
    use tokio::time::Instant;

    #[derive(Debug, Default)]
    struct Gauge {
        level: i32,
    }

    #[derive(Debug)]
    enum GaugeCommand {
        Raise(i32),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum NoTimer {}

    #[derive(Debug, thiserror::Error)]
    #[error("Gauge error")]
    struct GaugeError;

    impl ActorState for Gauge {
        type Command = GaugeCommand;
        type Reply = i32;
        type Snapshot = i32;
        type Timer = NoTimer;
        type Context = ();
        type Error = GaugeError;

        fn handle(
            &mut self,
            command: GaugeCommand,
            _timers: &mut Timers<NoTimer>,
            _ctx: &(),
        ) -> Result<i32, GaugeError> {
            let GaugeCommand::Raise(by) = command;
            self.level += by;
            Ok(self.level)
        }

        fn on_timer(&mut self, _: NoTimer, _: Instant, _: &mut Timers<NoTimer>, _: &()) {}

        fn snapshot(&self) -> i32 {
            self.level
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Gauge>(10);

        let send_task = tokio::spawn(async move { client.send(GaugeCommand::Raise(4)).await });

        let (command, responder) = expect_command(&mut receiver)
            .await
            .expect("Expected Command request");
        assert!(matches!(command, GaugeCommand::Raise(4)));
        responder.send(Ok(4)).unwrap();

        let result = send_task.await.unwrap();
        assert!(matches!(result, Ok(4)));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Gauge>::new();

        mock.expect_command().return_ok(7);
        mock.expect_snapshot().return_ok(7);
        mock.expect_command()
            .return_err(FrameworkError::Rejected(Box::new(GaugeError)));

        let client = mock.client();

        assert_eq!(client.send(GaugeCommand::Raise(7)).await.unwrap(), 7);
        assert_eq!(client.snapshot().await.unwrap(), 7);

        let rejected = client.send(GaugeCommand::Raise(1)).await;
        match rejected {
            Err(FrameworkError::Rejected(inner)) => assert!(inner.downcast::<GaugeError>().is_ok()),
            other => panic!("Expected Rejected, got {:?}", other),
        }

        mock.verify();
    }
}
