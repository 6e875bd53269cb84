//! # ActorClient Trait
//!
//! Provides a common interface for domain-specific clients, adding default `snapshot` and
//! `dispatch` methods built on top of a generic `StateClient`.
use crate::{ActorState, FrameworkError, StateClient};
use async_trait::async_trait;

/// Trait for domain-specific clients to inherit the standard request plumbing.
///
/// This trait reduces boilerplate by providing default implementations for sending commands and
/// reading snapshots, with every framework error mapped into the client's own error type.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorState, FrameworkError, StateClient, Timers};
/// use tokio::time::Instant;
///
/// // 1. Define State
/// #[derive(Debug, Default)]
/// struct Counter { value: u32 }
/// #[derive(Debug)] enum CounterCommand { Add(u32) }
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] enum NoTimer {}
/// #[derive(Debug)] struct CounterError(String);
///
/// // Error must implement Display + Error + From<String> + Send + Sync
/// impl std::fmt::Display for CounterError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
/// impl std::error::Error for CounterError {}
///
/// impl From<String> for CounterError {
///     fn from(s: String) -> Self { CounterError(s) }
/// }
///
/// impl ActorState for Counter {
///     type Command = CounterCommand;
///     type Reply = u32;
///     type Snapshot = u32;
///     type Timer = NoTimer;
///     type Context = ();
///     type Error = CounterError;
///
///     fn handle(&mut self, cmd: CounterCommand, _: &mut Timers<NoTimer>, _: &()) -> Result<u32, CounterError> {
///         let CounterCommand::Add(n) = cmd;
///         self.value += n;
///         Ok(self.value)
///     }
///     fn on_timer(&mut self, _: NoTimer, _: Instant, _: &mut Timers<NoTimer>, _: &()) {}
///     fn snapshot(&self) -> u32 { self.value }
/// }
///
/// // 2. Define Client Wrapper
/// struct CounterClient {
///     inner: StateClient<Counter>,
/// }
///
/// // 3. Implement ActorClient
/// impl ActorClient<Counter> for CounterClient {
///     type Error = CounterError;
///
///     fn inner(&self) -> &StateClient<Counter> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         CounterError(e.to_string())
///     }
/// }
///
/// // 4. Usage
/// async fn usage(client: CounterClient) {
///     // dispatch() and snapshot() are provided automatically!
///     let _ = client.dispatch(CounterCommand::Add(1)).await;
///     let _ = client.snapshot().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<S: ActorState>: Send + Sync {
    /// The domain-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic StateClient.
    fn inner(&self) -> &StateClient<S>;

    /// Map framework errors to the specific domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Send a command and wait for the reply.
    #[tracing::instrument(skip(self))]
    async fn dispatch(&self, command: S::Command) -> Result<S::Reply, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().send(command).await.map_err(Self::map_error)
    }

    /// Fetch a read-only snapshot of the state.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<S::Snapshot, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }
}
