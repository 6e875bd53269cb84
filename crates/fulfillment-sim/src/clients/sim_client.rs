//! # Sim Client
//!
//! Provides a high‑level API for interacting with the simulator actor.
//! It wraps a `StateClient<SimEngine>` and exposes one method per trainee operation.
use crate::engine::{EngineError, PickOutcome, SimEngine};
use crate::model::{ItemId, OrderId};
use crate::sim_actor::{SimCommand, SimReply};
use actor_framework::{ActorClient, FrameworkError, StateClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the simulator actor.
#[derive(Clone)]
pub struct SimClient {
    inner: StateClient<SimEngine>,
}

impl SimClient {
    pub fn new(inner: StateClient<SimEngine>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<SimEngine> for SimClient {
    type Error = EngineError;

    fn inner(&self) -> &StateClient<SimEngine> {
        &self.inner
    }

    /// Recovers the engine's own error from a rejection; anything else is a channel failure.
    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::Rejected(inner) => match inner.downcast::<EngineError>() {
                Ok(engine_error) => *engine_error,
                Err(other) => EngineError::ActorCommunication(other.to_string()),
            },
            other => EngineError::ActorCommunication(other.to_string()),
        }
    }
}

fn unexpected(reply: SimReply) -> EngineError {
    EngineError::ActorCommunication(format!("Unexpected reply: {reply:?}"))
}

impl SimClient {
    /// Starts a new match and returns the id of the order spawned with it.
    ///
    /// Fails with [`EngineError::EmptyCatalog`] when there is nothing to pick and with
    /// [`EngineError::InvalidSettings`] when the current settings do not validate.
    #[instrument(skip(self))]
    pub async fn start_match(&self) -> Result<Option<OrderId>, EngineError> {
        debug!("Starting match");
        match self.dispatch(SimCommand::StartMatch).await? {
            SimReply::MatchStarted { first_order } => Ok(first_order),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn exit_match(&self) -> Result<(), EngineError> {
        match self.dispatch(SimCommand::ExitMatch).await? {
            SimReply::MatchExited => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn start_picking(&self, id: OrderId) -> Result<(), EngineError> {
        match self.dispatch(SimCommand::StartPicking(id)).await? {
            SimReply::PickingStarted(_) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Picks one unit of an item for the active order.
    ///
    /// A wrong or surplus item is not an error: it comes back as [`PickOutcome::Mismatched`] and
    /// has already been counted as a mistake.
    #[instrument(skip(self))]
    pub async fn pick_item(&self, item: ItemId) -> Result<PickOutcome, EngineError> {
        match self.dispatch(SimCommand::PickItem(item)).await? {
            SimReply::Picked(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn request_pack(&self) -> Result<OrderId, EngineError> {
        match self.dispatch(SimCommand::RequestPack).await? {
            SimReply::PackRequested(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_pack(&self) -> Result<OrderId, EngineError> {
        match self.dispatch(SimCommand::CancelPack).await? {
            SimReply::PackCancelled(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_pack(&self) -> Result<OrderId, EngineError> {
        match self.dispatch(SimCommand::ConfirmPack).await? {
            SimReply::Packed(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Shorthand for the request/confirm pair.
    pub async fn pack(&self) -> Result<OrderId, EngineError> {
        self.request_pack().await?;
        self.confirm_pack().await
    }

    #[instrument(skip(self))]
    pub async fn driver_pickup(&self, id: OrderId) -> Result<(), EngineError> {
        match self.dispatch(SimCommand::DriverPickup(id)).await? {
            SimReply::PickedUp(_) => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimSnapshot;
    use crate::model::MatchSession;
    use actor_framework::mock::{create_mock_client, expect_command, MockClient};

    #[tokio::test]
    async fn test_pick_item_sends_command_and_returns_outcome() {
        let (client, mut receiver) = create_mock_client::<SimEngine>(10);
        let sim_client = SimClient::new(client);

        let pick_task =
            tokio::spawn(async move { sim_client.pick_item(ItemId::from("p1")).await });

        let (command, responder) = expect_command(&mut receiver)
            .await
            .expect("Expected Command request");
        assert_eq!(command, SimCommand::PickItem(ItemId::from("p1")));

        responder
            .send(Ok(SimReply::Picked(PickOutcome::Mismatched)))
            .unwrap();

        let result = pick_task.await.unwrap();
        assert_eq!(result.unwrap(), PickOutcome::Mismatched);
    }

    #[tokio::test]
    async fn test_rejection_keeps_engine_error() {
        let mut mock = MockClient::<SimEngine>::new();
        mock.expect_command()
            .return_err(FrameworkError::Rejected(Box::new(EngineError::EmptyCatalog)));
        mock.expect_command()
            .return_err(FrameworkError::Rejected(Box::new(EngineError::invalid(
                "driver_pickup",
                "order 1234 does not exist",
            ))));

        let client = SimClient::new(mock.client());

        assert_eq!(client.start_match().await, Err(EngineError::EmptyCatalog));
        let err = client.driver_pickup(OrderId(1234)).await.unwrap_err();
        assert!(err.is_invalid_transition());

        mock.verify();
    }

    #[tokio::test]
    async fn test_channel_failure_maps_to_communication_error() {
        let mut mock = MockClient::<SimEngine>::new();
        mock.expect_command().return_err(FrameworkError::ActorDropped);
        mock.expect_command()
            .return_err(FrameworkError::Rejected(Box::new(std::io::Error::other(
                "not an engine error",
            ))));

        let client = SimClient::new(mock.client());

        assert!(matches!(
            client.exit_match().await,
            Err(EngineError::ActorCommunication(_))
        ));
        match client.request_pack().await {
            Err(EngineError::ActorCommunication(msg)) => assert!(msg.contains("not an engine error")),
            other => panic!("Expected ActorCommunication, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_reply_is_an_error() {
        let mut mock = MockClient::<SimEngine>::new();
        mock.expect_command().return_ok(SimReply::MatchExited);

        let client = SimClient::new(mock.client());
        let result = client.confirm_pack().await;
        assert!(matches!(result, Err(EngineError::ActorCommunication(_))));
    }

    #[tokio::test]
    async fn test_pack_is_request_then_confirm() {
        let mut mock = MockClient::<SimEngine>::new();
        mock.expect_command().return_ok(SimReply::PackRequested(OrderId(4821)));
        mock.expect_command().return_ok(SimReply::Packed(OrderId(4821)));

        let client = SimClient::new(mock.client());
        assert_eq!(client.pack().await.unwrap(), OrderId(4821));
        mock.verify();
    }

    #[tokio::test]
    async fn test_snapshot_through_trait() {
        let mut mock = MockClient::<SimEngine>::new();
        mock.expect_snapshot().return_ok(SimSnapshot {
            match_session: MatchSession::playing(42),
            orders: Vec::new(),
            picking: None,
            feedback: None,
        });

        let client = SimClient::new(mock.client());
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.match_session.time_remaining, 42);
        mock.verify();
    }
}
