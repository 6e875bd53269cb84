use crate::clients::SimClient;
use crate::engine::{RandomSource, SimEngine, SimEvent};
use crate::providers::{CatalogProvider, SettingsProvider};
use crate::sim_actor;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

const EVENT_CAPACITY: usize = 256;

/// Runtime orchestrator for the simulator.
///
/// `SimSystem` is responsible for:
/// - **Wiring**: building the [`SimEngine`] from its catalog and settings providers
/// - **Lifecycle**: spawning the simulator actor with the event publisher injected as context
/// - **Shutdown**: closing the command channel and awaiting the actor task
///
/// # Example
///
/// ```rust
/// use fulfillment_sim::lifecycle::SimSystem;
/// use fulfillment_sim::providers::{SimSettings, StaticCatalog};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let system = SimSystem::new(
///         Arc::new(StaticCatalog::convenience_store()),
///         Arc::new(SimSettings::default()),
///     );
///     let mut events = system.subscribe();
///
///     system.client.start_match().await.map_err(|e| e.to_string())?;
///     let first = events.recv().await.map_err(|e| e.to_string())?;
///     println!("{first:?}");
///
///     system.shutdown().await
/// }
/// ```
pub struct SimSystem {
    /// Client for the simulator actor
    pub client: SimClient,

    events: broadcast::Sender<SimEvent>,

    handle: tokio::task::JoinHandle<()>,
}

impl SimSystem {
    /// Starts a simulator with the production random source.
    pub fn new(catalog: Arc<dyn CatalogProvider>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self::from_engine(SimEngine::new(catalog, settings))
    }

    /// Starts a simulator whose order generation follows `rng`.
    pub fn with_random(
        catalog: Arc<dyn CatalogProvider>,
        settings: Arc<dyn SettingsProvider>,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self::from_engine(SimEngine::with_random(catalog, settings, rng))
    }

    pub fn from_engine(engine: SimEngine) -> Self {
        let (actor, client) = sim_actor::new(engine);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let handle = tokio::spawn(actor.run(events.clone()));

        Self {
            client: SimClient::new(client),
            events,
            handle,
        }
    }

    /// A receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SimEvent> {
        self.events.subscribe()
    }

    /// Drops the client and waits for the actor to finish.
    ///
    /// Clones of [`SimSystem::client`] handed out earlier keep the actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down simulator...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Simulator task failed: {:?}", e);
            return Err(format!("Simulator task failed: {:?}", e));
        }

        info!("Simulator shutdown complete.");
        Ok(())
    }
}
