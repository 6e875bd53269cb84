//! # Order Lifecycle Engine
//!
//! [`SimEngine`] is the match controller. It owns the live order set (through [`OrderBook`]), the
//! [`MatchSession`] score sheet and the outbound [`FeedbackSink`], and exposes two kinds of entry
//! points:
//!
//! - **Trainee operations** (`start_picking`, `pick_item`, `request_pack`, `cancel_pack`,
//!   `confirm_pack`, `driver_pickup`), legal only while the match is playing.
//! - **Ticks** (`on_spawn_tick`, `on_second_tick`, `on_timeout_sweep`), which the host calls on its
//!   own schedule.
//!
//! Every method is synchronous and takes `now` explicitly, so tests drive the engine without any
//! clock at all:
//!
//! ```rust
//! use fulfillment_sim::engine::{SimEngine, ScriptedRandom};
//! use fulfillment_sim::providers::{SimSettings, StaticCatalog};
//! use std::sync::Arc;
//! use tokio::time::Instant;
//!
//! let mut engine = SimEngine::with_random(
//!     Arc::new(StaticCatalog::convenience_store()),
//!     Arc::new(SimSettings::default()),
//!     ScriptedRandom::new([0, 0, 1, 234]),
//! );
//! let first = engine.start(Instant::now()).unwrap();
//! assert_eq!(first.map(|id| id.0), Some(1234));
//! ```
//!
//! In the running simulator the engine is the state of a
//! [`StateActor`](actor_framework::StateActor); see [`crate::sim_actor`].

pub mod clock;
pub mod error;
pub mod feedback;
pub mod orders;
pub mod random;
pub mod scoring;
pub mod spawner;

pub use clock::*;
pub use error::*;
pub use feedback::*;
pub use orders::*;
pub use random::*;
pub use scoring::{ScoreEvent, PACK_POINTS, PICKUP_POINTS};
pub use spawner::*;

use crate::model::{Item, ItemId, MatchSession, Order, OrderId, PickingSession};
use crate::providers::{CatalogProvider, SettingsProvider, SimSettings};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Read-only view of the engine handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct SimSnapshot {
    pub match_session: MatchSession,
    pub orders: Vec<Order>,
    pub picking: Option<PickingSession>,
    pub feedback: Option<FeedbackEvent>,
}

impl SimSnapshot {
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }
}

pub struct SimEngine {
    catalog: Arc<dyn CatalogProvider>,
    settings: Arc<dyn SettingsProvider>,
    rng: Box<dyn RandomSource>,
    spawner: OrderSpawner,
    book: OrderBook,
    session: MatchSession,
    /// Copy taken at match start; later changes apply to the next match.
    active_settings: SimSettings,
    feedback: FeedbackSink,
}

impl std::fmt::Debug for SimEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEngine")
            .field("session", &self.session)
            .field("live_orders", &self.book.len())
            .field("active_settings", &self.active_settings)
            .finish_non_exhaustive()
    }
}

impl SimEngine {
    pub fn new(catalog: Arc<dyn CatalogProvider>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self::with_random(catalog, settings, FastRandom::new())
    }

    pub fn with_random(
        catalog: Arc<dyn CatalogProvider>,
        settings: Arc<dyn SettingsProvider>,
        rng: impl RandomSource + 'static,
    ) -> Self {
        let active_settings = settings.current();
        Self {
            catalog,
            settings,
            rng: Box::new(rng),
            spawner: OrderSpawner::default(),
            book: OrderBook::new(),
            session: MatchSession::default(),
            active_settings,
            feedback: FeedbackSink::new(),
        }
    }

    pub fn match_session(&self) -> &MatchSession {
        &self.session
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn active_settings(&self) -> &SimSettings {
        &self.active_settings
    }

    pub fn snapshot_at(&self, now: Instant) -> SimSnapshot {
        SimSnapshot {
            match_session: self.session.clone(),
            orders: self.book.orders().to_vec(),
            picking: self.book.session().cloned(),
            feedback: self.feedback.active(now).cloned(),
        }
    }

    /// Events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.feedback.drain()
    }

    // --- Match control ---

    /// Starts (or restarts) a match: resets everything, snapshots the settings and spawns the
    /// first order right away. Returns its id.
    ///
    /// Settings that fail validation leave the current match untouched.
    pub fn start(&mut self, now: Instant) -> Result<Option<OrderId>, EngineError> {
        if self.catalog.is_empty() {
            warn!("Cannot start match, catalog is empty");
            return Err(EngineError::EmptyCatalog);
        }
        let settings = self.settings.current();
        if let Err(e) = settings.validate() {
            warn!(error = %e, "Cannot start match, settings rejected");
            return Err(EngineError::InvalidSettings(e.to_string()));
        }
        self.active_settings = settings;
        self.book.clear();
        self.feedback.clear();
        self.session = MatchSession::playing(self.active_settings.match_duration_seconds);
        info!(settings = ?self.active_settings, "Match started");
        Ok(self.spawn_order(now))
    }

    /// Abandons the match and returns to `Idle`. Legal in every state.
    pub fn exit(&mut self) {
        self.book.clear();
        self.feedback.clear();
        self.session = MatchSession::default();
        info!("Match exited");
    }

    fn ensure_playing(&self, operation: &'static str) -> Result<(), EngineError> {
        if self.session.is_playing() {
            Ok(())
        } else {
            Err(EngineError::invalid(
                operation,
                format!("match is {:?}", self.session.state),
            ))
        }
    }

    // --- Trainee operations ---

    pub fn start_picking(&mut self, id: OrderId) -> Result<(), EngineError> {
        self.ensure_playing("start_picking")?;
        self.book.start_picking(id)
    }

    pub fn pick_item(&mut self, item_id: &ItemId, now: Instant) -> Result<PickOutcome, EngineError> {
        self.ensure_playing("pick_item")?;
        let item = self.resolve_item(item_id)?;
        let outcome = self.book.pick_item(&item)?;
        match &outcome {
            PickOutcome::Mismatched => {
                scoring::apply(&mut self.session, ScoreEvent::Mistakes(1));
                self.feedback
                    .emit(LifecycleSignal::MismatchedPick { item: item.name }, now);
            }
            PickOutcome::Picked {
                ready_to_pack: true,
                ..
            } => {
                if let Some(order) = self.book.active_order() {
                    let order_id = order.id;
                    self.feedback
                        .emit(LifecycleSignal::ReadyToPack { order_id }, now);
                }
            }
            PickOutcome::Picked { .. } => {}
        }
        Ok(outcome)
    }

    pub fn request_pack(&mut self) -> Result<OrderId, EngineError> {
        self.ensure_playing("request_pack")?;
        self.book.request_pack()
    }

    pub fn cancel_pack(&mut self) -> Result<OrderId, EngineError> {
        self.ensure_playing("cancel_pack")?;
        self.book.cancel_pack()
    }

    pub fn confirm_pack(&mut self, now: Instant) -> Result<OrderId, EngineError> {
        self.ensure_playing("confirm_pack")?;
        let order_id = self.book.confirm_pack()?;
        scoring::apply(&mut self.session, ScoreEvent::Packed);
        self.feedback.emit(LifecycleSignal::Packed { order_id }, now);
        info!(%order_id, score = self.session.score, "Order packed");
        Ok(order_id)
    }

    pub fn driver_pickup(&mut self, id: OrderId, now: Instant) -> Result<OrderId, EngineError> {
        self.ensure_playing("driver_pickup")?;
        let order = self.book.driver_pickup(id)?;
        scoring::apply(&mut self.session, ScoreEvent::PickedUp);
        self.feedback
            .emit(LifecycleSignal::PickedUp { order_id: order.id }, now);
        info!(order_id = %order.id, score = self.session.score, "Order picked up");
        Ok(order.id)
    }

    /// Items are matched by id; the active order's own copy wins over the catalog's so a catalog
    /// edit mid-match cannot break an order in progress.
    fn resolve_item(&self, item_id: &ItemId) -> Result<Item, EngineError> {
        let from_order = self
            .book
            .active_order()
            .and_then(|order| order.items.iter().find(|i| &i.id == item_id).cloned());
        if let Some(item) = from_order {
            return Ok(item);
        }
        self.catalog
            .list_items()
            .into_iter()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| EngineError::invalid("pick_item", format!("unknown item {item_id}")))
    }

    // --- Ticks ---

    /// Spawns an order if the match is playing and the cap allows it.
    pub fn on_spawn_tick(&mut self, now: Instant) -> Option<OrderId> {
        if !self.session.is_playing() {
            return None;
        }
        self.spawn_order(now)
    }

    /// Advances the countdown by one second.
    pub fn on_second_tick(&mut self, now: Instant) -> ClockTick {
        let tick = SessionClock::tick(&mut self.session);
        if tick == ClockTick::Expired {
            info!(
                score = self.session.score,
                mistakes = self.session.mistakes,
                "Match ended"
            );
            self.feedback.emit(
                LifecycleSignal::MatchEnded {
                    score: self.session.score,
                    mistakes: self.session.mistakes,
                },
                now,
            );
        }
        tick
    }

    /// Evicts timed-out orders, one mistake each.
    pub fn on_timeout_sweep(&mut self, now: Instant) -> Vec<OrderId> {
        if !self.session.is_playing() {
            return Vec::new();
        }
        let evicted = self
            .book
            .evict_expired(now, self.active_settings.order_timeout());
        if !evicted.is_empty() {
            let count = evicted.len();
            scoring::apply(&mut self.session, ScoreEvent::Mistakes(count as u32));
            self.feedback.emit(LifecycleSignal::TimedOut { count }, now);
            warn!(?evicted, mistakes = self.session.mistakes, "Orders timed out");
        }
        evicted
    }

    fn spawn_order(&mut self, now: Instant) -> Option<OrderId> {
        let items = self.catalog.list_items();
        let outcome = self.spawner.spawn(
            &items,
            &self.active_settings,
            self.book.orders(),
            self.rng.as_mut(),
            now,
        );
        match outcome {
            SpawnOutcome::Spawned(order) => {
                let (order_id, platform) = (order.id, order.platform);
                self.book.insert(order);
                self.feedback
                    .emit(LifecycleSignal::OrderArrived { order_id, platform }, now);
                info!(%order_id, %platform, live = self.book.len(), "Order spawned");
                Some(order_id)
            }
            other => {
                debug!(?other, "No order spawned");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchState, OrderStatus};
    use crate::providers::{PlatformMode, SharedSettings, StaticCatalog};
    use std::time::Duration;

    fn item(id: &str) -> Item {
        Item::new(id, id.to_uppercase(), "Other", "📦")
    }

    fn settings() -> SimSettings {
        SimSettings {
            order_timeout_seconds: 60,
            match_duration_seconds: 5,
            min_items_per_order: 3,
            max_items_per_order: 3,
            platform_mode: PlatformMode::UberEats,
            ..SimSettings::default()
        }
    }

    /// Catalog {a, b}; the first order is [a, a, b] with id 1234.
    fn engine() -> SimEngine {
        let catalog = StaticCatalog::new(vec![item("a"), item("b")], vec!["Other".into()]);
        SimEngine::with_random(
            Arc::new(catalog),
            Arc::new(settings()),
            ScriptedRandom::new([0, 0, 1, 234]),
        )
    }

    fn started(now: Instant) -> SimEngine {
        let mut engine = engine();
        assert_eq!(engine.start(now).unwrap(), Some(OrderId(1234)));
        engine.drain_events();
        engine
    }

    #[test]
    fn test_start_spawns_first_order() {
        let now = Instant::now();
        let mut engine = engine();
        engine.start(now).unwrap();

        assert_eq!(engine.match_session().state, MatchState::Playing);
        assert_eq!(engine.match_session().time_remaining, 5);
        let order = engine.book().get(OrderId(1234)).unwrap();
        let ids: Vec<_> = order.items.iter().map(|i| i.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b"]);

        let events = engine.drain_events();
        assert!(matches!(
            events.as_slice(),
            [SimEvent::OrderArrived { order_id: OrderId(1234), .. }]
        ));
    }

    #[test]
    fn test_start_with_empty_catalog() {
        let mut engine = SimEngine::new(
            Arc::new(StaticCatalog::empty()),
            Arc::new(SimSettings::default()),
        );
        assert_eq!(engine.start(Instant::now()), Err(EngineError::EmptyCatalog));
        assert_eq!(engine.match_session().state, MatchState::Idle);
    }

    fn engine_with(settings: impl SettingsProvider + 'static) -> SimEngine {
        SimEngine::with_random(
            Arc::new(StaticCatalog::convenience_store()),
            Arc::new(settings),
            ScriptedRandom::new([]),
        )
    }

    #[test]
    fn test_start_rejects_zero_duration() {
        let mut engine = engine_with(SharedSettings::new(SimSettings {
            match_duration_seconds: 0,
            ..SimSettings::default()
        }));

        match engine.start(Instant::now()) {
            Err(EngineError::InvalidSettings(reason)) => {
                assert!(reason.contains("match_duration_seconds"))
            }
            other => panic!("Expected InvalidSettings, got {:?}", other),
        }
        assert_eq!(engine.match_session().state, MatchState::Idle);
        assert!(engine.book().is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_start_rejects_zero_timeout() {
        let t0 = Instant::now();
        let mut engine = engine_with(SimSettings {
            order_timeout_seconds: 0,
            ..SimSettings::default()
        });

        assert!(matches!(
            engine.start(t0),
            Err(EngineError::InvalidSettings(_))
        ));
        assert!(engine.on_timeout_sweep(t0).is_empty());
        assert_eq!(engine.match_session().mistakes, 0);
    }

    /// Valid until `break_it` flips the match duration to zero.
    struct Breakable(std::sync::atomic::AtomicBool);

    impl SettingsProvider for Breakable {
        fn current(&self) -> SimSettings {
            let broken = self.0.load(std::sync::atomic::Ordering::SeqCst);
            SimSettings {
                match_duration_seconds: if broken { 0 } else { 30 },
                ..SimSettings::default()
            }
        }
    }

    #[test]
    fn test_rejected_restart_keeps_running_match() {
        let now = Instant::now();
        let provider = Arc::new(Breakable(std::sync::atomic::AtomicBool::new(false)));
        let mut engine = SimEngine::with_random(
            Arc::new(StaticCatalog::convenience_store()),
            provider.clone(),
            ScriptedRandom::new([]),
        );
        let first = engine.start(now).unwrap().unwrap();

        provider.0.store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(matches!(
            engine.start(now),
            Err(EngineError::InvalidSettings(_))
        ));
        assert!(engine.match_session().is_playing());
        assert_eq!(engine.match_session().time_remaining, 30);
        assert!(engine.book().get(first).is_some());
        assert_eq!(engine.active_settings().match_duration_seconds, 30);
    }

    #[test]
    fn test_operations_require_playing() {
        let mut engine = engine();
        let err = engine.start_picking(OrderId(1234)).unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(engine.on_spawn_tick(Instant::now()).is_none());
        assert!(engine.book().is_empty());
    }

    #[test]
    fn test_full_order_flow_scores() {
        let now = Instant::now();
        let mut engine = started(now);
        let (a, b) = (ItemId::from("a"), ItemId::from("b"));

        engine.start_picking(OrderId(1234)).unwrap();
        engine.pick_item(&a, now).unwrap();
        engine.pick_item(&b, now).unwrap();
        assert!(engine.drain_events().is_empty());

        let last = engine.pick_item(&a, now).unwrap();
        assert_eq!(
            last,
            PickOutcome::Picked { picked: 3, required: 3, ready_to_pack: true }
        );
        assert_eq!(engine.drain_events().len(), 1);

        engine.request_pack().unwrap();
        assert_eq!(engine.confirm_pack(now).unwrap(), OrderId(1234));
        assert_eq!(engine.match_session().score, PACK_POINTS);
        assert_eq!(
            engine.book().get(OrderId(1234)).unwrap().status,
            OrderStatus::Ready
        );

        engine.driver_pickup(OrderId(1234), now).unwrap();
        assert_eq!(engine.match_session().score, PACK_POINTS + PICKUP_POINTS);

        let err = engine.driver_pickup(OrderId(1234), now).unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(engine.match_session().score, 30);
        assert_eq!(engine.match_session().mistakes, 0);
    }

    #[test]
    fn test_over_pick_costs_exactly_one_mistake() {
        let now = Instant::now();
        let mut engine = started(now);
        let a = ItemId::from("a");
        engine.start_picking(OrderId(1234)).unwrap();

        engine.pick_item(&a, now).unwrap();
        engine.pick_item(&a, now).unwrap();
        assert_eq!(engine.match_session().mistakes, 0);

        assert_eq!(engine.pick_item(&a, now).unwrap(), PickOutcome::Mismatched);
        assert_eq!(engine.match_session().mistakes, 1);

        let feedback = engine.snapshot_at(now).feedback.unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Error);
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let now = Instant::now();
        let mut engine = started(now);
        engine.start_picking(OrderId(1234)).unwrap();
        let err = engine.pick_item(&ItemId::from("zz"), now).unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(engine.match_session().mistakes, 0);
    }

    #[test]
    fn test_timeout_sweep() {
        let t0 = Instant::now();
        let mut engine = started(t0);

        assert!(engine.on_timeout_sweep(t0 + Duration::from_secs(59)).is_empty());
        let evicted = engine.on_timeout_sweep(t0 + Duration::from_secs(61));
        assert_eq!(evicted, vec![OrderId(1234)]);
        assert_eq!(engine.match_session().mistakes, 1);
        assert!(engine.book().is_empty());
    }

    #[test]
    fn test_clock_ends_match_once() {
        let t0 = Instant::now();
        let mut engine = started(t0);

        for _ in 0..4 {
            assert!(matches!(engine.on_second_tick(t0), ClockTick::Running(_)));
        }
        assert_eq!(engine.on_second_tick(t0), ClockTick::Expired);
        assert_eq!(engine.on_second_tick(t0), ClockTick::Idle);
        assert_eq!(engine.match_session().state, MatchState::Ended);

        let ended: Vec<_> = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::MatchEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 1);

        assert!(engine.start_picking(OrderId(1234)).is_err());
    }

    #[test]
    fn test_restart_resets_and_exit_returns_to_idle() {
        let t0 = Instant::now();
        let mut engine = started(t0);
        engine.on_timeout_sweep(t0 + Duration::from_secs(60));
        assert_eq!(engine.match_session().mistakes, 1);

        // Script is exhausted: restart draws item a three times and id 1000.
        assert_eq!(engine.start(t0).unwrap(), Some(OrderId(1000)));
        assert_eq!(engine.match_session().mistakes, 0);
        assert_eq!(engine.book().len(), 1);

        engine.exit();
        assert_eq!(*engine.match_session(), MatchSession::default());
        assert!(engine.book().is_empty());
        assert!(engine.drain_events().is_empty());
        engine.exit();
    }

    #[test]
    fn test_settings_snapshot_at_start() {
        let shared = Arc::new(SharedSettings::new(settings()));
        let catalog = Arc::new(StaticCatalog::convenience_store());
        let mut engine = SimEngine::with_random(catalog, shared.clone(), FastRandom::seeded(9));
        engine.start(Instant::now()).unwrap();

        shared
            .update(SimSettings {
                match_duration_seconds: 999,
                ..settings()
            })
            .unwrap();
        assert_eq!(engine.active_settings().match_duration_seconds, 5);

        engine.start(Instant::now()).unwrap();
        assert_eq!(engine.match_session().time_remaining, 999);
    }
}
