//! Materializes new orders from the catalog.
use crate::engine::random::RandomSource;
use crate::model::{Item, Order, OrderId, Platform};
use crate::providers::SimSettings;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Live orders beyond this are not spawned; the tick is simply dropped.
pub const MAX_LIVE_ORDERS: usize = 5;

const ID_ATTEMPTS: usize = 32;

#[derive(Debug)]
pub enum SpawnOutcome {
    Spawned(Order),
    CapReached,
    EmptyCatalog,
    /// Every drawn id collided with a live order.
    IdsExhausted,
}

#[derive(Debug, Clone)]
pub struct OrderSpawner {
    cap: usize,
}

impl Default for OrderSpawner {
    fn default() -> Self {
        Self {
            cap: MAX_LIVE_ORDERS,
        }
    }
}

impl OrderSpawner {
    /// Draws one order. The draw order is fixed: item count, each item, platform (mixed mode
    /// only), then the id.
    pub fn spawn(
        &self,
        catalog: &[Item],
        settings: &SimSettings,
        live: &[Order],
        rng: &mut dyn RandomSource,
        now: Instant,
    ) -> SpawnOutcome {
        if live.len() >= self.cap {
            debug!(live = live.len(), "Spawn skipped, cap reached");
            return SpawnOutcome::CapReached;
        }
        if catalog.is_empty() {
            debug!("Spawn skipped, catalog empty");
            return SpawnOutcome::EmptyCatalog;
        }

        let (min, max) = settings.item_range();
        let count = rng.between(min, max) as usize;
        let items: Vec<Item> = (0..count)
            .map(|_| catalog[rng.index(catalog.len())].clone())
            .collect();

        let platform = match settings.platform_mode.fixed() {
            Some(platform) => platform,
            None if rng.coin() => Platform::UberEats,
            None => Platform::FoodPanda,
        };

        let Some(id) = Self::draw_id(live, rng) else {
            warn!(live = live.len(), "Could not draw a free order id");
            return SpawnOutcome::IdsExhausted;
        };

        SpawnOutcome::Spawned(Order::new(id, platform, items, now))
    }

    fn draw_id(live: &[Order], rng: &mut dyn RandomSource) -> Option<OrderId> {
        (0..ID_ATTEMPTS)
            .map(|_| OrderId(rng.between(u32::from(OrderId::MIN), u32::from(OrderId::MAX)) as u16))
            .find(|candidate| live.iter().all(|order| order.id != *candidate))
    }
}
