//! # Fulfillment Simulator (headless)
//!
//! Plays one match against the engine with an autopilot trainee and logs what happens.
//!
//! - Settings come from `fulfillment-sim.toml` (or `$SIM_CONFIG`) plus `SIM__*` overrides.
//! - The catalog comes from `$SIM_CATALOG` if set, else the stock convenience-store items.
//!
//! ```bash
//! RUST_LOG=info SIM__MATCH_DURATION_SECONDS=40 cargo run -p fulfillment-sim
//! ```

use actor_framework::ActorClient;
use fulfillment_sim::clients::SimClient;
use fulfillment_sim::engine::{EngineError, FeedbackKind, SimEvent, SimSnapshot};
use fulfillment_sim::lifecycle::{setup_tracing, SimSystem};
use fulfillment_sim::model::{ItemId, MatchState, OrderId, OrderStatus};
use fulfillment_sim::providers::{SimSettings, StaticCatalog};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn, Instrument};

/// Think time between two trainee actions.
const STEP: Duration = Duration::from_millis(700);

#[derive(Debug, PartialEq, Eq)]
enum Move {
    Pickup(OrderId),
    Confirm,
    RequestPack,
    Pick(ItemId),
    StartPicking(OrderId),
    Wait,
}

/// What a diligent trainee does next: finish the active order, hand over packed ones, then take
/// the oldest waiting order.
fn next_move(snapshot: &SimSnapshot) -> Move {
    if let Some(session) = &snapshot.picking {
        if session.awaiting_pack_confirmation {
            return Move::Confirm;
        }
        let Some(order) = snapshot.order(session.order_id) else {
            return Move::Wait;
        };
        let missing = order
            .items
            .iter()
            .find(|item| session.count_of(&item.id) < order.count_of(&item.id));
        return match missing {
            Some(item) => Move::Pick(item.id.clone()),
            None => Move::RequestPack,
        };
    }
    if let Some(ready) = snapshot
        .orders
        .iter()
        .find(|o| o.status == OrderStatus::Ready)
    {
        return Move::Pickup(ready.id);
    }
    snapshot
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .min_by_key(|o| o.created_at)
        .map_or(Move::Wait, |o| Move::StartPicking(o.id))
}

async fn play(client: &SimClient) -> Result<SimSnapshot, EngineError> {
    client.start_match().await?;
    loop {
        tokio::time::sleep(STEP).await;
        let snapshot = client.snapshot().await?;
        if snapshot.match_session.state != MatchState::Playing {
            return Ok(snapshot);
        }
        let result = match next_move(&snapshot) {
            Move::Pickup(id) => client.driver_pickup(id).await,
            Move::Confirm => client.confirm_pack().await.map(|_| ()),
            Move::RequestPack => client.request_pack().await.map(|_| ()),
            Move::Pick(item) => client.pick_item(item).await.map(|_| ()),
            Move::StartPicking(id) => client.start_picking(id).await,
            Move::Wait => Ok(()),
        };
        // The order may have timed out between snapshot and command.
        if let Err(e) = result {
            if !e.is_invalid_transition() {
                return Err(e);
            }
            warn!(error = %e, "Move rejected");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config_path =
        std::env::var("SIM_CONFIG").unwrap_or_else(|_| "fulfillment-sim.toml".to_string());
    let settings = SimSettings::load(&config_path).map_err(|e| e.to_string())?;

    let catalog = match std::env::var("SIM_CATALOG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
            StaticCatalog::from_toml_str(&raw).map_err(|e| e.to_string())?
        }
        Err(_) => StaticCatalog::convenience_store(),
    };

    info!("Starting fulfillment simulator");
    let system = SimSystem::new(Arc::new(catalog), Arc::new(settings));

    let mut events = system.subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SimEvent::OrderArrived { order_id, platform }) => {
                    info!(%order_id, %platform, "🔔 New order")
                }
                Ok(SimEvent::Feedback(feedback)) => match feedback.kind {
                    FeedbackKind::Success => info!(message = %feedback.message, "Feedback"),
                    FeedbackKind::Error => warn!(message = %feedback.message, "Feedback"),
                },
                Ok(SimEvent::MatchEnded { score, mistakes }) => {
                    info!(score, mistakes, "Time's up");
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event listener lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let span = tracing::info_span!("match");
    match play(&system.client).instrument(span).await {
        Ok(summary) => info!(
            score = summary.match_session.score,
            mistakes = summary.match_session.mistakes,
            "Match finished"
        ),
        Err(e) => error!(error = %e, "Match aborted"),
    }

    system.shutdown().await?;
    let _ = listener.await;

    info!("Simulator completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_sim::model::{Item, MatchSession, Order, PickingSession, Platform};
    use tokio::time::Instant;

    fn snapshot(orders: Vec<Order>, picking: Option<PickingSession>) -> SimSnapshot {
        SimSnapshot {
            match_session: MatchSession::playing(60),
            orders,
            picking,
            feedback: None,
        }
    }

    #[test]
    fn test_next_move_finishes_active_order_first() {
        let egg = Item::new("p1", "Tea Egg", "Hot Food", "🥚");
        let coffee = Item::new("p2", "Americano", "Coffee", "☕");
        let now = Instant::now();
        let mut active = Order::new(
            OrderId(1111),
            Platform::UberEats,
            vec![egg.clone(), coffee.clone()],
            now,
        );
        active.status = OrderStatus::Picking;
        let waiting = Order::new(OrderId(2222), Platform::FoodPanda, vec![egg.clone()], now);

        let mut session = PickingSession::new(OrderId(1111));
        session.picked.push(egg);
        let snap = snapshot(vec![active, waiting], Some(session.clone()));
        assert_eq!(next_move(&snap), Move::Pick(ItemId::from("p2")));

        session.picked.push(coffee);
        let snap = snapshot(snap.orders.clone(), Some(session.clone()));
        assert_eq!(next_move(&snap), Move::RequestPack);

        session.awaiting_pack_confirmation = true;
        let snap = snapshot(snap.orders.clone(), Some(session));
        assert_eq!(next_move(&snap), Move::Confirm);
    }

    #[test]
    fn test_next_move_prefers_pickup_then_oldest_pending() {
        let egg = Item::new("p1", "Tea Egg", "Hot Food", "🥚");
        let t0 = Instant::now();
        let newer = Order::new(
            OrderId(3333),
            Platform::UberEats,
            vec![egg.clone()],
            t0 + Duration::from_secs(5),
        );
        let older = Order::new(OrderId(4444), Platform::UberEats, vec![egg.clone()], t0);
        let mut ready = Order::new(OrderId(5555), Platform::UberEats, vec![egg], t0);
        ready.status = OrderStatus::Ready;

        let snap = snapshot(vec![newer.clone(), older.clone(), ready], None);
        assert_eq!(next_move(&snap), Move::Pickup(OrderId(5555)));

        let snap = snapshot(vec![newer, older], None);
        assert_eq!(next_move(&snap), Move::StartPicking(OrderId(4444)));

        assert_eq!(next_move(&snapshot(Vec::new(), None)), Move::Wait);
    }
}
