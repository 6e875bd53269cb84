//! The live order set and the picking session.
//!
//! [`OrderBook`] is the only place order status changes. Every operation either applies a legal
//! transition in full or returns [`EngineError::InvalidTransition`] and leaves the book unchanged.
//! Over-picking is the exception: it is reported as [`PickOutcome::Mismatched`] so the caller can
//! score it.
use crate::engine::error::EngineError;
use crate::model::{Item, Order, OrderId, OrderStatus, PickingSession};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The item was added. `ready_to_pack` is true only on the pick that completes the order.
    Picked {
        picked: usize,
        required: usize,
        ready_to_pack: bool,
    },
    /// The order does not need (more of) this item.
    Mismatched,
}

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    session: Option<PickingSession>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn session(&self) -> Option<&PickingSession> {
        self.session.as_ref()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The order currently being picked.
    pub fn active_order(&self) -> Option<&Order> {
        self.session.as_ref().and_then(|s| self.get(s.order_id))
    }

    pub fn insert(&mut self, order: Order) {
        debug!(order_id = %order.id, items = order.items.len(), "Order added");
        self.orders.push(order);
    }

    pub fn clear(&mut self) {
        self.orders.clear();
        self.session = None;
    }

    pub fn start_picking(&mut self, id: OrderId) -> Result<(), EngineError> {
        const OP: &str = "start_picking";
        if let Some(active) = self.session.as_ref() {
            return Err(EngineError::invalid(
                OP,
                format!("order {} is already being picked", active.order_id),
            ));
        }
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| EngineError::invalid(OP, format!("order {id} does not exist")))?;
        if !order.advance(OrderStatus::Picking) {
            return Err(EngineError::invalid(
                OP,
                format!("order {id} is {:?}, not Pending", order.status),
            ));
        }
        self.session = Some(PickingSession::new(id));
        debug!(order_id = %id, "Picking started");
        Ok(())
    }

    /// Adds `item` to the picking session if the active order still needs it.
    pub fn pick_item(&mut self, item: &Item) -> Result<PickOutcome, EngineError> {
        const OP: &str = "pick_item";
        self.reconcile();
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| EngineError::invalid(OP, "no order is being picked"))?;
        if session.awaiting_pack_confirmation {
            return Err(EngineError::invalid(OP, "pack confirmation is pending"));
        }
        let order = self
            .orders
            .iter()
            .find(|o| o.id == session.order_id)
            .ok_or_else(|| EngineError::invalid(OP, "active order vanished"))?;

        let needed = order.count_of(&item.id);
        let already = session.count_of(&item.id);
        if already >= needed {
            warn!(order_id = %order.id, item = %item.id, needed, already, "Mismatched pick");
            return Ok(PickOutcome::Mismatched);
        }

        session.picked.push(item.clone());
        let picked = session.picked.len();
        let required = order.items.len();
        Ok(PickOutcome::Picked {
            picked,
            required,
            ready_to_pack: picked == required,
        })
    }

    /// Opens the pack confirmation. Only a fully picked order may be packed.
    pub fn request_pack(&mut self) -> Result<OrderId, EngineError> {
        const OP: &str = "request_pack";
        self.ensure_complete(OP)?;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| EngineError::invalid(OP, "no order is being picked"))?;
        session.awaiting_pack_confirmation = true;
        Ok(session.order_id)
    }

    pub fn cancel_pack(&mut self) -> Result<OrderId, EngineError> {
        const OP: &str = "cancel_pack";
        match self.session.as_mut() {
            Some(session) if session.awaiting_pack_confirmation => {
                session.awaiting_pack_confirmation = false;
                Ok(session.order_id)
            }
            Some(_) => Err(EngineError::invalid(OP, "no pack confirmation is pending")),
            None => Err(EngineError::invalid(OP, "no order is being picked")),
        }
    }

    /// Packs the active order: it becomes `Ready` and the picking session ends.
    pub fn confirm_pack(&mut self) -> Result<OrderId, EngineError> {
        const OP: &str = "confirm_pack";
        let awaiting = self
            .session
            .as_ref()
            .is_some_and(|s| s.awaiting_pack_confirmation);
        if !awaiting {
            return Err(EngineError::invalid(OP, "pack was not requested"));
        }
        let id = self.ensure_complete(OP)?;
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| EngineError::invalid(OP, "active order vanished"))?;
        if !order.advance(OrderStatus::Ready) {
            return Err(EngineError::invalid(
                OP,
                format!("order {id} is {:?}, not Picking", order.status),
            ));
        }
        self.session = None;
        Ok(id)
    }

    /// Hands a `Ready` order to the driver, removing it from the live set.
    pub fn driver_pickup(&mut self, id: OrderId) -> Result<Order, EngineError> {
        const OP: &str = "driver_pickup";
        let index = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| EngineError::invalid(OP, format!("order {id} does not exist")))?;
        if self.orders[index].status != OrderStatus::Ready {
            return Err(EngineError::invalid(
                OP,
                format!("order {id} is {:?}, not Ready", self.orders[index].status),
            ));
        }
        Ok(self.orders.remove(index))
    }

    /// Removes every non-`Ready` order at least `timeout` old, judged against the single `now`.
    pub fn evict_expired(&mut self, now: Instant, timeout: Duration) -> Vec<OrderId> {
        let mut evicted = Vec::new();
        self.orders.retain(|order| {
            if order.is_expired(now, timeout) {
                evicted.push(order.id);
                false
            } else {
                true
            }
        });
        if !evicted.is_empty() {
            debug!(?evicted, "Orders evicted");
            self.reconcile();
        }
        evicted
    }

    /// Drops the picking session if its order is gone or no longer `Picking`.
    fn reconcile(&mut self) {
        let stale = self.session.as_ref().is_some_and(|session| {
            self.get(session.order_id)
                .map_or(true, |order| order.status != OrderStatus::Picking)
        });
        if stale {
            debug!("Picking session torn down");
            self.session = None;
        }
    }

    fn ensure_complete(&self, op: &'static str) -> Result<OrderId, EngineError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| EngineError::invalid(op, "no order is being picked"))?;
        let order = self
            .get(session.order_id)
            .ok_or_else(|| EngineError::invalid(op, "active order vanished"))?;
        if session.picked.len() != order.items.len() {
            return Err(EngineError::invalid(
                op,
                format!(
                    "picked {} of {} items",
                    session.picked.len(),
                    order.items.len()
                ),
            ));
        }
        Ok(session.order_id)
    }
}
