//! Represents a simulated delivery order.
//!
//! # Lifecycle
//! An order is created `Pending`, becomes `Picking` when the trainee selects it, `Ready` once it is
//! packed, and then leaves the live set when the driver collects it. Orders that are not yet
//! `Ready` leave the live set when they time out. Status never moves backwards.
use crate::model::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::Instant;

/// Type-safe identifier for Orders: a 4-digit number, unique among live orders only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u16);

impl OrderId {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    /// Last three digits, used when announcing a pickup.
    pub fn suffix(&self) -> String {
        let text = self.to_string();
        text[text.len().saturating_sub(3)..].to_string()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery service the order came from. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    UberEats,
    FoodPanda,
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::UberEats => f.write_str("UberEats"),
            Platform::FoodPanda => f.write_str("FoodPanda"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Picking,
    Ready,
}

impl OrderStatus {
    /// Only the forward steps `Pending → Picking → Ready` are legal.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Picking) | (OrderStatus::Picking, OrderStatus::Ready)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub platform: Platform,
    pub items: Vec<Item>,
    pub status: OrderStatus,
    pub created_at: Instant,
    pub driver_arrived: bool,
}

impl Order {
    /// Creates a new `Pending` order.
    ///
    /// # Arguments
    /// * `id` - 4-digit identifier drawn by the spawner
    /// * `platform` - Delivery service label
    /// * `items` - Requested items, duplicates allowed
    /// * `created_at` - Spawn time, the reference point for timeouts
    pub fn new(id: OrderId, platform: Platform, items: Vec<Item>, created_at: Instant) -> Self {
        Self {
            id,
            platform,
            items,
            status: OrderStatus::Pending,
            created_at,
            driver_arrived: false,
        }
    }

    /// How many units of `item` this order asks for.
    pub fn count_of(&self, item: &ItemId) -> usize {
        self.items.iter().filter(|i| &i.id == item).count()
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// `Ready` orders never expire: the trainee is not penalized for a slow driver.
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        self.status != OrderStatus::Ready && self.age(now) >= timeout
    }

    /// Moves the order one step forward. Returns `false` and leaves it untouched otherwise.
    pub fn advance(&mut self, next: OrderStatus) -> bool {
        if !self.status.can_advance_to(next) {
            return false;
        }
        self.status = next;
        if next == OrderStatus::Ready {
            self.driver_arrived = true;
        }
        true
    }
}
