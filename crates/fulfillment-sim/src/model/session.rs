use crate::model::{Item, ItemId, OrderId};
use serde::{Deserialize, Serialize};

/// The trainee's work-in-progress on the active order.
///
/// Exists exactly while one order is `Picking`.
#[derive(Debug, Clone, PartialEq)]
pub struct PickingSession {
    pub order_id: OrderId,
    pub picked: Vec<Item>,
    /// Set between a pack request and its confirmation or cancellation.
    pub awaiting_pack_confirmation: bool,
}

impl PickingSession {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            picked: Vec::new(),
            awaiting_pack_confirmation: false,
        }
    }

    pub fn count_of(&self, item: &ItemId) -> usize {
        self.picked.iter().filter(|i| &i.id == item).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Idle,
    Playing,
    Ended,
}

/// Score sheet and countdown for one match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchSession {
    pub state: MatchState,
    pub score: u32,
    pub mistakes: u32,
    pub time_remaining: u32,
}

impl MatchSession {
    /// A fresh `Playing` session with the given countdown.
    pub fn playing(time_remaining: u32) -> Self {
        Self {
            state: MatchState::Playing,
            score: 0,
            mistakes: 0,
            time_remaining,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == MatchState::Playing
    }
}
