use crate::engine::PickOutcome;
use crate::model::{ItemId, OrderId};

/// Requests the simulator actor understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCommand {
    StartMatch,
    ExitMatch,
    StartPicking(OrderId),
    PickItem(ItemId),
    /// Opens the pack confirmation for a fully picked order.
    RequestPack,
    CancelPack,
    ConfirmPack,
    DriverPickup(OrderId),
}

/// One reply variant per [`SimCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimReply {
    MatchStarted { first_order: Option<OrderId> },
    MatchExited,
    PickingStarted(OrderId),
    Picked(PickOutcome),
    PackRequested(OrderId),
    PackCancelled(OrderId),
    Packed(OrderId),
    PickedUp(OrderId),
}
