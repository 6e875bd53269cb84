//! # Feedback Sink
//!
//! Turns lifecycle signals into short-lived messages for the trainee and queues them, together
//! with the arrival chime and match-end notice, as [`SimEvent`]s for the outbound stream. Nothing
//! here touches the score.
use crate::model::{OrderId, Platform};
use std::time::Duration;
use tokio::time::Instant;

/// How long a feedback message stays visible.
pub const FEEDBACK_TTL: Duration = Duration::from_millis(1_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub message: String,
    pub kind: FeedbackKind,
    pub emitted_at: Instant,
    pub expires_at: Instant,
}

impl FeedbackEvent {
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Outcomes reported by the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSignal {
    OrderArrived { order_id: OrderId, platform: Platform },
    ReadyToPack { order_id: OrderId },
    MismatchedPick { item: String },
    Packed { order_id: OrderId },
    PickedUp { order_id: OrderId },
    TimedOut { count: usize },
    MatchEnded { score: u32, mistakes: u32 },
}

/// Everything published to observers of a running simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Feedback(FeedbackEvent),
    /// A new order came in; the notification cue.
    OrderArrived { order_id: OrderId, platform: Platform },
    MatchEnded { score: u32, mistakes: u32 },
}

#[derive(Debug, Default)]
pub struct FeedbackSink {
    pending: Vec<SimEvent>,
    latest: Option<FeedbackEvent>,
}

impl FeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, signal: LifecycleSignal, now: Instant) {
        match &signal {
            LifecycleSignal::OrderArrived { order_id, platform } => {
                self.pending.push(SimEvent::OrderArrived {
                    order_id: *order_id,
                    platform: *platform,
                });
            }
            LifecycleSignal::MatchEnded { score, mistakes } => {
                self.pending.push(SimEvent::MatchEnded {
                    score: *score,
                    mistakes: *mistakes,
                });
            }
            _ => {}
        }
        if let Some((message, kind)) = banner(&signal) {
            let event = FeedbackEvent {
                message,
                kind,
                emitted_at: now,
                expires_at: now + FEEDBACK_TTL,
            };
            self.latest = Some(event.clone());
            self.pending.push(SimEvent::Feedback(event));
        }
    }

    /// The most recent message, if it has not expired yet.
    pub fn active(&self, now: Instant) -> Option<&FeedbackEvent> {
        self.latest.as_ref().filter(|event| event.is_active(now))
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.latest = None;
    }
}

/// The trainee-facing banner for a signal, if it has one.
fn banner(signal: &LifecycleSignal) -> Option<(String, FeedbackKind)> {
    let banner = match signal {
        LifecycleSignal::ReadyToPack { .. } => (
            "All items picked, ready to pack".to_string(),
            FeedbackKind::Success,
        ),
        LifecycleSignal::MismatchedPick { item } => (
            format!("Wrong item or too many: {item}"),
            FeedbackKind::Error,
        ),
        LifecycleSignal::Packed { .. } => ("Packed! +10".to_string(), FeedbackKind::Success),
        LifecycleSignal::PickedUp { order_id } => (
            format!("Order #{} picked up by driver! +20", order_id.suffix()),
            FeedbackKind::Success,
        ),
        LifecycleSignal::TimedOut { count } => (
            format!("{count} order(s) timed out!"),
            FeedbackKind::Error,
        ),
        LifecycleSignal::OrderArrived { .. } | LifecycleSignal::MatchEnded { .. } => return None,
    };
    Some(banner)
}
