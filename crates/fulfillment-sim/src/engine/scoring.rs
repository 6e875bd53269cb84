use crate::model::MatchSession;

pub const PACK_POINTS: u32 = 10;
pub const PICKUP_POINTS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    Packed,
    PickedUp,
    Mistakes(u32),
}

pub fn apply(session: &mut MatchSession, event: ScoreEvent) {
    match event {
        ScoreEvent::Packed => session.score = session.score.saturating_add(PACK_POINTS),
        ScoreEvent::PickedUp => session.score = session.score.saturating_add(PICKUP_POINTS),
        ScoreEvent::Mistakes(n) => session.mistakes = session.mistakes.saturating_add(n),
    }
}
