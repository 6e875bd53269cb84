use crate::model::{MatchSession, MatchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Seconds left after this tick.
    Running(u32),
    /// This tick ended the match. Reported exactly once per match.
    Expired,
    /// The match is not playing; nothing changed.
    Idle,
}

/// Match countdown, advanced once per second.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionClock;

impl SessionClock {
    pub fn tick(session: &mut MatchSession) -> ClockTick {
        if session.state != MatchState::Playing {
            return ClockTick::Idle;
        }
        session.time_remaining = session.time_remaining.saturating_sub(1);
        if session.time_remaining == 0 {
            session.state = MatchState::Ended;
            ClockTick::Expired
        } else {
            ClockTick::Running(session.time_remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_ends_exactly_once() {
        let mut session = MatchSession::playing(3);

        assert_eq!(SessionClock::tick(&mut session), ClockTick::Running(2));
        assert_eq!(SessionClock::tick(&mut session), ClockTick::Running(1));
        assert_eq!(SessionClock::tick(&mut session), ClockTick::Expired);
        assert_eq!(session.state, MatchState::Ended);
        assert_eq!(session.time_remaining, 0);

        for _ in 0..5 {
            assert_eq!(SessionClock::tick(&mut session), ClockTick::Idle);
        }
        assert_eq!(session.state, MatchState::Ended);
    }

    #[test]
    fn test_idle_session_does_not_tick() {
        let mut session = MatchSession::default();
        assert_eq!(SessionClock::tick(&mut session), ClockTick::Idle);
        assert_eq!(session, MatchSession::default());
    }
}
