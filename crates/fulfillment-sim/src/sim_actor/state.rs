use crate::engine::{ClockTick, EngineError, SimEngine, SimEvent, SimSnapshot};
use crate::sim_actor::{SimCommand, SimReply};
use actor_framework::{ActorState, Timers};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, trace};

const SECOND: Duration = Duration::from_secs(1);

/// Periodic work registered while a match is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimTimer {
    Spawn,
    Second,
    TimeoutSweep,
}

/// Where the actor publishes [`SimEvent`]s.
pub type EventPublisher = broadcast::Sender<SimEvent>;

impl ActorState for SimEngine {
    type Command = SimCommand;
    type Reply = SimReply;
    type Snapshot = SimSnapshot;
    type Timer = SimTimer;
    type Context = EventPublisher;
    type Error = EngineError;

    fn handle(
        &mut self,
        command: SimCommand,
        timers: &mut Timers<SimTimer>,
        events: &EventPublisher,
    ) -> Result<SimReply, EngineError> {
        let now = Instant::now();
        let reply = match command {
            SimCommand::StartMatch => {
                let first_order = self.start(now)?;
                timers.schedule(SimTimer::Spawn, self.active_settings().spawn_interval());
                timers.schedule(SimTimer::Second, SECOND);
                timers.schedule(SimTimer::TimeoutSweep, SECOND);
                SimReply::MatchStarted { first_order }
            }
            SimCommand::ExitMatch => {
                // Timers go first so no tick can observe a half-cleared engine.
                timers.cancel_all();
                self.exit();
                SimReply::MatchExited
            }
            SimCommand::StartPicking(id) => {
                self.start_picking(id)?;
                SimReply::PickingStarted(id)
            }
            SimCommand::PickItem(item) => SimReply::Picked(self.pick_item(&item, now)?),
            SimCommand::RequestPack => SimReply::PackRequested(self.request_pack()?),
            SimCommand::CancelPack => SimReply::PackCancelled(self.cancel_pack()?),
            SimCommand::ConfirmPack => SimReply::Packed(self.confirm_pack(now)?),
            SimCommand::DriverPickup(id) => SimReply::PickedUp(self.driver_pickup(id, now)?),
        };
        publish(self, events);
        Ok(reply)
    }

    fn on_timer(
        &mut self,
        timer: SimTimer,
        now: Instant,
        timers: &mut Timers<SimTimer>,
        events: &EventPublisher,
    ) {
        match timer {
            SimTimer::Spawn => {
                self.on_spawn_tick(now);
            }
            SimTimer::Second => match self.on_second_tick(now) {
                ClockTick::Expired | ClockTick::Idle => {
                    timers.cancel_all();
                    debug!("Match timers cancelled");
                }
                ClockTick::Running(remaining) => trace!(remaining, "Clock"),
            },
            SimTimer::TimeoutSweep => {
                self.on_timeout_sweep(now);
            }
        }
        publish(self, events);
    }

    fn snapshot(&self) -> SimSnapshot {
        self.snapshot_at(Instant::now())
    }
}

fn publish(engine: &mut SimEngine, events: &EventPublisher) {
    for event in engine.drain_events() {
        if events.send(event).is_err() {
            trace!("No event subscribers");
        }
    }
}
