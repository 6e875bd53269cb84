//! # Timer Registry
//!
//! `Timers<K>` holds the periodic timers a state has registered, keyed by a small `Copy` enum.
//! The `StateActor` polls the registry alongside its message channel, so ticks are delivered on the
//! same task as commands.
//!
//! Cancelling a key removes its interval from the registry immediately. Since the registry is only
//! polled between hooks, a tick for a cancelled key can never be observed afterwards.

use std::future::poll_fn;
use std::hash::Hash;
use std::task::Poll;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Registry of periodic timers owned by a `StateActor`.
pub struct Timers<K> {
    entries: Vec<(K, Interval)>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` to fire every `period`, first firing one `period` from now.
    ///
    /// Re-scheduling an existing key replaces its interval and restarts the phase.
    pub fn schedule(&mut self, key: K, period: Duration) {
        self.cancel(key);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.entries.push((key, interval));
    }

    /// Unregisters `key`. Returns `true` if it was scheduled.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    /// Unregisters every timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits for the next registered timer to fire and returns its key.
    ///
    /// With nothing registered this future never resolves, which lets the actor `select!` on it
    /// unconditionally.
    pub async fn next_tick(&mut self) -> K {
        poll_fn(|cx| {
            for (key, interval) in self.entries.iter_mut() {
                if interval.poll_tick(cx).is_ready() {
                    return Poll::Ready(*key);
                }
            }
            Poll::Pending
        })
        .await
    }
}
