//! Pick timer state for a draft room.
//!
//! The room actor owns exactly one `PickTimer` and drives it from a
//! one-second `run_interval`. Arming bumps an epoch and supersedes any prior
//! interval handle, and expiry messages carry the epoch they were armed
//! under, so "stop" and "fire" can never both act for the same turn: a stale
//! epoch is discarded on the actor's single-threaded mailbox.

use actix::SpawnHandle;

/// Outcome of one interval tick.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick {
    /// The tick belongs to a superseded timer; ignore it.
    Stale,
    /// Seconds remain and this tick is on the broadcast cadence.
    Broadcast(u64),
    /// Seconds remain, nothing to broadcast.
    Quiet(u64),
    /// The countdown reached zero; fire the auto-pick path.
    Expired,
}

#[derive(Default)]
pub struct PickTimer {
    epoch: u64,
    remaining: u64,
    handle: Option<SpawnHandle>,
    /// An expiry message is queued but not yet handled. The countdown is not
    /// idle in this window even though the interval handle is gone.
    fired: bool,
}

impl PickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// No interval running and no expiry in flight. Only an idle timer may
    /// be armed on behalf of a joining connection; between expiry and the
    /// auto-pick the turn already has an owner.
    pub fn is_idle(&self) -> bool {
        self.handle.is_none() && !self.fired
    }

    /// Arm the countdown, superseding any prior arming. Returns the new
    /// epoch; the caller cancels the returned stale handle (if any) and
    /// registers the fresh interval with [`set_handle`](Self::set_handle).
    pub fn arm(&mut self, seconds: u64) -> (u64, Option<SpawnHandle>) {
        self.epoch += 1;
        self.remaining = seconds;
        self.fired = false;
        (self.epoch, self.handle.take())
    }

    pub fn set_handle(&mut self, handle: SpawnHandle) {
        self.handle = Some(handle);
    }

    /// Stop the countdown. Bumping the epoch invalidates any expiry message
    /// already queued behind the current mailbox message.
    pub fn disarm(&mut self) -> Option<SpawnHandle> {
        self.epoch += 1;
        self.remaining = 0;
        self.fired = false;
        self.handle.take()
    }

    /// Whether an expiry armed under `epoch` is still the live timer.
    pub fn matches(&self, epoch: u64) -> bool {
        self.epoch == epoch && self.handle.is_none()
    }

    /// Take the interval handle at expiry without bumping the epoch, so the
    /// queued `TimerFired` still matches.
    pub fn take_expired_handle(&mut self) -> Option<SpawnHandle> {
        self.handle.take()
    }

    /// Advance the countdown by one second on behalf of the interval armed
    /// under `epoch`.
    pub fn tick(&mut self, epoch: u64) -> Tick {
        if epoch != self.epoch || self.handle.is_none() {
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            Tick::Expired
        } else if self.remaining % 10 == 0 || self.remaining <= 10 {
            Tick::Broadcast(self.remaining)
        } else {
            Tick::Quiet(self.remaining)
        }
    }
}
