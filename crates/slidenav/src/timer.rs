//! Cancellable timers driven by an explicit clock.
//!
//! Nothing here sleeps or spawns. Time is a `Duration` measured from the
//! start of the session, and the owner asks a [`Timer`] whether it has
//! expired by calling [`Timer::fire`] with the current time.

use std::time::Duration;

/// Cancel token for one arming of a [`Timer`]. Re-arming or cancelling a
/// timer invalidates every handle issued before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    handle: TimerHandle,
    deadline: Duration,
    schedule: Schedule,
}

/// A single expiry returned by [`Timer::fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub handle: TimerHandle,
    pub at: Duration,
}

/// One deadline slot. Arming replaces whatever was pending (last write wins).
#[derive(Debug, Default)]
pub struct Timer {
    armed: Option<Armed>,
    generation: u64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot expiry `delay` after `now`.
    pub fn arm_once(&mut self, now: Duration, delay: Duration) -> TimerHandle {
        self.arm(now + delay, Schedule::Once)
    }

    /// Arm a recurring expiry every `interval`, first one `interval` after `now`.
    pub fn arm_every(&mut self, now: Duration, interval: Duration) -> TimerHandle {
        // A zero interval would expire forever at the same instant.
        let interval = interval.max(Duration::from_millis(1));
        self.arm(now + interval, Schedule::Every(interval))
    }

    fn arm(&mut self, deadline: Duration, schedule: Schedule) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.armed = Some(Armed {
            handle,
            deadline,
            schedule,
        });
        handle
    }

    /// Disarm. Returns the handle that was pending, if any.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.armed.take().map(|a| a.handle)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.armed.map(|a| a.deadline)
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.armed.map(|a| a.handle)
    }

    /// Whether `handle` still refers to the pending arming.
    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.armed.is_some_and(|a| a.handle == handle)
    }

    /// Pop one expiry if the deadline is at or before `now`.
    ///
    /// One-shot timers disarm. Recurring timers keep their handle and move
    /// the deadline forward by one interval from the old deadline, so a
    /// caller that jumps far ahead gets one expiry per missed interval.
    pub fn fire(&mut self, now: Duration) -> Option<Expiry> {
        let armed = self.armed?;
        if armed.deadline > now {
            return None;
        }
        match armed.schedule {
            Schedule::Once => self.armed = None,
            Schedule::Every(interval) => {
                if let Some(pending) = self.armed.as_mut() {
                    pending.deadline += interval;
                }
            }
        }
        Some(Expiry {
            handle: armed.handle,
            at: armed.deadline,
        })
    }
}

/// Milliseconds helper used by configuration code.
pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
