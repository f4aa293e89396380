//! Slide navigation state machine.
//!
//! The navigator knows only the number of slides. It moves a 1-based
//! position around `1..=total`, runs the auto-play interval, and tells
//! subscribed observers about every committed transition.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Edge, NavError};
use crate::timer::{Timer, TimerHandle, millis};

pub const DEFAULT_TOGGLE_INTERVAL_MS: u64 = 8000;
pub const DEFAULT_START_INTERVAL_MS: u64 = 10000;

/// Abstract navigation commands produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    GoTo(usize),
    ToggleAutoPlay,
    StopAutoPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Jump,
}

/// Emitted once per successful transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideChanged {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// What a successful [`Navigator::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Moved(SlideChanged),
    AutoPlay { active: bool },
}

impl Applied {
    pub fn slide_changed(&self) -> Option<&SlideChanged> {
        match self {
            Self::Moved(change) => Some(change),
            Self::AutoPlay { .. } => None,
        }
    }
}

/// Read-only view of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub position: usize,
    pub total: usize,
    pub auto_play_active: bool,
}

impl Snapshot {
    pub fn progress_percent(&self) -> f32 {
        self.position as f32 / self.total as f32 * 100.0
    }

    pub fn can_go_previous(&self) -> bool {
        self.position > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.position < self.total
    }

    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.position, self.total)
    }
}

/// Auto-play intervals. Toggling uses the fast one; the explicit start API
/// falls back to the slow one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlayConfig {
    pub toggle_interval: Duration,
    pub default_interval: Duration,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            toggle_interval: millis(DEFAULT_TOGGLE_INTERVAL_MS),
            default_interval: millis(DEFAULT_START_INTERVAL_MS),
        }
    }
}

/// Receives every committed transition. Closures with the matching
/// signature implement this.
pub trait SlideObserver {
    fn slide_changed(&mut self, change: &SlideChanged, snapshot: &Snapshot) -> Result<(), NavError>;
}

impl<F> SlideObserver for F
where
    F: FnMut(&SlideChanged, &Snapshot) -> Result<(), NavError>,
{
    fn slide_changed(&mut self, change: &SlideChanged, snapshot: &Snapshot) -> Result<(), NavError> {
        self(change, snapshot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Default)]
struct AutoPlay {
    active: bool,
    interval: Duration,
    timer: Timer,
}

pub struct Navigator {
    total: NonZeroUsize,
    position: usize,
    auto_play: AutoPlay,
    config: AutoPlayConfig,
    clock: Duration,
    observers: Vec<(SubscriptionId, Box<dyn SlideObserver>)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("total", &self.total)
            .field("position", &self.position)
            .field("auto_play", &self.auto_play)
            .field("clock", &self.clock)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Navigator {
    pub fn new(total: NonZeroUsize, config: AutoPlayConfig) -> Self {
        Self {
            total,
            position: 1,
            auto_play: AutoPlay::default(),
            config,
            clock: Duration::ZERO,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Start somewhere other than the first slide. Out-of-range positions
    /// are clamped into the deck; no event is emitted.
    pub fn starting_at(mut self, position: usize) -> Self {
        self.position = position.clamp(1, self.total());
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            total: self.total(),
            auto_play_active: self.auto_play.active,
        }
    }

    pub fn auto_play_active(&self) -> bool {
        self.auto_play.active
    }

    /// Interval of the running auto-play, if any.
    pub fn auto_play_interval(&self) -> Option<Duration> {
        self.auto_play.active.then_some(self.auto_play.interval)
    }

    /// When the next auto-play tick is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.auto_play.timer.deadline()
    }

    /// Handle of the pending auto-play tick, for hosts that drive ticks
    /// from their own scheduler through [`Navigator::tick`].
    pub fn auto_play_handle(&self) -> Option<TimerHandle> {
        if !self.auto_play.active {
            return None;
        }
        self.auto_play.timer.handle()
    }

    pub fn subscribe(&mut self, observer: impl SlideObserver + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn apply(&mut self, command: Command) -> Result<Applied, NavError> {
        match command {
            Command::Next => {
                if self.position >= self.total() {
                    return Err(NavError::AtBoundary { edge: Edge::End });
                }
                Ok(Applied::Moved(self.commit(self.position + 1, Direction::Forward)))
            }
            Command::Previous => {
                if self.position <= 1 {
                    return Err(NavError::AtBoundary { edge: Edge::Start });
                }
                Ok(Applied::Moved(self.commit(self.position - 1, Direction::Backward)))
            }
            Command::GoTo(target) => {
                if !(1..=self.total()).contains(&target) {
                    log::warn!("Ignoring jump to slide {target} of {}", self.total());
                    return Err(NavError::OutOfRange {
                        target,
                        total: self.total(),
                    });
                }
                Ok(Applied::Moved(self.commit(target, Direction::Jump)))
            }
            Command::ToggleAutoPlay => {
                if self.auto_play.active {
                    self.stop_auto_play();
                } else {
                    self.start_auto_play(Some(self.config.toggle_interval));
                }
                Ok(Applied::AutoPlay {
                    active: self.auto_play.active,
                })
            }
            Command::StopAutoPlay => {
                self.stop_auto_play();
                Ok(Applied::AutoPlay { active: false })
            }
        }
    }

    /// Start (or restart) auto-play. `None` picks the default interval.
    pub fn start_auto_play(&mut self, interval: Option<Duration>) -> Duration {
        self.stop_auto_play();
        let interval = interval.unwrap_or(self.config.default_interval);
        self.auto_play.active = true;
        self.auto_play.interval = interval;
        self.auto_play.timer.arm_every(self.clock, interval);
        log::info!("Auto-play started with interval {} ms", interval.as_millis());
        interval
    }

    /// Stop auto-play. Returns whether it was running.
    pub fn stop_auto_play(&mut self) -> bool {
        let was_active = self.auto_play.active;
        self.auto_play.active = false;
        self.auto_play.timer.cancel();
        if was_active {
            log::info!("Auto-play stopped");
        }
        was_active
    }

    /// Move the clock to `now`, running every auto-play tick that came due.
    pub fn advance(&mut self, now: Duration) -> Vec<SlideChanged> {
        let mut changes = Vec::new();
        while let Some(expiry) = self.auto_play.timer.fire(now) {
            self.clock = self.clock.max(expiry.at);
            if let Some(change) = self.tick(expiry.handle) {
                changes.push(change);
            }
        }
        self.clock = self.clock.max(now);
        changes
    }

    /// One auto-play step. Stale handles and ticks after a stop are no-ops.
    /// At the last slide the deck wraps to the first one instead of failing.
    pub fn tick(&mut self, handle: TimerHandle) -> Option<SlideChanged> {
        if !self.auto_play.active || !self.auto_play.timer.is_current(handle) {
            log::trace!("Dropping stale auto-play tick");
            return None;
        }
        if self.position < self.total() {
            Some(self.commit(self.position + 1, Direction::Forward))
        } else {
            Some(self.commit(1, Direction::Jump))
        }
    }

    fn commit(&mut self, to: usize, direction: Direction) -> SlideChanged {
        let change = SlideChanged {
            from: self.position,
            to,
            direction,
        };
        self.position = to;
        log::debug!("Slide {} -> {} ({:?})", change.from, change.to, direction);

        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            if let Err(e) = observer.slide_changed(&change, &snapshot) {
                log::error!("Slide observer failed: {e}; position stays at {to}");
            }
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn navigator(total: usize) -> Navigator {
        Navigator::new(NonZeroUsize::new(total).unwrap(), AutoPlayConfig::default())
    }

    #[test]
    fn test_next_and_previous_move_one_step() {
        let mut nav = navigator(3);
        let applied = nav.apply(Command::Next).unwrap();
        assert_eq!(
            applied,
            Applied::Moved(SlideChanged {
                from: 1,
                to: 2,
                direction: Direction::Forward
            })
        );
        let applied = nav.apply(Command::Previous).unwrap();
        assert_eq!(applied.slide_changed().unwrap().direction, Direction::Backward);
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_next_at_end_is_boundary_and_idempotent() {
        let mut nav = navigator(2);
        nav.apply(Command::Next).unwrap();
        for _ in 0..3 {
            assert_eq!(
                nav.apply(Command::Next),
                Err(NavError::AtBoundary { edge: Edge::End })
            );
            assert_eq!(nav.position(), 2);
        }
    }

    #[test]
    fn test_previous_at_start_is_boundary() {
        let mut nav = navigator(4);
        assert_eq!(
            nav.apply(Command::Previous),
            Err(NavError::AtBoundary { edge: Edge::Start })
        );
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_position_stays_in_range_for_any_sequence() {
        for total in 1..=6 {
            let mut nav = navigator(total);
            // Deterministic pseudo-random walk.
            let mut seed: u32 = 0x9e37_79b9 ^ total as u32;
            for _ in 0..200 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let command = if seed % 3 == 0 {
                    Command::Previous
                } else {
                    Command::Next
                };
                let _ = nav.apply(command);
                assert!((1..=total).contains(&nav.position()));
            }
        }
    }

    #[test]
    fn test_goto_validates_range() {
        let mut nav = navigator(5);
        assert_eq!(
            nav.apply(Command::GoTo(0)),
            Err(NavError::OutOfRange {
                target: 0,
                total: 5
            })
        );
        assert_eq!(
            nav.apply(Command::GoTo(6)),
            Err(NavError::OutOfRange {
                target: 6,
                total: 5
            })
        );
        assert_eq!(nav.position(), 1);

        let change = *nav.apply(Command::GoTo(4)).unwrap().slide_changed().unwrap();
        assert_eq!(change.to, 4);
        assert_eq!(change.direction, Direction::Jump);
    }

    #[test]
    fn test_starting_at_clamps() {
        let nav = navigator(4).starting_at(9);
        assert_eq!(nav.position(), 4);
        let nav = navigator(4).starting_at(0);
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_goto_current_position_is_a_jump() {
        let mut nav = navigator(5);
        let change = *nav.apply(Command::GoTo(1)).unwrap().slide_changed().unwrap();
        assert_eq!(
            change,
            SlideChanged {
                from: 1,
                to: 1,
                direction: Direction::Jump
            }
        );
    }

    #[test]
    fn test_auto_play_tick_wraps_at_end() {
        let mut nav = navigator(3);
        nav.apply(Command::GoTo(3)).unwrap();
        nav.start_auto_play(Some(millis(1000)));
        let changes = nav.advance(millis(1000));
        assert_eq!(
            changes,
            vec![SlideChanged {
                from: 3,
                to: 1,
                direction: Direction::Jump
            }]
        );
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_toggle_uses_fast_interval_and_start_uses_default() {
        let mut nav = navigator(3);
        assert_eq!(
            nav.apply(Command::ToggleAutoPlay),
            Ok(Applied::AutoPlay { active: true })
        );
        assert_eq!(nav.auto_play_interval(), Some(millis(8000)));
        nav.stop_auto_play();
        assert_eq!(nav.start_auto_play(None), millis(10000));
    }

    #[test]
    fn test_toggle_twice_leaves_no_pending_timer() {
        let mut nav = navigator(5);
        nav.apply(Command::ToggleAutoPlay).unwrap();
        nav.apply(Command::ToggleAutoPlay).unwrap();
        assert!(!nav.snapshot().auto_play_active);
        assert_eq!(nav.next_deadline(), None);
        assert!(nav.advance(millis(60_000)).is_empty());
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_stale_tick_after_stop_is_noop() {
        let mut nav = navigator(5);
        nav.start_auto_play(Some(millis(100)));
        let handle = nav.auto_play_handle().unwrap();
        nav.apply(Command::StopAutoPlay).unwrap();
        assert_eq!(nav.tick(handle), None);
        assert_eq!(nav.position(), 1);
    }

    #[test]
    fn test_restart_invalidates_old_handle() {
        let mut nav = navigator(5);
        nav.start_auto_play(Some(millis(100)));
        let old = nav.auto_play_handle().unwrap();
        nav.start_auto_play(Some(millis(200)));
        assert_eq!(nav.tick(old), None);
        assert_eq!(nav.next_deadline(), Some(millis(200)));
    }

    #[test]
    fn test_auto_play_arms_from_current_clock() {
        let mut nav = navigator(5);
        nav.advance(millis(5000));
        nav.apply(Command::ToggleAutoPlay).unwrap();
        assert_eq!(nav.next_deadline(), Some(millis(13_000)));
        assert!(nav.advance(millis(12_999)).is_empty());
        assert_eq!(nav.advance(millis(13_000)).len(), 1);
        assert_eq!(nav.position(), 2);
    }

    #[test]
    fn test_observers_see_committed_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut nav = navigator(4);
        let sink = Rc::clone(&seen);
        let id = nav.subscribe(
            move |change: &SlideChanged, snapshot: &Snapshot| -> Result<(), NavError> {
                sink.borrow_mut().push((change.to, snapshot.position));
                Ok(())
            },
        );
        nav.apply(Command::Next).unwrap();
        nav.apply(Command::GoTo(4)).unwrap();
        let _ = nav.apply(Command::Next);
        assert_eq!(*seen.borrow(), vec![(2, 2), (4, 4)]);

        assert!(nav.unsubscribe(id));
        nav.apply(Command::Previous).unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_failing_observer_does_not_revert_position() {
        let mut nav = navigator(3);
        nav.subscribe(|change: &SlideChanged, _: &Snapshot| -> Result<(), NavError> {
            Err(NavError::NoTargetElement {
                position: change.to,
            })
        });
        nav.apply(Command::Next).unwrap();
        assert_eq!(nav.position(), 2);
    }

    #[test]
    fn test_snapshot_chrome_helpers() {
        let mut nav = navigator(4);
        let snapshot = nav.snapshot();
        assert!(!snapshot.can_go_previous());
        assert!(snapshot.can_go_next());
        assert_eq!(snapshot.progress_percent(), 25.0);
        nav.apply(Command::GoTo(4)).unwrap();
        let snapshot = nav.snapshot();
        assert!(!snapshot.can_go_next());
        assert_eq!(snapshot.progress_percent(), 100.0);
        assert_eq!(snapshot.counter_label(), "4 / 4");
    }
}
