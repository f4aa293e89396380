//! Raw input to navigation commands.
//!
//! Touch gestures are classified from their start and end samples, wheel
//! bursts are coalesced with a trailing debounce, and keys map one to one.
//! Anything ambiguous produces nothing.

use std::time::Duration;

use crate::navigator::Command;
use crate::timer::{Timer, millis};

pub const DEFAULT_SWIPE_MIN_DISTANCE: f32 = 50.0;
pub const DEFAULT_SWIPE_MAX_DURATION_MS: u64 = 500;
pub const DEFAULT_WHEEL_DEBOUNCE_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Displacement on the dominant axis must exceed this (logical pixels).
    pub swipe_min_distance: f32,
    /// Slower gestures are not swipes.
    pub swipe_max_duration: Duration,
    /// Quiet window before a wheel burst is acted on.
    pub wheel_debounce: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance: DEFAULT_SWIPE_MIN_DISTANCE,
            swipe_max_duration: millis(DEFAULT_SWIPE_MAX_DURATION_MS),
            wheel_debounce: millis(DEFAULT_WHEEL_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Start and end of one touch interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start: Point,
    pub start_time: Duration,
    pub end: Point,
    pub end_time: Duration,
}

/// Renderer-independent key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Space,
    Home,
    End,
    Escape,
    Digit(u8),
    Char(char),
}

/// What a key asks for. Navigation goes to the navigator; the rest is
/// presentation chrome owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Command(Command),
    ToggleFullscreen,
    TogglePresenterMode,
    ShowHelp,
}

/// Map a key to intents for a deck of `total` slides.
///
/// Digits beyond the deck are dropped here, so the navigator never sees
/// them. `0` stands for slide 10.
pub fn map_key(key: Key, total: usize) -> Vec<Intent> {
    let command = |c| vec![Intent::Command(c)];
    match key {
        Key::ArrowLeft | Key::ArrowUp | Key::PageUp => command(Command::Previous),
        Key::ArrowRight | Key::ArrowDown | Key::PageDown | Key::Space => command(Command::Next),
        Key::Home => command(Command::GoTo(1)),
        Key::End => command(Command::GoTo(total)),
        Key::Escape => vec![
            Intent::Command(Command::GoTo(1)),
            Intent::Command(Command::StopAutoPlay),
        ],
        Key::Digit(digit) => {
            let target = match digit {
                0 => 10,
                1..=9 => usize::from(digit),
                _ => return Vec::new(),
            };
            if target <= total {
                command(Command::GoTo(target))
            } else {
                Vec::new()
            }
        }
        Key::Char(c) => match c.to_ascii_lowercase() {
            'a' => command(Command::ToggleAutoPlay),
            'f' => vec![Intent::ToggleFullscreen],
            'p' => vec![Intent::TogglePresenterMode],
            'h' | '?' => vec![Intent::ShowHelp],
            digit @ '0'..='9' => map_key(Key::Digit(digit as u8 - b'0'), total),
            _ => Vec::new(),
        },
    }
}

#[derive(Debug, Default)]
pub struct InputNormalizer {
    config: GestureConfig,
    touch_start: Option<(Point, Duration)>,
    wheel_delta: Option<f32>,
    wheel_timer: Timer,
}

impl InputNormalizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Classify a finished gesture.
    pub fn classify_swipe(&self, sample: &GestureSample) -> Option<Command> {
        let elapsed = sample.end_time.saturating_sub(sample.start_time);
        if elapsed > self.config.swipe_max_duration {
            log::trace!("Swipe too slow: {} ms", elapsed.as_millis());
            return None;
        }

        let dx = sample.end.x - sample.start.x;
        let dy = sample.end.y - sample.start.y;
        let (ax, ay) = (dx.abs(), dy.abs());
        let min = self.config.swipe_min_distance;

        // Strict comparisons: a perfect diagonal or NaN falls through.
        if ax > ay && ax > min {
            Some(if dx > 0.0 {
                Command::Previous
            } else {
                Command::Next
            })
        } else if ay > ax && ay > min {
            Some(if dy > 0.0 {
                Command::Previous
            } else {
                Command::Next
            })
        } else {
            None
        }
    }

    pub fn touch_start(&mut self, at: Point, now: Duration) {
        self.touch_start = Some((at, now));
    }

    /// Finish the current touch. A release without a recorded start is ignored.
    pub fn touch_end(&mut self, at: Point, now: Duration) -> Option<Command> {
        let (start, start_time) = self.touch_start.take()?;
        let sample = GestureSample {
            start,
            start_time,
            end: at,
            end_time: now,
        };
        let command = self.classify_swipe(&sample);
        log::debug!("Swipe {sample:?} -> {command:?}");
        command
    }

    pub fn touch_cancel(&mut self) {
        self.touch_start = None;
    }

    /// Record a wheel tick. The decision is deferred until the burst goes quiet.
    pub fn wheel(&mut self, delta_y: f32, now: Duration) {
        self.wheel_delta = Some(delta_y);
        self.wheel_timer.arm_once(now, self.config.wheel_debounce);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.wheel_timer.deadline()
    }

    /// Run the wheel debounce if its quiet window has elapsed.
    pub fn advance(&mut self, now: Duration) -> Option<Command> {
        self.wheel_timer.fire(now)?;
        let delta = self.wheel_delta.take()?;
        if delta > 0.0 {
            Some(Command::Next)
        } else if delta < 0.0 {
            Some(Command::Previous)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dx: f32, dy: f32, dt: u64) -> GestureSample {
        GestureSample {
            start: Point::new(200.0, 300.0),
            start_time: millis(1000),
            end: Point::new(200.0 + dx, 300.0 + dy),
            end_time: millis(1000 + dt),
        }
    }

    #[test]
    fn test_horizontal_swipes() {
        let input = InputNormalizer::default();
        assert_eq!(input.classify_swipe(&sample(-60.0, 5.0, 200)), Some(Command::Next));
        assert_eq!(input.classify_swipe(&sample(60.0, 5.0, 200)), Some(Command::Previous));
    }

    #[test]
    fn test_vertical_swipes() {
        let input = InputNormalizer::default();
        assert_eq!(input.classify_swipe(&sample(3.0, -80.0, 100)), Some(Command::Next));
        assert_eq!(input.classify_swipe(&sample(3.0, 80.0, 100)), Some(Command::Previous));
    }

    #[test]
    fn test_slow_swipe_is_dropped() {
        let input = InputNormalizer::default();
        assert_eq!(input.classify_swipe(&sample(60.0, 5.0, 700)), None);
        assert_eq!(input.classify_swipe(&sample(60.0, 5.0, 500)), Some(Command::Previous));
    }

    #[test]
    fn test_short_and_diagonal_gestures_are_dropped() {
        let input = InputNormalizer::default();
        assert_eq!(input.classify_swipe(&sample(50.0, 0.0, 100)), None);
        assert_eq!(input.classify_swipe(&sample(10.0, 10.0, 100)), None);
        assert_eq!(input.classify_swipe(&sample(90.0, 90.0, 100)), None);
        assert_eq!(input.classify_swipe(&sample(f32::NAN, 0.0, 100)), None);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let input = InputNormalizer::new(GestureConfig {
            swipe_min_distance: 20.0,
            swipe_max_duration: millis(1000),
            ..GestureConfig::default()
        });
        assert_eq!(input.classify_swipe(&sample(-30.0, 0.0, 800)), Some(Command::Next));
    }

    #[test]
    fn test_touch_end_without_start() {
        let mut input = InputNormalizer::default();
        assert_eq!(input.touch_end(Point::new(0.0, 0.0), millis(10)), None);

        input.touch_start(Point::new(100.0, 100.0), millis(0));
        input.touch_cancel();
        assert_eq!(input.touch_end(Point::new(0.0, 100.0), millis(10)), None);
    }

    #[test]
    fn test_touch_pair_classifies_once() {
        let mut input = InputNormalizer::default();
        input.touch_start(Point::new(100.0, 100.0), millis(0));
        assert_eq!(
            input.touch_end(Point::new(20.0, 110.0), millis(150)),
            Some(Command::Next)
        );
        assert_eq!(input.touch_end(Point::new(20.0, 110.0), millis(160)), None);
    }

    #[test]
    fn test_wheel_burst_produces_one_command() {
        let mut input = InputNormalizer::default();
        for i in 0..5 {
            input.wheel(12.0, millis(i * 20));
            assert_eq!(input.advance(millis(i * 20)), None);
        }
        assert_eq!(input.next_deadline(), Some(millis(180)));
        assert_eq!(input.advance(millis(179)), None);
        assert_eq!(input.advance(millis(180)), Some(Command::Next));
        assert_eq!(input.advance(millis(1000)), None);
    }

    #[test]
    fn test_wheel_last_delta_wins() {
        let mut input = InputNormalizer::default();
        input.wheel(30.0, millis(0));
        input.wheel(-4.0, millis(50));
        assert_eq!(input.advance(millis(150)), Some(Command::Previous));

        input.wheel(0.0, millis(200));
        assert_eq!(input.advance(millis(300)), None);
        assert_eq!(input.next_deadline(), None);
    }

    #[test]
    fn test_arrow_and_page_keys() {
        for key in [Key::ArrowLeft, Key::ArrowUp, Key::PageUp] {
            assert_eq!(map_key(key, 5), vec![Intent::Command(Command::Previous)]);
        }
        for key in [Key::ArrowRight, Key::ArrowDown, Key::PageDown, Key::Space] {
            assert_eq!(map_key(key, 5), vec![Intent::Command(Command::Next)]);
        }
        assert_eq!(map_key(Key::Home, 5), vec![Intent::Command(Command::GoTo(1))]);
        assert_eq!(map_key(Key::End, 5), vec![Intent::Command(Command::GoTo(5))]);
    }

    #[test]
    fn test_digit_keys_respect_deck_size() {
        assert_eq!(map_key(Key::Digit(0), 10), vec![Intent::Command(Command::GoTo(10))]);
        assert!(map_key(Key::Digit(0), 7).is_empty());
        assert_eq!(map_key(Key::Digit(7), 7), vec![Intent::Command(Command::GoTo(7))]);
        assert!(map_key(Key::Digit(8), 7).is_empty());
        assert!(map_key(Key::Digit(12), 20).is_empty());
        assert_eq!(map_key(Key::Char('3'), 5), vec![Intent::Command(Command::GoTo(3))]);
    }

    #[test]
    fn test_chrome_keys() {
        assert_eq!(
            map_key(Key::Escape, 5),
            vec![
                Intent::Command(Command::GoTo(1)),
                Intent::Command(Command::StopAutoPlay)
            ]
        );
        assert_eq!(map_key(Key::Char('A'), 5), vec![Intent::Command(Command::ToggleAutoPlay)]);
        assert_eq!(map_key(Key::Char('f'), 5), vec![Intent::ToggleFullscreen]);
        assert_eq!(map_key(Key::Char('P'), 5), vec![Intent::TogglePresenterMode]);
        assert_eq!(map_key(Key::Char('?'), 5), vec![Intent::ShowHelp]);
        assert!(map_key(Key::Char('z'), 5).is_empty());
    }
}
