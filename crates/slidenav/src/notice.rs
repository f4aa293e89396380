//! Short-lived messages layered over the slide: notifications, the help
//! overlay, and the screen-reader announcement text.

use std::time::Duration;

use crate::deck::Deck;
use crate::timer::millis;

pub const DEFAULT_NOTIFICATION_MS: u64 = 2000;
pub const DEFAULT_HELP_MS: u64 = 8000;
pub const HELP_REPEAT_MS: u64 = 6000;

const NOTIFICATION_FADE: Duration = Duration::from_millis(250);
const HELP_FADE: Duration = Duration::from_millis(500);

/// Keyboard shortcuts shown by the help overlay.
pub const HELP_SHORTCUTS: &[(&str, &str)] = &[
    ("\u{2190} \u{2192} / Space", "Previous / next slide"),
    ("PgUp / PgDn", "Previous / next slide"),
    ("Home / End", "First / last slide"),
    ("1-9, 0", "Jump to slide"),
    ("F", "Fullscreen"),
    ("A", "Auto-play"),
    ("P", "Presenter mode"),
    ("H / ?", "Show this help"),
    ("Esc", "Back to the start"),
];

pub const HELP_INPUTS: &str = "Works with mouse, touch, swipe and mouse wheel";

/// Screen-reader text for the slide at `position`.
pub fn announcement(deck: &Deck, position: usize) -> String {
    format!(
        "{}. Slide {} of {}",
        deck.title_of(position),
        position,
        deck.len()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    shown_at: Duration,
    duration: Duration,
}

impl Notification {
    /// Full opacity for the notification duration, then a short fade.
    pub fn opacity(&self, now: Duration) -> f32 {
        fade_opacity(now.saturating_sub(self.shown_at), self.duration, NOTIFICATION_FADE)
    }

    fn expires_at(&self) -> Duration {
        self.shown_at + self.duration + NOTIFICATION_FADE
    }
}

/// At most one notification is visible; a new one replaces the old.
#[derive(Debug, Clone)]
pub struct Notifier {
    duration: Duration,
    current: Option<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(millis(DEFAULT_NOTIFICATION_MS))
    }
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, now: Duration) {
        let message = message.into();
        log::debug!("Notification: {message}");
        self.current = Some(Notification {
            message,
            shown_at: now,
            duration: self.duration,
        });
    }

    /// The visible notification, if it has not expired yet.
    pub fn current(&self, now: Duration) -> Option<&Notification> {
        self.current.as_ref().filter(|n| now < n.expires_at())
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.current.as_ref().map(Notification::expires_at)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Timed help overlay. Showing it while visible does nothing.
#[derive(Debug, Clone, Default)]
pub struct HelpOverlay {
    shown: Option<(Duration, Duration)>,
}

impl HelpOverlay {
    pub fn show(&mut self, now: Duration, duration: Duration) -> bool {
        if self.is_visible(now) {
            return false;
        }
        self.shown = Some((now, duration));
        true
    }

    pub fn hide(&mut self) {
        self.shown = None;
    }

    pub fn is_visible(&self, now: Duration) -> bool {
        self.shown
            .is_some_and(|(at, duration)| now < at + duration + HELP_FADE)
    }

    pub fn opacity(&self, now: Duration) -> f32 {
        match self.shown {
            Some((at, duration)) => fade_opacity(now.saturating_sub(at), duration, HELP_FADE),
            None => 0.0,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.shown.map(|(at, duration)| at + duration + HELP_FADE)
    }
}

fn fade_opacity(elapsed: Duration, hold: Duration, fade: Duration) -> f32 {
    if elapsed < hold {
        1.0
    } else if elapsed < hold + fade {
        1.0 - (elapsed - hold).as_secs_f32() / fade.as_secs_f32()
    } else {
        0.0
    }
}
