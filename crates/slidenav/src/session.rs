//! One running presentation: deck, navigator, input normalizer and the
//! chrome state a host UI needs to draw.
//!
//! Hosts feed raw [`InputEvent`]s and the current time into
//! [`Session::handle`], call [`Session::advance`] every frame (or when
//! [`Session::next_deadline`] comes due), and react to the returned
//! [`Effect`]s.

use std::time::Duration;

use crate::deck::Deck;
use crate::error::{Edge, NavError};
use crate::input::{GestureConfig, InputNormalizer, Intent, Key, Point, map_key};
use crate::navigator::{
    Applied, AutoPlayConfig, Command, Navigator, SlideChanged, SlideObserver, Snapshot,
    SubscriptionId,
};
use crate::notice::{
    self, DEFAULT_HELP_MS, DEFAULT_NOTIFICATION_MS, HELP_REPEAT_MS, HelpOverlay, Notification,
    Notifier,
};
use crate::timer::millis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    TouchCancel,
    Wheel { delta_y: f32 },
    PreviousButton,
    NextButton,
    HelpButton,
}

/// Something the host has to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Changed(SlideChanged),
    Fullscreen(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub gestures: GestureConfig,
    pub auto_play: AutoPlayConfig,
    pub notification_duration: Duration,
    /// How long the help overlay stays up at session start. Zero skips it.
    pub help_duration: Duration,
    pub start_slide: Option<usize>,
    /// Start auto-play right away; `Some(None)` uses the default interval.
    pub start_auto_play: Option<Option<Duration>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gestures: GestureConfig::default(),
            auto_play: AutoPlayConfig::default(),
            notification_duration: millis(DEFAULT_NOTIFICATION_MS),
            help_duration: millis(DEFAULT_HELP_MS),
            start_slide: None,
            start_auto_play: None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    deck: Deck,
    navigator: Navigator,
    input: InputNormalizer,
    notifier: Notifier,
    help: HelpOverlay,
    announcement: String,
    fullscreen: bool,
    presenter_mode: bool,
    now: Duration,
}

impl Session {
    pub fn new(deck: Deck, config: SessionConfig) -> Self {
        let mut navigator = Navigator::new(deck.len(), config.auto_play)
            .starting_at(config.start_slide.unwrap_or(1));
        if let Some(interval) = config.start_auto_play {
            navigator.start_auto_play(interval);
        }

        let mut help = HelpOverlay::default();
        if !config.help_duration.is_zero() {
            help.show(Duration::ZERO, config.help_duration);
        }

        let announcement = notice::announcement(&deck, navigator.position());
        Self {
            deck,
            navigator,
            input: InputNormalizer::new(config.gestures),
            notifier: Notifier::new(config.notification_duration),
            help,
            announcement,
            fullscreen: false,
            presenter_mode: false,
            now: Duration::ZERO,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn snapshot(&self) -> Snapshot {
        self.navigator.snapshot()
    }

    /// Live-region text for the current slide.
    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    pub fn notification(&self, now: Duration) -> Option<&Notification> {
        self.notifier.current(now)
    }

    pub fn help(&self) -> &HelpOverlay {
        &self.help
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Keep the flag in sync when the window leaves fullscreen on its own.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn presenter_mode(&self) -> bool {
        self.presenter_mode
    }

    pub fn subscribe(&mut self, observer: impl SlideObserver + 'static) -> SubscriptionId {
        self.navigator.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.navigator.unsubscribe(id)
    }

    /// Earliest time something changes without further input.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.navigator.next_deadline(),
            self.input.next_deadline(),
            self.notifier.next_deadline().filter(|d| *d > self.now),
            self.help.next_deadline().filter(|d| *d > self.now),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle(&mut self, event: InputEvent, now: Duration) -> Vec<Effect> {
        let mut effects = self.advance(now);
        let now = self.now;

        match event {
            InputEvent::Key(key) => {
                // Escape also dismisses whatever is layered over the slide.
                if key == Key::Escape {
                    self.help.hide();
                    self.notifier.clear();
                }
                for intent in map_key(key, self.navigator.total()) {
                    self.perform(intent, &mut effects);
                }
            }
            InputEvent::TouchStart { x, y } => self.input.touch_start(Point::new(x, y), now),
            InputEvent::TouchEnd { x, y } => {
                if let Some(command) = self.input.touch_end(Point::new(x, y), now) {
                    self.dispatch(command, &mut effects);
                }
            }
            InputEvent::TouchCancel => self.input.touch_cancel(),
            InputEvent::Wheel { delta_y } => self.input.wheel(delta_y, now),
            InputEvent::PreviousButton => self.dispatch(Command::Previous, &mut effects),
            InputEvent::NextButton => self.dispatch(Command::Next, &mut effects),
            InputEvent::HelpButton => self.perform(Intent::ShowHelp, &mut effects),
        }
        effects
    }

    /// Apply a command directly, bypassing input normalization.
    pub fn command(&mut self, command: Command, now: Duration) -> Vec<Effect> {
        let mut effects = self.advance(now);
        self.dispatch(command, &mut effects);
        effects
    }

    /// Explicit auto-play start; `None` uses the default (slow) interval.
    pub fn start_auto_play(&mut self, interval: Option<Duration>, now: Duration) -> Vec<Effect> {
        let effects = self.advance(now);
        self.navigator.start_auto_play(interval);
        effects
    }

    /// Run every timer that came due up to `now`, in deadline order.
    /// On a tie the auto-play tick runs before the wheel decision.
    pub fn advance(&mut self, now: Duration) -> Vec<Effect> {
        let now = now.max(self.now);
        let mut effects = Vec::new();

        loop {
            let due = [self.navigator.next_deadline(), self.input.next_deadline()]
                .into_iter()
                .flatten()
                .filter(|d| *d <= now)
                .min();
            let Some(at) = due else { break };
            self.now = at;

            for change in self.navigator.advance(at) {
                self.on_changed(change, &mut effects);
            }
            if let Some(command) = self.input.advance(at) {
                self.dispatch(command, &mut effects);
            }
        }

        self.now = now;
        for change in self.navigator.advance(now) {
            self.on_changed(change, &mut effects);
        }
        effects
    }

    fn perform(&mut self, intent: Intent, effects: &mut Vec<Effect>) {
        match intent {
            Intent::Command(command) => self.dispatch(command, effects),
            Intent::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                self.notifier.show(
                    if self.fullscreen {
                        "Fullscreen on"
                    } else {
                        "Fullscreen off"
                    },
                    self.now,
                );
                effects.push(Effect::Fullscreen(self.fullscreen));
            }
            Intent::TogglePresenterMode => {
                self.presenter_mode = !self.presenter_mode;
                self.notifier.show(
                    if self.presenter_mode {
                        "Presenter mode on"
                    } else {
                        "Presenter mode off"
                    },
                    self.now,
                );
            }
            Intent::ShowHelp => {
                self.help.show(self.now, millis(HELP_REPEAT_MS));
            }
        }
    }

    fn dispatch(&mut self, command: Command, effects: &mut Vec<Effect>) {
        match self.navigator.apply(command) {
            Ok(Applied::Moved(change)) => self.on_changed(change, effects),
            Ok(Applied::AutoPlay { active }) => {
                if command == Command::ToggleAutoPlay {
                    let message = if active {
                        "Auto-play on"
                    } else {
                        "Auto-play off"
                    };
                    self.notifier.show(message, self.now);
                }
            }
            Err(NavError::AtBoundary { edge }) => {
                log::debug!("{command:?} ignored at the {edge} slide");
                let message = match edge {
                    Edge::Start => "First slide",
                    Edge::End => "Last slide",
                };
                self.notifier.show(message, self.now);
            }
            Err(e) => log::warn!("{command:?} rejected: {e}"),
        }
    }

    fn on_changed(&mut self, change: SlideChanged, effects: &mut Vec<Effect>) {
        self.announcement = notice::announcement(&self.deck, change.to);
        effects.push(Effect::Changed(change));
    }
}
