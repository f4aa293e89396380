use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use slidenav::notice::{HELP_INPUTS, HELP_SHORTCUTS};
use slidenav::{Deck, Direction, Effect, InputEvent, Key, NavError, Session, SlideChanged};

use crate::config::Config;
use crate::theme::Theme;

const TRANSITION_DURATION: f32 = 0.3;
const PROGRESS_BAR_HEIGHT: f32 = 4.0;
const PRESENTER_CHROME_SCALE: f32 = 1.5;

/// Slide-in animation for the slide that just became current.
struct SlideIn {
    direction: Direction,
    start: Instant,
}

impl SlideIn {
    fn progress(&self) -> f32 {
        let raw = (self.start.elapsed().as_secs_f32() / TRANSITION_DURATION).clamp(0.0, 1.0);
        ease_in_out(raw)
    }

    fn is_complete(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TRANSITION_DURATION
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ChromeButton {
    Previous,
    Next,
    Help,
}

struct PresentationApp {
    session: Session,
    theme: Theme,
    started: Instant,
    transition: Option<SlideIn>,
    deck_title: String,
}

impl PresentationApp {
    fn new(session: Session, theme: Theme, deck_title: String) -> Self {
        Self {
            session,
            theme,
            started: Instant::now(),
            transition: None,
            deck_title,
        }
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn apply_effects(&mut self, effects: Vec<Effect>, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        for effect in effects {
            match effect {
                Effect::Changed(change) => self.on_slide_changed(change, viewport_cmds),
                Effect::Fullscreen(on) => viewport_cmds.push(egui::ViewportCommand::Fullscreen(on)),
            }
        }
    }

    fn on_slide_changed(&mut self, change: SlideChanged, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        self.transition = Some(SlideIn {
            direction: change.direction,
            start: Instant::now(),
        });
        // The window title doubles as the accessible announcement.
        viewport_cmds.push(egui::ViewportCommand::Title(window_title(
            &self.session,
            &self.deck_title,
        )));
    }

    /// Translate this frame's raw egui events into session input.
    fn collect_input(&self, i: &egui::InputState, quit: &mut bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for event in &i.events {
            match event {
                egui::Event::Key {
                    key: egui::Key::Q,
                    pressed: true,
                    ..
                } => *quit = true,
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if !modifiers.command => {
                    if let Some(key) = map_egui_key(*key) {
                        events.push(InputEvent::Key(key));
                    }
                }
                egui::Event::Text(text) if text == "?" => {
                    events.push(InputEvent::Key(Key::Char('?')));
                }
                egui::Event::Touch { phase, pos, .. } => match phase {
                    egui::TouchPhase::Start => events.push(InputEvent::TouchStart {
                        x: pos.x,
                        y: pos.y,
                    }),
                    egui::TouchPhase::End => events.push(InputEvent::TouchEnd { x: pos.x, y: pos.y }),
                    egui::TouchPhase::Cancel => events.push(InputEvent::TouchCancel),
                    egui::TouchPhase::Move => {}
                },
                // A primary-button drag is treated like a swipe.
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => events.push(if *pressed {
                    InputEvent::TouchStart { x: pos.x, y: pos.y }
                } else {
                    InputEvent::TouchEnd { x: pos.x, y: pos.y }
                }),
                egui::Event::MouseWheel { delta, .. } => {
                    // egui reports scrolling down as negative y.
                    events.push(InputEvent::Wheel { delta_y: -delta.y });
                }
                _ => {}
            }
        }
        events
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let sx = rect.width() / 1920.0;
        let sy = rect.height() / 1080.0;
        sx.min(sy)
    }

    fn chrome_scale(&self, scale: f32) -> f32 {
        if self.session.presenter_mode() {
            scale * PRESENTER_CHROME_SCALE
        } else {
            scale
        }
    }

    fn draw_slide(&self, ui: &egui::Ui, rect: egui::Rect, opacity: f32, scale: f32) {
        let position = self.session.snapshot().position;
        let Some(slide) = self.session.deck().slide(position) else {
            log::error!("{}", NavError::NoTargetElement { position });
            return;
        };

        let padding = 120.0 * scale;
        let content_rect = rect.shrink(padding);
        let heading_color = Theme::with_opacity(self.theme.heading_color, opacity);
        let body_color = Theme::with_opacity(self.theme.foreground, opacity);

        let mut top = content_rect.top();
        if let Some(title) = &slide.title {
            let galley = ui.painter().layout(
                title.clone(),
                egui::FontId::proportional(self.theme.title_size * scale),
                heading_color,
                content_rect.width(),
            );
            let height = galley.rect.height();
            ui.painter()
                .galley(egui::pos2(content_rect.left(), top), galley, heading_color);
            top += height + 40.0 * scale;
        }

        if !slide.body.is_empty() {
            let galley = ui.painter().layout(
                slide.body.clone(),
                egui::FontId::proportional(self.theme.body_size * scale),
                body_color,
                content_rect.width(),
            );
            ui.painter()
                .galley(egui::pos2(content_rect.left(), top), galley, body_color);
        }
    }

    fn draw_presentation(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        match &self.transition {
            Some(t) => {
                let progress = t.progress();
                match t.direction {
                    Direction::Forward | Direction::Backward => {
                        let sign = if t.direction == Direction::Forward {
                            1.0
                        } else {
                            -1.0
                        };
                        let offset = sign * (1.0 - progress) * rect.width() * 0.25;
                        let slide_rect = rect.translate(egui::vec2(offset, 0.0));
                        self.draw_slide(ui, slide_rect, progress, scale);
                    }
                    Direction::Jump => self.draw_slide(ui, rect, progress, scale),
                }
            }
            None => self.draw_slide(ui, rect, 1.0, scale),
        }
    }

    fn draw_progress_bar(&self, ui: &egui::Ui, rect: egui::Rect) {
        let snapshot = self.session.snapshot();
        let track = egui::Rect::from_min_size(
            rect.left_top(),
            egui::vec2(rect.width(), PROGRESS_BAR_HEIGHT),
        );
        ui.painter()
            .rect_filled(track, 0.0, Theme::with_opacity(self.theme.foreground, 0.1));
        let filled = egui::Rect::from_min_size(
            rect.left_top(),
            egui::vec2(
                rect.width() * snapshot.progress_percent() / 100.0,
                PROGRESS_BAR_HEIGHT,
            ),
        );
        ui.painter().rect_filled(filled, 0.0, self.theme.accent);
    }

    fn button_rect(&self, button: ChromeButton, rect: egui::Rect, scale: f32) -> egui::Rect {
        let size = 48.0 * scale;
        let margin = 24.0 * scale;
        let center = match button {
            ChromeButton::Previous => egui::pos2(
                rect.center().x - size * 0.75,
                rect.bottom() - margin - size / 2.0,
            ),
            ChromeButton::Next => egui::pos2(
                rect.center().x + size * 0.75,
                rect.bottom() - margin - size / 2.0,
            ),
            ChromeButton::Help => egui::pos2(
                rect.right() - margin - size / 2.0,
                rect.top() + margin + size / 2.0,
            ),
        };
        egui::Rect::from_center_size(center, egui::vec2(size, size))
    }

    /// Draw one chrome button and report whether it was clicked.
    fn chrome_button(
        &self,
        ui: &mut egui::Ui,
        button: ChromeButton,
        rect: egui::Rect,
        scale: f32,
        enabled: bool,
    ) -> bool {
        let button_rect = self.button_rect(button, rect, scale);
        let label = match button {
            ChromeButton::Previous => "\u{2039}",
            ChromeButton::Next => "\u{203A}",
            ChromeButton::Help => "?",
        };
        let id = egui::Id::new(("chrome_button", label));
        let sense = if enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let response = ui.interact(button_rect, id, sense);

        let opacity = match (enabled, response.hovered()) {
            (false, _) => 0.25,
            (true, true) => 1.0,
            (true, false) => 0.7,
        };
        ui.painter().circle_filled(
            button_rect.center(),
            button_rect.width() / 2.0,
            Theme::with_opacity(self.theme.surface, opacity),
        );
        let color = Theme::with_opacity(self.theme.foreground, opacity);
        let galley = ui.painter().layout_no_wrap(
            label.to_string(),
            egui::FontId::proportional(button_rect.height() * 0.6),
            color,
        );
        let pos = button_rect.center() - galley.rect.size() / 2.0;
        ui.painter().galley(pos, galley, color);

        enabled && response.clicked()
    }

    fn draw_chrome(
        &self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        scale: f32,
        now: Duration,
    ) -> Vec<InputEvent> {
        let snapshot = self.session.snapshot();
        let chrome = self.chrome_scale(scale);
        let mut clicks = Vec::new();

        self.draw_progress_bar(ui, rect);

        let counter_color = Theme::with_opacity(self.theme.foreground, 0.4);
        let counter_galley = ui.painter().layout_no_wrap(
            snapshot.counter_label(),
            egui::FontId::monospace(self.theme.chrome_size * chrome),
            counter_color,
        );
        let counter_pos = egui::pos2(
            rect.right() - counter_galley.rect.width() - 24.0 * chrome,
            rect.bottom() - counter_galley.rect.height() - 24.0 * chrome,
        );
        ui.painter()
            .galley(counter_pos, counter_galley, counter_color);

        if snapshot.auto_play_active {
            let color = Theme::with_opacity(self.theme.accent, 0.8);
            let galley = ui.painter().layout_no_wrap(
                "\u{25B6} auto".to_string(),
                egui::FontId::monospace(self.theme.chrome_size * chrome),
                color,
            );
            let pos = egui::pos2(24.0 * chrome + rect.left(), counter_pos.y);
            ui.painter().galley(pos, galley, color);
        }

        if self.session.presenter_mode() {
            let next = snapshot.position + 1;
            let text = if next <= snapshot.total {
                format!("Next: {}", self.session.deck().title_of(next))
            } else {
                "End of deck".to_string()
            };
            let color = Theme::with_opacity(self.theme.foreground, 0.6);
            let galley = ui.painter().layout_no_wrap(
                text,
                egui::FontId::proportional(self.theme.chrome_size * chrome),
                color,
            );
            let pos = egui::pos2(
                rect.left() + 24.0 * chrome,
                rect.top() + PROGRESS_BAR_HEIGHT + 16.0 * chrome,
            );
            ui.painter().galley(pos, galley, color);
        }

        if self.chrome_button(ui, ChromeButton::Previous, rect, chrome, snapshot.can_go_previous()) {
            clicks.push(InputEvent::PreviousButton);
        }
        if self.chrome_button(ui, ChromeButton::Next, rect, chrome, snapshot.can_go_next()) {
            clicks.push(InputEvent::NextButton);
        }
        if help_button_visible(&self.session, now)
            && self.chrome_button(ui, ChromeButton::Help, rect, chrome, true)
        {
            clicks.push(InputEvent::HelpButton);
        }
        clicks
    }

    fn draw_notification(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32, now: Duration) {
        let Some(notification) = self.session.notification(now) else {
            return;
        };
        let opacity = notification.opacity(now);
        if opacity <= 0.0 {
            return;
        }
        let chrome = self.chrome_scale(scale);
        let text_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let bg = Theme::with_opacity(self.theme.surface, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            notification.message.clone(),
            egui::FontId::proportional(24.0 * chrome),
            text_color,
        );
        let padding = 16.0 * chrome;
        let toast_rect = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * chrome, bg);
        ui.painter().galley(
            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
            galley,
            text_color,
        );
    }

    fn draw_help(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32, now: Duration) {
        let opacity = self.session.help().opacity(now);
        if opacity <= 0.0 {
            return;
        }
        let chrome = self.chrome_scale(scale);
        let bg = Theme::with_opacity(self.theme.surface, opacity * 0.95);
        let text_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let key_color = Theme::with_opacity(self.theme.accent, opacity * 0.9);
        let title_color = Theme::with_opacity(self.theme.heading_color, opacity * 0.9);

        let padding = 24.0 * chrome;
        let line_height = 32.0 * chrome;
        let height = (HELP_SHORTCUTS.len() + 1) as f32 * line_height + padding * 2.0 + 40.0 * chrome;
        let width = 440.0 * chrome;
        let help_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(width, height));
        ui.painter().rect_filled(help_rect, 12.0 * chrome, bg);

        let title = ui.painter().layout_no_wrap(
            "Keyboard Shortcuts".to_string(),
            egui::FontId::proportional(20.0 * chrome),
            title_color,
        );
        ui.painter().galley(
            egui::pos2(help_rect.left() + padding, help_rect.top() + padding),
            title,
            title_color,
        );

        let mut y = help_rect.top() + padding + 40.0 * chrome;
        for (key, desc) in HELP_SHORTCUTS {
            let key_galley = ui.painter().layout_no_wrap(
                key.to_string(),
                egui::FontId::monospace(15.0 * chrome),
                key_color,
            );
            ui.painter()
                .galley(egui::pos2(help_rect.left() + padding, y), key_galley, key_color);
            let desc_galley = ui.painter().layout_no_wrap(
                desc.to_string(),
                egui::FontId::proportional(15.0 * chrome),
                text_color,
            );
            ui.painter().galley(
                egui::pos2(help_rect.left() + padding + 200.0 * chrome, y),
                desc_galley,
                text_color,
            );
            y += line_height;
        }

        let footer = ui.painter().layout_no_wrap(
            HELP_INPUTS.to_string(),
            egui::FontId::proportional(13.0 * chrome),
            Theme::with_opacity(self.theme.foreground, opacity * 0.6),
        );
        ui.painter().galley(
            egui::pos2(help_rect.left() + padding, y + 8.0 * chrome),
            footer,
            text_color,
        );
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Duration) {
        let animating = self.transition.is_some()
            || self.session.notification(now).is_some()
            || self.session.help().is_visible(now);
        if animating {
            ctx.request_repaint();
        } else if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_sub(now));
        }
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Viewport commands are sent after the input closure to avoid
        // re-entering the context lock.
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut quit = false;

        let (events, fullscreen) = ctx.input(|i| {
            (
                self.collect_input(i, &mut quit),
                i.viewport().fullscreen.unwrap_or(false),
            )
        });
        if fullscreen != self.session.is_fullscreen() {
            self.session.set_fullscreen(fullscreen);
        }

        let now = self.now();
        for event in events {
            let effects = self.session.handle(event, now);
            self.apply_effects(effects, &mut viewport_cmds);
        }
        let effects = self.session.advance(now);
        self.apply_effects(effects, &mut viewport_cmds);

        if self.transition.as_ref().is_some_and(SlideIn::is_complete) {
            self.transition = None;
        }

        let bg = self.theme.background;
        let clicks = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect);

                self.draw_presentation(ui, rect, scale);
                let clicks = self.draw_chrome(ui, rect, scale, now);
                self.draw_notification(ui, rect, scale, now);
                self.draw_help(ui, rect, scale, now);
                clicks
            })
            .inner;

        for click in clicks {
            let effects = self.session.handle(click, now);
            self.apply_effects(effects, &mut viewport_cmds);
        }

        if quit {
            viewport_cmds.push(egui::ViewportCommand::Close);
        }
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        let now = self.now();
        self.schedule_repaint(ctx, now);
    }
}

fn window_title(session: &Session, deck_title: &str) -> String {
    format!("{} - {}", session.announcement(), deck_title)
}

/// The help button replaces the overlay once it has gone away.
fn help_button_visible(session: &Session, now: Duration) -> bool {
    !session.help().is_visible(now)
}

fn map_egui_key(key: egui::Key) -> Option<Key> {
    use egui::Key as K;
    let key = match key {
        K::ArrowLeft => Key::ArrowLeft,
        K::ArrowRight => Key::ArrowRight,
        K::ArrowUp => Key::ArrowUp,
        K::ArrowDown => Key::ArrowDown,
        K::PageUp => Key::PageUp,
        K::PageDown => Key::PageDown,
        K::Space => Key::Space,
        K::Home => Key::Home,
        K::End => Key::End,
        K::Escape => Key::Escape,
        K::Num0 => Key::Digit(0),
        K::Num1 => Key::Digit(1),
        K::Num2 => Key::Digit(2),
        K::Num3 => Key::Digit(3),
        K::Num4 => Key::Digit(4),
        K::Num5 => Key::Digit(5),
        K::Num6 => Key::Digit(6),
        K::Num7 => Key::Digit(7),
        K::Num8 => Key::Digit(8),
        K::Num9 => Key::Digit(9),
        K::A => Key::Char('a'),
        K::F => Key::Char('f'),
        K::P => Key::Char('p'),
        K::H => Key::Char('h'),
        _ => return None,
    };
    Some(key)
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn run(
    file: PathBuf,
    windowed: bool,
    start_slide: Option<usize>,
    autoplay: Option<Option<u64>>,
) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;

    let config = Config::load_or_default();
    let theme = Theme::from_name(config.theme_name());

    // CLI flags override config values.
    let mut session_config = config.session_config();
    if let Some(slide) = start_slide {
        session_config.start_slide = Some(slide);
    }
    session_config.start_auto_play =
        autoplay.map(|interval| interval.map(Duration::from_millis));

    let deck_title = deck.meta().title.clone().unwrap_or_else(|| {
        format!(
            "slidenav - {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    });
    log::info!(
        "Presenting {} ({} slides, {} theme)",
        file.display(),
        deck.len(),
        theme.name
    );

    let mut session = Session::new(deck, session_config);
    session.set_fullscreen(!windowed);
    let title = window_title(&session, &deck_title);

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "slidenav",
        options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(session, theme, deck_title)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_egui_key() {
        assert_eq!(map_egui_key(egui::Key::ArrowRight), Some(Key::ArrowRight));
        assert_eq!(map_egui_key(egui::Key::Num0), Some(Key::Digit(0)));
        assert_eq!(map_egui_key(egui::Key::A), Some(Key::Char('a')));
        assert_eq!(map_egui_key(egui::Key::Z), None);
    }

    fn session(help_ms: u64) -> Session {
        let deck = Deck::from_markdown("# Intro\n\nHello\n\n---\n\n# Outro\n\nBye").unwrap();
        let config = slidenav::SessionConfig {
            help_duration: Duration::from_millis(help_ms),
            ..slidenav::SessionConfig::default()
        };
        Session::new(deck, config)
    }

    #[test]
    fn test_window_title_uses_ascii_separator() {
        let title = window_title(&session(0), "Demo");
        assert_eq!(title, "Intro. Slide 1 of 2 - Demo");
        assert!(title.is_ascii());
    }

    #[test]
    fn test_help_button_hidden_while_overlay_shows() {
        let with_help = session(8000);
        assert!(!help_button_visible(&with_help, Duration::from_millis(100)));
        assert!(help_button_visible(&with_help, Duration::from_millis(9000)));

        let without_help = session(0);
        assert!(help_button_visible(&without_help, Duration::ZERO));
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }
}
