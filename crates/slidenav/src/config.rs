use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use slidenav::SessionConfig;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidenav";

pub const KEYS: &[&str] = &[
    "gestures.swipe_min_distance",
    "gestures.swipe_max_duration_ms",
    "gestures.wheel_debounce_ms",
    "autoplay.toggle_interval_ms",
    "autoplay.default_interval_ms",
    "display.theme",
    "display.notification_ms",
    "display.help_ms",
    "display.start_slide",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gestures: Option<GesturesConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<AutoplayConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GesturesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_min_distance: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_max_duration_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoplayConfig {
    /// Interval used by the A key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_interval_ms: Option<u64>,

    /// Interval used by `--autoplay` without a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_ms: Option<u64>,

    /// Help overlay time at startup. 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidenav config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidenav configuration\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "gestures.swipe_min_distance" => {
                let distance = value
                    .parse::<f32>()
                    .ok()
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid swipe distance: {value}. Must be a number >= 0.")
                    })?;
                self.gestures
                    .get_or_insert_with(GesturesConfig::default)
                    .swipe_min_distance = Some(distance);
            }
            "gestures.swipe_max_duration_ms" => {
                self.gestures
                    .get_or_insert_with(GesturesConfig::default)
                    .swipe_max_duration_ms = Some(parse_millis(key, value, 1)?);
            }
            "gestures.wheel_debounce_ms" => {
                self.gestures
                    .get_or_insert_with(GesturesConfig::default)
                    .wheel_debounce_ms = Some(parse_millis(key, value, 0)?);
            }
            "autoplay.toggle_interval_ms" => {
                self.autoplay
                    .get_or_insert_with(AutoplayConfig::default)
                    .toggle_interval_ms = Some(parse_millis(key, value, 1)?);
            }
            "autoplay.default_interval_ms" => {
                self.autoplay
                    .get_or_insert_with(AutoplayConfig::default)
                    .default_interval_ms = Some(parse_millis(key, value, 1)?);
            }
            "display.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.display
                    .get_or_insert_with(DisplayConfig::default)
                    .theme = Some(value.to_string());
            }
            "display.notification_ms" => {
                self.display
                    .get_or_insert_with(DisplayConfig::default)
                    .notification_ms = Some(parse_millis(key, value, 1)?);
            }
            "display.help_ms" => {
                self.display
                    .get_or_insert_with(DisplayConfig::default)
                    .help_ms = Some(parse_millis(key, value, 0)?);
            }
            "display.start_slide" => {
                let slide = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number >= 1.")
                    })?;
                self.display
                    .get_or_insert_with(DisplayConfig::default)
                    .start_slide = Some(slide);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn theme_name(&self) -> &str {
        self.display
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    /// Library settings with every configured value applied over the defaults.
    pub fn session_config(&self) -> SessionConfig {
        let mut session = SessionConfig::default();

        if let Some(g) = &self.gestures {
            if let Some(distance) = g.swipe_min_distance {
                session.gestures.swipe_min_distance = distance;
            }
            if let Some(ms) = g.swipe_max_duration_ms {
                session.gestures.swipe_max_duration = Duration::from_millis(ms);
            }
            if let Some(ms) = g.wheel_debounce_ms {
                session.gestures.wheel_debounce = Duration::from_millis(ms);
            }
        }
        if let Some(a) = &self.autoplay {
            if let Some(ms) = a.toggle_interval_ms {
                session.auto_play.toggle_interval = Duration::from_millis(ms);
            }
            if let Some(ms) = a.default_interval_ms {
                session.auto_play.default_interval = Duration::from_millis(ms);
            }
        }
        if let Some(d) = &self.display {
            if let Some(ms) = d.notification_ms {
                session.notification_duration = Duration::from_millis(ms);
            }
            if let Some(ms) = d.help_ms {
                session.help_duration = Duration::from_millis(ms);
            }
            session.start_slide = d.start_slide;
        }
        session
    }
}

fn parse_millis(key: &str, value: &str, min: u64) -> Result<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms >= min)
        .ok_or_else(|| anyhow::anyhow!("Invalid {key}: {value}. Must be a whole number >= {min}."))
}
