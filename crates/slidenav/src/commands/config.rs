use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{self, Config};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!(
                "{} {} = {} ({})",
                "Set".green().bold(),
                key,
                value,
                path.display()
            );
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", Config::path()?.display());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load_or_default();
    let session = config.session_config();

    let values: [(&str, String); 9] = [
        (
            config::KEYS[0],
            format!("{}", session.gestures.swipe_min_distance),
        ),
        (
            config::KEYS[1],
            session.gestures.swipe_max_duration.as_millis().to_string(),
        ),
        (
            config::KEYS[2],
            session.gestures.wheel_debounce.as_millis().to_string(),
        ),
        (
            config::KEYS[3],
            session.auto_play.toggle_interval.as_millis().to_string(),
        ),
        (
            config::KEYS[4],
            session.auto_play.default_interval.as_millis().to_string(),
        ),
        (config::KEYS[5], config.theme_name().to_string()),
        (
            config::KEYS[6],
            session.notification_duration.as_millis().to_string(),
        ),
        (config::KEYS[7], session.help_duration.as_millis().to_string()),
        (
            config::KEYS[8],
            session
                .start_slide
                .map_or_else(|| "1".to_string(), |n| n.to_string()),
        ),
    ];

    println!("{}", "Configuration".bold());
    for (key, value) in values {
        println!("  {:<32} {}", key.cyan(), value);
    }
    match Config::path() {
        Ok(path) if path.exists() => println!("\n{} {}", "File:".dimmed(), path.display()),
        Ok(path) => println!(
            "\n{} {} (not created yet, showing defaults)",
            "File:".dimmed(),
            path.display()
        ),
        Err(e) => log::warn!("{e}"),
    }
    Ok(())
}
