pub mod completion;
pub mod config;
pub mod export;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "slidenav".bold(),
        env!("CARGO_PKG_VERSION").cyan()
    );
}
