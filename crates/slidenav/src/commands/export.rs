use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use slidenav::{Deck, SlideSummary};

use crate::cli::ExportFormat;

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    total: usize,
    slides: Vec<SlideSummary>,
}

pub fn run(file: &Path, format: ExportFormat, output: Option<&Path>, quiet: bool) -> Result<()> {
    let deck = Deck::load(file).with_context(|| format!("Failed to load {}", file.display()))?;
    log::debug!("Loaded {} slides from {}", deck.len(), file.display());

    let text = render(&deck, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} {} slides to {}",
                    "Exported".green().bold(),
                    deck.len(),
                    path.display()
                );
            }
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn render(deck: &Deck, format: ExportFormat) -> Result<String> {
    let doc = ExportDocument {
        title: deck.meta().title.as_deref(),
        author: deck.meta().author.as_deref(),
        total: deck.len().get(),
        slides: deck.summaries(),
    };
    let text = match format {
        ExportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&doc)?;
            json.push('\n');
            json
        }
        ExportFormat::Yaml => serde_yaml::to_string(&doc)?,
    };
    Ok(text)
}
