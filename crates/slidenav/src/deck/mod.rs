//! The fixed, ordered set of slides being presented.

pub mod frontmatter;
pub mod splitter;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DeckError;
pub use frontmatter::DeckMeta;

const EXCERPT_CHARS: usize = 200;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,2}\s+(.+?)\s*#*\s*$").expect("valid title regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// 1-based position in the deck.
    pub number: usize,
    pub title: Option<String>,
    pub body: String,
}

impl Slide {
    /// Parse one raw markdown chunk. The first H1/H2 line becomes the title.
    pub fn from_markdown(number: usize, raw: &str) -> Self {
        let mut title = None;
        let mut body = Vec::new();
        for line in raw.lines() {
            if title.is_none() {
                if let Some(caps) = TITLE_RE.captures(line.trim_end()) {
                    title = Some(caps[1].to_string());
                    continue;
                }
            }
            body.push(line);
        }
        Self {
            number,
            title,
            body: body.join("\n").trim().to_string(),
        }
    }

    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Slide {}", self.number))
    }
}

/// Export record for one slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideSummary {
    pub number: usize,
    pub title: String,
    pub excerpt: String,
}

#[derive(Debug, Clone)]
pub struct Deck {
    meta: DeckMeta,
    slides: Vec<Slide>,
}

impl Deck {
    /// Build a deck from `(title, body)` pairs. Slides are numbered in order.
    pub fn new(
        meta: DeckMeta,
        slides: impl IntoIterator<Item = (Option<String>, String)>,
    ) -> Result<Self, DeckError> {
        let slides: Vec<Slide> = slides
            .into_iter()
            .enumerate()
            .map(|(i, (title, body))| Slide {
                number: i + 1,
                title,
                body,
            })
            .collect();
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self { meta, slides })
    }

    pub fn from_markdown(content: &str) -> Result<Self, DeckError> {
        let (meta, body) = frontmatter::extract(content)?;
        let slides: Vec<Slide> = splitter::split(&body)
            .iter()
            .enumerate()
            .map(|(i, raw)| Slide::from_markdown(i + 1, raw))
            .collect();
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        log::debug!("Parsed {} slides", slides.len());
        Ok(Self { meta, slides })
    }

    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_markdown(&content)
    }

    pub fn meta(&self) -> &DeckMeta {
        &self.meta
    }

    pub fn len(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.slides.len()).unwrap_or(NonZeroUsize::MIN)
    }

    /// Slide at a 1-based position.
    pub fn slide(&self, position: usize) -> Option<&Slide> {
        position
            .checked_sub(1)
            .and_then(|index| self.slides.get(index))
    }

    pub fn title_of(&self, position: usize) -> String {
        self.slide(position)
            .map(Slide::display_title)
            .unwrap_or_else(|| format!("Slide {position}"))
    }

    pub fn summaries(&self) -> Vec<SlideSummary> {
        self.slides
            .iter()
            .map(|slide| {
                let mut excerpt: String = slide.body.chars().take(EXCERPT_CHARS).collect();
                excerpt.push_str("...");
                SlideSummary {
                    number: slide.number,
                    title: slide.display_title(),
                    excerpt,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\ntitle: Board Games\n---\n\
        # Welcome\n\nIntro text\n\n\
        # History\n\nOld games\n\n---\n\n\
        No heading here";

    #[test]
    fn test_from_markdown() {
        let deck = Deck::from_markdown(SAMPLE).unwrap();
        assert_eq!(deck.len().get(), 3);
        assert_eq!(deck.meta().title.as_deref(), Some("Board Games"));

        let first = deck.slide(1).unwrap();
        assert_eq!(first.title.as_deref(), Some("Welcome"));
        assert_eq!(first.body, "Intro text");
        assert_eq!(deck.title_of(3), "Slide 3");
    }

    #[test]
    fn test_slide_lookup_is_one_based() {
        let deck = Deck::from_markdown(SAMPLE).unwrap();
        assert!(deck.slide(0).is_none());
        assert!(deck.slide(4).is_none());
        assert_eq!(deck.slide(2).unwrap().number, 2);
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(matches!(Deck::from_markdown("\n\n"), Err(DeckError::Empty)));
        assert!(matches!(
            Deck::new(DeckMeta::default(), Vec::new()),
            Err(DeckError::Empty)
        ));
    }

    #[test]
    fn test_deck_may_open_with_separator() {
        let deck = Deck::from_markdown("---\n\nSlide one\n\n---\n\nSlide two").unwrap();
        assert_eq!(deck.len().get(), 2);
        assert_eq!(deck.meta(), &DeckMeta::default());

        let deck = Deck::from_markdown("---\n\n# One\n\nBody\n\n---\n\n# Two\n\nMore\n").unwrap();
        assert_eq!(deck.len().get(), 2);
        assert_eq!(deck.title_of(1), "One");
        assert_eq!(deck.slide(2).unwrap().body, "More");
    }

    #[test]
    fn test_title_strips_closing_hashes() {
        let slide = Slide::from_markdown(1, "## Market ##\nNumbers");
        assert_eq!(slide.title.as_deref(), Some("Market"));
        assert_eq!(slide.body, "Numbers");
    }

    #[test]
    fn test_h3_is_not_a_title() {
        let slide = Slide::from_markdown(2, "### Detail\nText");
        assert_eq!(slide.title, None);
        assert_eq!(slide.display_title(), "Slide 2");
    }

    #[test]
    fn test_summaries_truncate_body() {
        let long = "x".repeat(250);
        let deck = Deck::new(
            DeckMeta::default(),
            vec![
                (Some("Long".to_string()), long),
                (None, "short".to_string()),
            ],
        )
        .unwrap();
        let summaries = deck.summaries();
        assert_eq!(summaries[0].excerpt.chars().count(), 203);
        assert!(summaries[0].excerpt.ends_with("..."));
        assert_eq!(summaries[1].title, "Slide 2");
        assert_eq!(summaries[1].excerpt, "short...");
    }
}
