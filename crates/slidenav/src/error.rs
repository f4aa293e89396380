//! Error types for deck loading and slide navigation.

use thiserror::Error;

/// Which end of the deck a directional command ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "first"),
            Self::End => write!(f, "last"),
        }
    }
}

/// Navigation failures. None of these are fatal; the worst outcome is an
/// unchanged or stale display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// `Next` on the last slide or `Previous` on the first one.
    #[error("already at the {edge} slide")]
    AtBoundary { edge: Edge },

    /// `GoTo` with a target outside `1..=total`.
    #[error("slide {target} is out of range (deck has {total} slides)")]
    OutOfRange { target: usize, total: usize },

    /// A rendering observer could not find the slide it was asked to show.
    /// The navigator has already committed the new position.
    #[error("no slide element to display for position {position}")]
    NoTargetElement { position: usize },
}

/// Failures while building a deck.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("deck contains no slides")]
    Empty,

    #[error("failed to read deck: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}
