//! Slide navigation for presentation front ends.
//!
//! [`navigator::Navigator`] is a bounds-checked state machine over a deck of
//! `N` slides with an auto-play interval. [`input::InputNormalizer`] turns
//! touch gestures, wheel bursts and key presses into navigation commands.
//! [`session::Session`] wires both together with the notification and help
//! state a UI draws on top of the slide.

pub mod deck;
pub mod error;
pub mod input;
pub mod navigator;
pub mod notice;
pub mod session;
pub mod timer;

pub use deck::{Deck, DeckMeta, Slide, SlideSummary};
pub use error::{DeckError, Edge, NavError};
pub use input::{GestureConfig, InputNormalizer, Intent, Key};
pub use navigator::{
    Applied, AutoPlayConfig, Command, Direction, Navigator, SlideChanged, SlideObserver, Snapshot,
};
pub use session::{Effect, InputEvent, Session, SessionConfig};
