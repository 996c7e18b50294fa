pub mod cache;
pub mod client;
pub mod config;
pub mod converters;
pub mod editor;
pub mod errors;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod models;
pub mod selection;
pub mod session;
pub mod wasm;

pub use cache::{resolve_initial_deck, DeckCache, MemoryCache, NavigationState};
pub use client::PresentationClient;
pub use config::EditorConfig;
pub use converters::markdown;
pub use editor::{Command, CommandOutcome, Editor};
pub use errors::{EditorError, Result};
pub use layout::{resolve_layout, LayoutRegime, LayoutResolver};
pub use models::deck::Deck;
pub use session::EditorSession;

// features
#[cfg(feature = "diff")]
pub mod diff;
#[cfg(feature = "diff")]
pub use diff::comparer::ComparerBuilder;
