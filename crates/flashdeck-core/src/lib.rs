//! # Flashdeck Core Library
//!
//! This library provides the core logic for the Flashdeck flashcard app.
//! Every operation is available through the standalone `flashdeck` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Study engine**: A pure state machine that walks a card sequence with
//!   flip, navigation, grading, shuffle and restart, emitting an [`Event`]
//!   for every transition
//! - **Quota policy**: Pure plan rules deciding which actions a free or pro
//!   user may take
//! - **Storage**: SQLite persistence for decks and cards, TOML configuration
//! - **Generation**: AI card generation over an OpenAI-compatible API
//! - **Actions**: Identity, quota, validation and ownership checks composed
//!   in front of storage
//!
//! ## Key Components
//!
//! - [`StudySession`]: Study state machine
//! - [`QuotaPolicy`]: Plan quota rules
//! - [`Database`]: Deck and card persistence
//! - [`Config`]: Application configuration management
//! - [`Actions`]: User-facing operations

pub mod actions;
pub mod credentials;
pub mod deck;
pub mod error;
pub mod events;
pub mod generate;
pub mod identity;
pub mod quota;
pub mod storage;
pub mod study;

pub use actions::{ActionStatus, Actions, PlanStatus};
pub use deck::{parse_bulk_cards, CardDraft, Deck, DeckInput, DeckSummary, Flashcard};
pub use error::{
    ConfigError, CoreError, DatabaseError, GenerationError, SessionError, ValidationError,
};
pub use events::Event;
pub use generate::{CardGenerator, OpenAiGenerator};
pub use identity::{ChainedIdentity, Identity, IdentityProvider};
pub use quota::{PlanTier, QuotaAction, QuotaDecision, QuotaPolicy};
pub use storage::{Config, Database};
pub use study::{
    RandomShuffler, SeededShuffler, Shuffler, StudyKey, StudySession, StudyState, Tally,
};
