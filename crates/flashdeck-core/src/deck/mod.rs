//! Deck and card types.
//!
//! These mirror the rows stored by [`crate::storage::Database`]. Input
//! validation for user-supplied text lives here too, so the CLI and the
//! action layer reject the same things.

mod bulk;

pub use bulk::parse_bulk_cards;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum deck title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum deck description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A named collection of flashcards owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A deck row as shown on the dashboard, with its card count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub card_count: u64,
    pub created_at: DateTime<Utc>,
}

/// A front/back text pair belonging to exactly one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A card that has not been stored yet (bulk text, AI output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

impl CardDraft {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Trim both sides and reject blanks.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let front = self.front.trim();
        let back = self.back.trim();
        if front.is_empty() {
            return Err(ValidationError::invalid("front", "Front text is required"));
        }
        if back.is_empty() {
            return Err(ValidationError::invalid("back", "Back text is required"));
        }
        Ok(Self::new(front, back))
    }
}

/// Title and description for creating or renaming a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInput {
    pub title: String,
    pub description: Option<String>,
}

impl DeckInput {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    /// Trim, drop an empty description, and enforce the length limits.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::invalid("title", "Title is required"));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ValidationError::invalid(
                "title",
                format!("must be at most {TITLE_MAX_CHARS} characters"),
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(ref d) = description {
            if d.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(ValidationError::invalid(
                    "description",
                    format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
                ));
            }
        }

        Ok(Self { title, description })
    }
}
