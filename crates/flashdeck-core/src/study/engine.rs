//! Study session engine.
//!
//! One `StudySession` drives one pass over a fixed set of cards. It is a
//! plain in-memory state machine: no I/O, no clock, no logging. Each
//! command returns `Some(Event)` when it changed the session and `None`
//! when it was a no-op.
//!
//! ## State Transitions
//!
//! ```text
//! Active(0, unflipped) -> Active(i, flipped?) -> Finished(tally)
//!          ^                                          |
//!          +------------- restart / shuffle ----------+
//! ```
//!
//! `Finished` is only reachable by advancing (or grading) while on the
//! last card. Once finished, navigation and grading do nothing until the
//! session is restarted or shuffled.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = StudySession::new(cards)?;
//! session.flip();
//! session.grade(true);
//! // ...
//! if let Some(tally) = session.summary() { /* show results */ }
//! ```

use serde::{Deserialize, Serialize};

use super::keys::StudyKey;
use super::shuffle::Shuffler;
use crate::deck::Flashcard;
use crate::error::SessionError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyState {
    Active,
    Finished,
}

/// Running count of graded cards for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub incorrect: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// 0.0 .. 100.0 share of graded cards marked correct.
    pub fn accuracy_pct(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    #[serde(default)]
    deck_id: Option<i64>,
    /// Cards in the order they were supplied. Shuffles start from here.
    original: Vec<Flashcard>,
    /// Cards in study order.
    cards: Vec<Flashcard>,
    state: StudyState,
    index: usize,
    flipped: bool,
    tally: Tally,
}

impl StudySession {
    /// Start a pass over `cards` in the given order.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyInput`] if `cards` is empty.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, SessionError> {
        if cards.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        Ok(Self {
            deck_id: cards.first().map(|c| c.deck_id),
            original: cards.clone(),
            cards,
            state: StudyState::Active,
            index: 0,
            flipped: false,
            tally: Tally::default(),
        })
    }

    /// Replace the card set and return to the initial state.
    ///
    /// On error the session is left untouched.
    pub fn initialize(&mut self, cards: Vec<Flashcard>) -> Result<Event, SessionError> {
        *self = Self::new(cards)?;
        Ok(Event::SessionStarted {
            deck_id: self.deck_id,
            card_count: self.cards.len(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> StudyState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == StudyState::Finished
    }

    pub fn deck_id(&self) -> Option<i64> {
        self.deck_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in current study order.
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// The card being studied.
    ///
    /// # Errors
    /// Returns [`SessionError::OutOfRange`] once the session is finished.
    pub fn current_card(&self) -> Result<&Flashcard, SessionError> {
        let out_of_range = SessionError::OutOfRange {
            index: self.index,
            len: self.cards.len(),
        };
        if self.is_finished() {
            return Err(out_of_range);
        }
        self.cards.get(self.index).ok_or(out_of_range)
    }

    /// `(position, total)` for display, 1-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    /// Final tally, available only once the pass is finished.
    pub fn summary(&self) -> Option<Tally> {
        match self.state {
            StudyState::Finished => Some(self.tally),
            StudyState::Active => None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let card = self.current_card().ok();
        let (position, total) = self.progress();
        Event::StateSnapshot {
            state: self.state,
            index: self.index,
            position,
            total,
            flipped: self.flipped,
            front: card.map(|c| c.front.clone()),
            back: card
                .filter(|_| self.flipped)
                .map(|c| c.back.clone()),
            tally: self.tally,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle the reveal state of the current card.
    pub fn flip(&mut self) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        self.flipped = !self.flipped;
        Some(Event::CardFlipped {
            index: self.index,
            flipped: self.flipped,
        })
    }

    /// Move to the next card without grading.
    ///
    /// On the last card this finishes the session, flipped or not.
    pub fn advance(&mut self) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        self.flipped = false;
        if self.index + 1 >= self.cards.len() {
            self.state = StudyState::Finished;
            return Some(Event::SessionFinished { tally: self.tally });
        }
        let from = self.index;
        self.index += 1;
        Some(Event::CardAdvanced {
            from_index: from,
            to_index: self.index,
        })
    }

    /// Move back one card. No-op on the first card.
    pub fn retreat(&mut self) -> Option<Event> {
        if self.is_finished() || self.index == 0 {
            return None;
        }
        let from = self.index;
        self.index -= 1;
        self.flipped = false;
        Some(Event::CardRetreated {
            from_index: from,
            to_index: self.index,
        })
    }

    /// Record a grade for the current card, then advance.
    ///
    /// The card does not have to be flipped first; callers that want to
    /// insist on a reveal check [`is_flipped`](Self::is_flipped) (as
    /// [`handle_key`](Self::handle_key) does). Grading the last card
    /// returns `SessionFinished` carrying the final tally.
    pub fn grade(&mut self, correct: bool) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        let index = self.index;
        if correct {
            self.tally.correct += 1;
        } else {
            self.tally.incorrect += 1;
        }
        match self.advance() {
            Some(finished @ Event::SessionFinished { .. }) => Some(finished),
            _ => Some(Event::CardGraded {
                index,
                correct,
                tally: self.tally,
            }),
        }
    }

    /// Reorder the full original card set and start over.
    pub fn shuffle<S: Shuffler + ?Sized>(&mut self, shuffler: &mut S) -> Option<Event> {
        let mut cards = self.original.clone();
        shuffler.shuffle(&mut cards);
        self.cards = cards;
        self.reset_progress();
        Some(Event::SessionShuffled {
            card_count: self.cards.len(),
        })
    }

    /// Start over in the current order.
    pub fn restart(&mut self) -> Option<Event> {
        self.reset_progress();
        Some(Event::SessionRestarted)
    }

    /// Apply a keyboard shortcut. Ignored once finished.
    pub fn handle_key(&mut self, key: StudyKey) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        match key {
            StudyKey::Flip => self.flip(),
            StudyKey::Left if self.flipped => self.grade(false),
            StudyKey::Left => self.retreat(),
            StudyKey::Right if self.flipped => self.grade(true),
            StudyKey::Right => self.advance(),
            StudyKey::MarkIncorrect if self.flipped => self.grade(false),
            StudyKey::MarkCorrect if self.flipped => self.grade(true),
            StudyKey::MarkIncorrect | StudyKey::MarkCorrect => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_progress(&mut self) {
        self.state = StudyState::Active;
        self.index = 0;
        self.flipped = false;
        self.tally = Tally::default();
    }
}
