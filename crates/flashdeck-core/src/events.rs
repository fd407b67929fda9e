use serde::{Deserialize, Serialize};

use crate::study::{StudyState, Tally};

/// Every study session transition produces an Event.
/// A command that changes nothing returns `None` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        deck_id: Option<i64>,
        card_count: usize,
    },
    CardFlipped {
        index: usize,
        flipped: bool,
    },
    CardAdvanced {
        from_index: usize,
        to_index: usize,
    },
    CardRetreated {
        from_index: usize,
        to_index: usize,
    },
    CardGraded {
        index: usize,
        correct: bool,
        tally: Tally,
    },
    SessionFinished {
        tally: Tally,
    },
    SessionShuffled {
        card_count: usize,
    },
    SessionRestarted,
    StateSnapshot {
        state: StudyState,
        index: usize,
        position: usize,
        total: usize,
        flipped: bool,
        front: Option<String>,
        back: Option<String>,
        tally: Tally,
    },
}
