mod engine;
mod keys;
mod shuffle;

pub use engine::{StudySession, StudyState, Tally};
pub use keys::StudyKey;
pub use shuffle::{RandomShuffler, SeededShuffler, Shuffler};
