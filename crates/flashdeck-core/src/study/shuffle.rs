use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::deck::Flashcard;

/// Source of card orderings for [`super::StudySession::shuffle`].
///
/// Any `FnMut(&mut [Flashcard])` is a shuffler, so tests can pass a
/// closure that reverses or rotates the cards.
pub trait Shuffler {
    fn shuffle(&mut self, cards: &mut [Flashcard]);
}

impl<F> Shuffler for F
where
    F: FnMut(&mut [Flashcard]),
{
    fn shuffle(&mut self, cards: &mut [Flashcard]) {
        self(cards)
    }
}

/// Uniform shuffle using the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShuffler;

impl Shuffler for RandomShuffler {
    fn shuffle(&mut self, cards: &mut [Flashcard]) {
        cards.shuffle(&mut rand::thread_rng());
    }
}

/// Reproducible shuffle from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: Pcg64,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, cards: &mut [Flashcard]) {
        cards.shuffle(&mut self.rng);
    }
}
