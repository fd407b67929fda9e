//! AI flashcard generation.
//!
//! The core only depends on [`CardGenerator`]. [`OpenAiGenerator`] is the
//! production implementation over any OpenAI-compatible
//! `/chat/completions` endpoint.

mod openai;
mod parse;

pub use openai::OpenAiGenerator;
pub use parse::parse_cards_response;

use crate::deck::CardDraft;
use crate::error::GenerationError;

/// Smallest number of cards a generation request may ask for.
pub const MIN_GENERATE_COUNT: u32 = 1;
/// Largest number of cards a generation request may ask for.
pub const MAX_GENERATE_COUNT: u32 = 20;

/// Produces card drafts for a deck from its title and description.
///
/// `count` has already been checked against
/// [`MIN_GENERATE_COUNT`]..=[`MAX_GENERATE_COUNT`] by the caller.
pub trait CardGenerator {
    fn generate(
        &self,
        title: &str,
        description: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardDraft>, GenerationError>;
}

impl<G: CardGenerator + ?Sized> CardGenerator for Box<G> {
    fn generate(
        &self,
        title: &str,
        description: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardDraft>, GenerationError> {
        (**self).generate(title, description, count)
    }
}
