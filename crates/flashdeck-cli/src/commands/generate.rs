use flashdeck_core::generate::{CardGenerator, OpenAiGenerator};
use flashdeck_core::storage::AiConfig;
use flashdeck_core::{CardDraft, GenerationError};

use super::{print_json, CmdResult, Context};

/// Builds the HTTP client only once the action layer asks for cards, so
/// plan and ownership errors are reported before a missing API key.
struct ConfiguredGenerator<'a> {
    config: &'a AiConfig,
}

impl CardGenerator for ConfiguredGenerator<'_> {
    fn generate(
        &self,
        title: &str,
        description: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardDraft>, GenerationError> {
        let generator = OpenAiGenerator::from_config(self.config)?;
        tracing::debug!(model = generator.model(), count, "requesting cards");
        generator.generate(title, description, count)
    }
}

pub fn run(deck_id: i64, count: Option<u32>) -> CmdResult {
    let ctx = Context::load()?;
    let count = count.unwrap_or(ctx.config.ai.default_count);
    let generator = ConfiguredGenerator {
        config: &ctx.config.ai,
    };

    let cards = ctx.actions().generate_cards(deck_id, count, &generator)?;
    print_json(&serde_json::json!({ "added": cards.len(), "cards": cards }))?;
    Ok(())
}
