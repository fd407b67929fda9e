use clap::Subcommand;
use flashdeck_core::DeckInput;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum DeckAction {
    /// List your decks with card counts
    List,
    /// Create a deck
    Create {
        /// Deck title (1-100 characters)
        title: String,
        /// Optional description (up to 500 characters)
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a deck and its cards
    Show {
        /// Deck ID
        id: i64,
    },
    /// Change a deck's title or description
    Update {
        /// Deck ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description (pass "" to clear)
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a deck and all of its cards
    Delete {
        /// Deck ID
        id: i64,
    },
}

pub fn run(action: DeckAction) -> CmdResult {
    let ctx = Context::load()?;
    let actions = ctx.actions();

    match action {
        DeckAction::List => {
            print_json(&actions.list_decks()?)?;
        }
        DeckAction::Create { title, description } => {
            let deck = actions.create_deck(DeckInput::new(title, description))?;
            print_json(&deck)?;
        }
        DeckAction::Show { id } => {
            let deck = actions.get_deck(id)?;
            let cards = actions.list_cards(id)?;
            print_json(&serde_json::json!({ "deck": deck, "cards": cards }))?;
        }
        DeckAction::Update {
            id,
            title,
            description,
        } => {
            let current = actions.get_deck(id)?;
            let input = DeckInput::new(
                title.unwrap_or(current.title),
                description.or(current.description),
            );
            print_json(&actions.update_deck(id, input)?)?;
        }
        DeckAction::Delete { id } => {
            actions.delete_deck(id)?;
            print_json(&serde_json::json!({ "deleted": id }))?;
        }
    }
    Ok(())
}
