use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;
use flashdeck_core::CardDraft;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum CardAction {
    /// List the cards in a deck
    List {
        /// Deck ID
        deck_id: i64,
    },
    /// Add one card to a deck
    Add {
        /// Deck ID
        deck_id: i64,
        /// Front (question) text
        front: String,
        /// Back (answer) text
        back: String,
    },
    /// Replace a card's front and back
    Update {
        /// Card ID
        id: i64,
        front: String,
        back: String,
    },
    /// Delete a card
    Delete {
        /// Card ID
        id: i64,
    },
    /// Add many cards from "front ; back" lines (pro)
    Bulk {
        /// Deck ID
        deck_id: i64,
        /// Read lines from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

pub fn run(action: CardAction) -> CmdResult {
    let ctx = Context::load()?;
    let actions = ctx.actions();

    match action {
        CardAction::List { deck_id } => {
            print_json(&actions.list_cards(deck_id)?)?;
        }
        CardAction::Add {
            deck_id,
            front,
            back,
        } => {
            print_json(&actions.create_card(deck_id, CardDraft::new(front, back))?)?;
        }
        CardAction::Update { id, front, back } => {
            print_json(&actions.update_card(id, CardDraft::new(front, back))?)?;
        }
        CardAction::Delete { id } => {
            actions.delete_card(id)?;
            print_json(&serde_json::json!({ "deleted": id }))?;
        }
        CardAction::Bulk { deck_id, file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let cards = actions.bulk_add_cards(deck_id, &text)?;
            print_json(&serde_json::json!({ "added": cards.len(), "cards": cards }))?;
        }
    }
    Ok(())
}
