//! `front ; back` bulk text import.

use super::CardDraft;
use crate::error::ValidationError;

/// Parse one card per non-blank line, split on the first `;`.
///
/// Lines with a missing or blank side are skipped. Errors only when no
/// line yields a card.
pub fn parse_bulk_cards(text: &str) -> Result<Vec<CardDraft>, ValidationError> {
    let cards: Vec<CardDraft> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (front, back) = line.split_once(';')?;
            CardDraft::new(front, back).validated().ok()
        })
        .collect();

    if cards.is_empty() {
        return Err(ValidationError::invalid(
            "cards",
            "No valid cards found. Use 'Front ; Back' format.",
        ));
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_skips_blanks() {
        let text = "Word 1 ; Translation 1\n\n  Word 2;Translation 2  \n";
        let cards = parse_bulk_cards(text).unwrap();
        assert_eq!(
            cards,
            vec![
                CardDraft::new("Word 1", "Translation 1"),
                CardDraft::new("Word 2", "Translation 2"),
            ]
        );
    }

    #[test]
    fn skips_lines_missing_a_side() {
        let text = "no separator here\nfront only ;\n ; back only\nok ; fine";
        let cards = parse_bulk_cards(text).unwrap();
        assert_eq!(cards, vec![CardDraft::new("ok", "fine")]);
    }

    #[test]
    fn keeps_later_semicolons_in_back() {
        let cards = parse_bulk_cards("a ; b ; c").unwrap();
        assert_eq!(cards[0].back, "b ; c");
    }

    #[test]
    fn windows_line_endings() {
        let cards = parse_bulk_cards("a;b\r\nc;d\r\n").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1], CardDraft::new("c", "d"));
    }

    #[test]
    fn nothing_valid_is_an_error() {
        assert!(parse_bulk_cards("\n  \njust text\n").is_err());
    }
}
