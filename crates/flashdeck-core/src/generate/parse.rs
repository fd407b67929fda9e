use serde::Deserialize;

use crate::deck::CardDraft;
use crate::error::GenerationError;

#[derive(Debug, Deserialize)]
struct CardsPayload {
    cards: Vec<RawCard>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    front: String,
    back: String,
}

/// Turn model output into at most `limit` card drafts.
///
/// Accepts the JSON object bare or wrapped in a Markdown code fence.
/// Entries with a blank side are dropped.
pub fn parse_cards_response(content: &str, limit: usize) -> Result<Vec<CardDraft>, GenerationError> {
    if content.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let cleaned = strip_code_fences(content);
    let payload: CardsPayload = serde_json::from_str(cleaned.trim())
        .map_err(|e| GenerationError::InvalidFormat(e.to_string()))?;

    let cards: Vec<CardDraft> = payload
        .cards
        .into_iter()
        .filter_map(|raw| CardDraft::new(raw.front, raw.back).validated().ok())
        .take(limit)
        .collect();

    if cards.is_empty() {
        return Err(GenerationError::NoCards);
    }
    Ok(cards)
}

fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json\r\n", "")
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let cards = parse_cards_response(
            r#"{"cards":[{"front":"Dog","back":"Anjing"},{"front":"Cat","back":"Kucing"}]}"#,
            20,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1], CardDraft::new("Cat", "Kucing"));
    }

    #[test]
    fn strips_markdown_fences() {
        let content = "```json\n{\"cards\":[{\"front\":\"Q\",\"back\":\"A\"}]}\n```";
        let cards = parse_cards_response(content, 20).unwrap();
        assert_eq!(cards, vec![CardDraft::new("Q", "A")]);
    }

    #[test]
    fn truncates_to_limit() {
        let content = r#"{"cards":[{"front":"1","back":"a"},{"front":"2","back":"b"},{"front":"3","back":"c"}]}"#;
        assert_eq!(parse_cards_response(content, 2).unwrap().len(), 2);
    }

    #[test]
    fn drops_blank_cards() {
        let content = r#"{"cards":[{"front":"","back":"a"},{"front":"ok","back":"fine"}]}"#;
        assert_eq!(
            parse_cards_response(content, 20).unwrap(),
            vec![CardDraft::new("ok", "fine")]
        );
    }

    #[test]
    fn empty_content_is_empty_response() {
        assert!(matches!(
            parse_cards_response("  \n", 20),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn prose_is_invalid_format() {
        assert!(matches!(
            parse_cards_response("Sure! Here are some cards:", 20),
            Err(GenerationError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_cards_response(r#"{"items":[]}"#, 20),
            Err(GenerationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn empty_card_list_is_no_cards() {
        assert!(matches!(
            parse_cards_response(r#"{"cards":[]}"#, 20),
            Err(GenerationError::NoCards)
        ));
    }
}
