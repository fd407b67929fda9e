use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keyboard shortcuts understood by [`super::StudySession::handle_key`].
///
/// | Key                         | Unflipped  | Flipped           |
/// |-----------------------------|------------|-------------------|
/// | Space, ArrowUp, ArrowDown   | flip       | flip              |
/// | ArrowLeft                   | previous   | grade incorrect   |
/// | ArrowRight                  | next       | grade correct     |
/// | `1`                         | -          | grade incorrect   |
/// | `2`                         | -          | grade correct     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyKey {
    Flip,
    Left,
    Right,
    MarkIncorrect,
    MarkCorrect,
}

impl FromStr for StudyKey {
    type Err = String;

    /// Accepts browser `KeyboardEvent.key` names and short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(StudyKey::Flip);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "space" | "spacebar" | "arrowup" | "arrowdown" | "up" | "down" | "flip" => {
                Ok(StudyKey::Flip)
            }
            "arrowleft" | "left" => Ok(StudyKey::Left),
            "arrowright" | "right" => Ok(StudyKey::Right),
            "1" => Ok(StudyKey::MarkIncorrect),
            "2" => Ok(StudyKey::MarkCorrect),
            other => Err(format!("unknown study key: {other:?}")),
        }
    }
}

impl fmt::Display for StudyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StudyKey::Flip => "Space",
            StudyKey::Left => "ArrowLeft",
            StudyKey::Right => "ArrowRight",
            StudyKey::MarkIncorrect => "1",
            StudyKey::MarkCorrect => "2",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_key_names() {
        assert_eq!(" ".parse::<StudyKey>().unwrap(), StudyKey::Flip);
        assert_eq!("Spacebar".parse::<StudyKey>().unwrap(), StudyKey::Flip);
        assert_eq!("ArrowUp".parse::<StudyKey>().unwrap(), StudyKey::Flip);
        assert_eq!("ArrowDown".parse::<StudyKey>().unwrap(), StudyKey::Flip);
        assert_eq!("ArrowLeft".parse::<StudyKey>().unwrap(), StudyKey::Left);
        assert_eq!("right".parse::<StudyKey>().unwrap(), StudyKey::Right);
        assert_eq!("1".parse::<StudyKey>().unwrap(), StudyKey::MarkIncorrect);
        assert_eq!("2".parse::<StudyKey>().unwrap(), StudyKey::MarkCorrect);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!("3".parse::<StudyKey>().is_err());
        assert!("Enter".parse::<StudyKey>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for key in [
            StudyKey::Flip,
            StudyKey::Left,
            StudyKey::Right,
            StudyKey::MarkIncorrect,
            StudyKey::MarkCorrect,
        ] {
            assert_eq!(key.to_string().parse::<StudyKey>().unwrap(), key);
        }
    }
}
