//! Plan-gated quota policy.
//!
//! A pure decision over `(tier, action, current deck count)`. The policy
//! never errors and never touches storage: the caller fetches the deck
//! count first and turns a denied [`QuotaDecision`] into an error or UI
//! state itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of decks a free account may own.
pub const FREE_DECK_LIMIT: u64 = 3;

pub const DECK_LIMIT_REASON: &str = "deck limit reached for free plan";
pub const BULK_ADD_REASON: &str = "bulk adding is a pro feature";
pub const AI_GENERATE_REASON: &str = "AI generation is a pro feature";

/// Subscription level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            other => Err(format!("unknown plan: {other} (expected 'free' or 'pro')")),
        }
    }
}

/// Mutating operations that are gated by plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaAction {
    CreateDeck,
    BulkAddCards,
    AiGenerate,
}

impl QuotaAction {
    pub const ALL: [QuotaAction; 3] = [
        QuotaAction::CreateDeck,
        QuotaAction::BulkAddCards,
        QuotaAction::AiGenerate,
    ];
}

/// Outcome of evaluating one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl QuotaDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Tier rules. `free_deck_limit` is the only tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    pub free_deck_limit: u64,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            free_deck_limit: FREE_DECK_LIMIT,
        }
    }
}

impl QuotaPolicy {
    pub fn new(free_deck_limit: u64) -> Self {
        Self { free_deck_limit }
    }

    /// Decide whether `action` is permitted.
    ///
    /// `current_deck_count` only matters for [`QuotaAction::CreateDeck`].
    pub fn evaluate(
        &self,
        tier: PlanTier,
        action: QuotaAction,
        current_deck_count: u64,
    ) -> QuotaDecision {
        match (tier, action) {
            (PlanTier::Pro, _) => QuotaDecision::allow(),
            (PlanTier::Free, QuotaAction::CreateDeck) => {
                if current_deck_count < self.free_deck_limit {
                    QuotaDecision::allow()
                } else {
                    QuotaDecision::deny(DECK_LIMIT_REASON)
                }
            }
            (PlanTier::Free, QuotaAction::BulkAddCards) => QuotaDecision::deny(BULK_ADD_REASON),
            (PlanTier::Free, QuotaAction::AiGenerate) => QuotaDecision::deny(AI_GENERATE_REASON),
        }
    }
}

/// Evaluate with the default limits.
pub fn evaluate(tier: PlanTier, action: QuotaAction, current_deck_count: u64) -> QuotaDecision {
    QuotaPolicy::default().evaluate(tier, action, current_deck_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_deck_limit_boundary() {
        assert!(evaluate(PlanTier::Free, QuotaAction::CreateDeck, 0).allowed);
        assert!(evaluate(PlanTier::Free, QuotaAction::CreateDeck, 2).allowed);
        let denied = evaluate(PlanTier::Free, QuotaAction::CreateDeck, 3);
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some(DECK_LIMIT_REASON));
    }

    #[test]
    fn pro_is_unlimited() {
        for action in QuotaAction::ALL {
            assert_eq!(evaluate(PlanTier::Pro, action, 999), QuotaDecision::allow());
        }
    }

    #[test]
    fn free_cannot_use_pro_features() {
        let bulk = evaluate(PlanTier::Free, QuotaAction::BulkAddCards, 0);
        assert_eq!(bulk, QuotaDecision::deny(BULK_ADD_REASON));
        let ai = evaluate(PlanTier::Free, QuotaAction::AiGenerate, 0);
        assert_eq!(ai, QuotaDecision::deny(AI_GENERATE_REASON));
    }

    #[test]
    fn custom_limit() {
        let policy = QuotaPolicy::new(5);
        assert!(policy.evaluate(PlanTier::Free, QuotaAction::CreateDeck, 4).allowed);
        assert!(!policy.evaluate(PlanTier::Free, QuotaAction::CreateDeck, 5).allowed);
    }

    #[test]
    fn tier_parse_and_display() {
        assert_eq!("PRO".parse::<PlanTier>().unwrap(), PlanTier::Pro);
        assert_eq!(" free ".parse::<PlanTier>().unwrap(), PlanTier::Free);
        assert!("enterprise".parse::<PlanTier>().is_err());
        assert_eq!(PlanTier::Pro.to_string(), "pro");
    }

    #[test]
    fn decision_serializes_without_null_reason() {
        let json = serde_json::to_string(&QuotaDecision::allow()).unwrap();
        assert_eq!(json, r#"{"allowed":true}"#);
    }
}
