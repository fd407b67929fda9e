//! User-facing operations.
//!
//! Every mutating action follows the same order: resolve the caller, check
//! the plan quota where the action is gated, validate input, check deck
//! ownership, then write. Read actions skip the quota step.

use serde::{Deserialize, Serialize};

use crate::deck::{parse_bulk_cards, CardDraft, Deck, DeckInput, DeckSummary, Flashcard};
use crate::error::{CoreError, Result, ValidationError};
use crate::generate::{CardGenerator, MAX_GENERATE_COUNT, MIN_GENERATE_COUNT};
use crate::identity::{Identity, IdentityProvider};
use crate::quota::{PlanTier, QuotaAction, QuotaDecision, QuotaPolicy};
use crate::storage::Database;
use crate::study::{Shuffler, StudySession};

/// kv key prefix for saved study sessions; the caller's user id is appended.
pub const STUDY_SESSION_KEY: &str = "study_session";

fn study_session_key(who: &Identity) -> String {
    format!("{STUDY_SESSION_KEY}:{}", who.user_id)
}

/// Quota outcome for one action, as reported by [`Actions::plan_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub action: QuotaAction,
    #[serde(flatten)]
    pub decision: QuotaDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatus {
    pub user_id: String,
    pub tier: PlanTier,
    pub is_guest: bool,
    pub deck_count: u64,
    /// `None` when the tier has no deck limit.
    pub deck_limit: Option<u64>,
    pub actions: Vec<ActionStatus>,
}

pub struct Actions<'a> {
    db: &'a Database,
    identity: &'a dyn IdentityProvider,
    policy: QuotaPolicy,
}

impl<'a> Actions<'a> {
    pub fn new(db: &'a Database, identity: &'a dyn IdentityProvider, policy: QuotaPolicy) -> Self {
        Self {
            db,
            identity,
            policy,
        }
    }

    /// The signed-in caller.
    ///
    /// # Errors
    /// Returns [`CoreError::Unauthorized`] when nobody is signed in.
    pub fn whoami(&self) -> Result<Identity> {
        self.identity.resolve().ok_or(CoreError::Unauthorized)
    }

    fn evaluate(&self, who: &Identity, action: QuotaAction) -> Result<QuotaDecision> {
        let deck_count = match action {
            QuotaAction::CreateDeck => self.db.count_decks_for_user(&who.user_id)?,
            _ => 0,
        };
        Ok(self.policy.evaluate(who.tier, action, deck_count))
    }

    fn ensure_allowed(&self, who: &Identity, action: QuotaAction) -> Result<()> {
        let decision = self.evaluate(who, action)?;
        if decision.allowed {
            return Ok(());
        }
        let reason = decision.reason.unwrap_or_else(|| "not allowed on this plan".into());
        tracing::warn!(user_id = %who.user_id, tier = %who.tier, ?action, %reason, "quota denied");
        Err(CoreError::QuotaDenied { reason })
    }

    fn owned_deck(&self, who: &Identity, deck_id: i64) -> Result<Deck> {
        self.db
            .get_deck(deck_id, &who.user_id)?
            .ok_or(CoreError::NotFound {
                entity: "deck",
                id: deck_id,
            })
    }

    fn owned_card(&self, who: &Identity, card_id: i64) -> Result<Flashcard> {
        let not_found = CoreError::NotFound {
            entity: "card",
            id: card_id,
        };
        let Some(card) = self.db.get_card(card_id)? else {
            return Err(not_found);
        };
        if self.db.get_deck(card.deck_id, &who.user_id)?.is_none() {
            return Err(not_found);
        }
        Ok(card)
    }

    // ── Plan ─────────────────────────────────────────────────────────

    pub fn plan_status(&self) -> Result<PlanStatus> {
        let who = self.whoami()?;
        let deck_count = self.db.count_decks_for_user(&who.user_id)?;
        let actions = QuotaAction::ALL
            .into_iter()
            .map(|action| ActionStatus {
                action,
                decision: self.policy.evaluate(who.tier, action, deck_count),
            })
            .collect();
        Ok(PlanStatus {
            deck_limit: match who.tier {
                PlanTier::Free => Some(self.policy.free_deck_limit),
                PlanTier::Pro => None,
            },
            user_id: who.user_id,
            tier: who.tier,
            is_guest: who.is_guest,
            deck_count,
            actions,
        })
    }

    // ── Decks ────────────────────────────────────────────────────────

    pub fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        let who = self.whoami()?;
        Ok(self.db.list_decks_for_user(&who.user_id)?)
    }

    pub fn get_deck(&self, deck_id: i64) -> Result<Deck> {
        let who = self.whoami()?;
        self.owned_deck(&who, deck_id)
    }

    pub fn create_deck(&self, input: DeckInput) -> Result<Deck> {
        let who = self.whoami()?;
        self.ensure_allowed(&who, QuotaAction::CreateDeck)?;
        let input = input.validated()?;
        let deck = self.db.create_deck(&who.user_id, &input)?;
        tracing::info!(user_id = %who.user_id, deck_id = deck.id, "deck created");
        Ok(deck)
    }

    pub fn update_deck(&self, deck_id: i64, input: DeckInput) -> Result<Deck> {
        let who = self.whoami()?;
        let input = input.validated()?;
        let deck = self
            .db
            .update_deck(deck_id, &who.user_id, &input)?
            .ok_or(CoreError::NotFound {
                entity: "deck",
                id: deck_id,
            })?;
        tracing::info!(user_id = %who.user_id, deck_id, "deck updated");
        Ok(deck)
    }

    pub fn delete_deck(&self, deck_id: i64) -> Result<()> {
        let who = self.whoami()?;
        if !self.db.delete_deck(deck_id, &who.user_id)? {
            return Err(CoreError::NotFound {
                entity: "deck",
                id: deck_id,
            });
        }
        tracing::info!(user_id = %who.user_id, deck_id, "deck deleted");
        Ok(())
    }

    // ── Cards ────────────────────────────────────────────────────────

    pub fn list_cards(&self, deck_id: i64) -> Result<Vec<Flashcard>> {
        let who = self.whoami()?;
        self.owned_deck(&who, deck_id)?;
        Ok(self.db.list_cards(deck_id)?)
    }

    pub fn create_card(&self, deck_id: i64, draft: CardDraft) -> Result<Flashcard> {
        let who = self.whoami()?;
        let draft = draft.validated()?;
        self.owned_deck(&who, deck_id)?;
        let card = self.db.create_card(deck_id, &draft)?;
        tracing::info!(deck_id, card_id = card.id, "card created");
        Ok(card)
    }

    pub fn update_card(&self, card_id: i64, draft: CardDraft) -> Result<Flashcard> {
        let who = self.whoami()?;
        let draft = draft.validated()?;
        self.owned_card(&who, card_id)?;
        let card = self
            .db
            .update_card(card_id, &draft)?
            .ok_or(CoreError::NotFound {
                entity: "card",
                id: card_id,
            })?;
        tracing::info!(card_id, "card updated");
        Ok(card)
    }

    pub fn delete_card(&self, card_id: i64) -> Result<()> {
        let who = self.whoami()?;
        self.owned_card(&who, card_id)?;
        self.db.delete_card(card_id)?;
        tracing::info!(card_id, "card deleted");
        Ok(())
    }

    /// Add every `front ; back` line of `text` to a deck. Pro only.
    pub fn bulk_add_cards(&self, deck_id: i64, text: &str) -> Result<Vec<Flashcard>> {
        let who = self.whoami()?;
        self.ensure_allowed(&who, QuotaAction::BulkAddCards)?;
        let drafts = parse_bulk_cards(text)?;
        self.owned_deck(&who, deck_id)?;
        let cards = self.db.bulk_create_cards(deck_id, &drafts)?;
        tracing::info!(deck_id, count = cards.len(), "cards bulk added");
        Ok(cards)
    }

    /// Generate `count` cards for a deck with `generator` and store them. Pro only.
    pub fn generate_cards(
        &self,
        deck_id: i64,
        count: u32,
        generator: &dyn CardGenerator,
    ) -> Result<Vec<Flashcard>> {
        let who = self.whoami()?;
        self.ensure_allowed(&who, QuotaAction::AiGenerate)?;
        if !(MIN_GENERATE_COUNT..=MAX_GENERATE_COUNT).contains(&count) {
            return Err(ValidationError::OutOfBounds {
                field: "count".into(),
                value: count as i64,
                min: MIN_GENERATE_COUNT as i64,
                max: MAX_GENERATE_COUNT as i64,
            }
            .into());
        }
        let deck = self.owned_deck(&who, deck_id)?;

        let drafts = generator
            .generate(&deck.title, deck.description.as_deref(), count)
            .inspect_err(|e| tracing::warn!(deck_id, error = %e, "AI generation failed"))?;
        let cards = self.db.bulk_create_cards(deck_id, &drafts)?;
        tracing::info!(deck_id, count = cards.len(), "AI cards added");
        Ok(cards)
    }

    // ── Study ────────────────────────────────────────────────────────

    /// Begin a study pass over a deck, optionally shuffled.
    ///
    /// # Errors
    /// Returns a [`crate::SessionError::EmptyInput`] when the deck has no cards.
    pub fn start_study(
        &self,
        deck_id: i64,
        shuffler: Option<&mut dyn Shuffler>,
    ) -> Result<StudySession> {
        let cards = self.list_cards(deck_id)?;
        let mut session = StudySession::new(cards)?;
        if let Some(shuffler) = shuffler {
            session.shuffle(shuffler);
        }
        tracing::debug!(deck_id, cards = session.len(), "study session started");
        Ok(session)
    }

    /// Save the caller's study session, replacing any earlier one.
    pub fn save_study_session(&self, session: &StudySession) -> Result<()> {
        let who = self.whoami()?;
        let json = serde_json::to_string(session)?;
        self.db.kv_set(&study_session_key(&who), &json)?;
        Ok(())
    }

    /// The caller's saved study session, if any.
    ///
    /// The session's deck must still belong to the caller. A session whose
    /// deck is gone is discarded and reported as [`CoreError::NotFound`].
    pub fn load_study_session(&self) -> Result<Option<StudySession>> {
        let who = self.whoami()?;
        let key = study_session_key(&who);
        let Some(json) = self.db.kv_get(&key)? else {
            return Ok(None);
        };
        let session: StudySession = serde_json::from_str(&json)?;
        if let Some(deck_id) = session.deck_id() {
            if let Err(e) = self.owned_deck(&who, deck_id) {
                self.db.kv_delete(&key)?;
                tracing::info!(deck_id, "discarded study session for a missing deck");
                return Err(e);
            }
        }
        Ok(Some(session))
    }

    pub fn clear_study_session(&self) -> Result<()> {
        let who = self.whoami()?;
        self.db.kv_delete(&study_session_key(&who))?;
        Ok(())
    }
}
