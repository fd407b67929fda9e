//! Caller identity and plan resolution.
//!
//! The action layer only needs `(user_id, tier)`. Where that comes from is
//! an [`IdentityProvider`]: the account written in `config.toml`, or the
//! demo guest, which is simply a provider that always answers `pro`.

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::quota::PlanTier;
use crate::storage::{AccountConfig, Database};

/// User id shared by every guest session.
pub const GUEST_USER_ID: &str = "guest_user_demo";

/// kv key holding the guest-mode flag.
pub const GUEST_MODE_KEY: &str = "guest_mode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub tier: PlanTier,
    #[serde(default)]
    pub is_guest: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, tier: PlanTier) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
            is_guest: false,
        }
    }

    pub fn guest() -> Self {
        Self {
            user_id: GUEST_USER_ID.to_string(),
            tier: PlanTier::Pro,
            is_guest: true,
        }
    }
}

/// Resolves who is calling. `None` means signed out.
pub trait IdentityProvider {
    fn resolve(&self) -> Option<Identity>;
}

/// A fixed identity.
impl IdentityProvider for Identity {
    fn resolve(&self) -> Option<Identity> {
        Some(self.clone())
    }
}

/// The local account from `config.toml`.
#[derive(Debug, Clone)]
pub struct ConfiguredIdentity {
    account: AccountConfig,
}

impl ConfiguredIdentity {
    pub fn new(account: AccountConfig) -> Self {
        Self { account }
    }
}

impl IdentityProvider for ConfiguredIdentity {
    fn resolve(&self) -> Option<Identity> {
        let user_id = self.account.user_id.as_deref()?.trim();
        if user_id.is_empty() {
            return None;
        }
        Some(Identity::new(user_id, self.account.plan))
    }
}

/// The demo guest, when guest mode is on.
#[derive(Debug, Clone, Copy)]
pub struct GuestIdentity {
    enabled: bool,
}

impl GuestIdentity {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Read the guest-mode flag from the kv store.
    pub fn from_db(db: &Database) -> Result<Self, DatabaseError> {
        Ok(Self::new(guest_mode_enabled(db)?))
    }
}

impl IdentityProvider for GuestIdentity {
    fn resolve(&self) -> Option<Identity> {
        self.enabled.then(Identity::guest)
    }
}

/// First provider that resolves wins.
#[derive(Default)]
pub struct ChainedIdentity {
    providers: Vec<Box<dyn IdentityProvider>>,
}

impl ChainedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Configured account first, then the guest.
    pub fn local(account: AccountConfig, db: &Database) -> Result<Self, DatabaseError> {
        Ok(Self::new()
            .with(ConfiguredIdentity::new(account))
            .with(GuestIdentity::from_db(db)?))
    }
}

impl IdentityProvider for ChainedIdentity {
    fn resolve(&self) -> Option<Identity> {
        self.providers.iter().find_map(|p| p.resolve())
    }
}

pub fn guest_mode_enabled(db: &Database) -> Result<bool, DatabaseError> {
    Ok(db.kv_get(GUEST_MODE_KEY)?.as_deref() == Some("true"))
}

pub fn set_guest_mode(db: &Database, enabled: bool) -> Result<(), DatabaseError> {
    if enabled {
        db.kv_set(GUEST_MODE_KEY, "true")
    } else {
        db.kv_delete(GUEST_MODE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(user_id: Option<&str>, plan: PlanTier) -> AccountConfig {
        AccountConfig {
            user_id: user_id.map(str::to_string),
            plan,
        }
    }

    #[test]
    fn configured_account_resolves_with_plan() {
        let id = ConfiguredIdentity::new(account(Some("user_1"), PlanTier::Pro))
            .resolve()
            .unwrap();
        assert_eq!(id, Identity::new("user_1", PlanTier::Pro));
    }

    #[test]
    fn blank_account_is_signed_out() {
        assert!(ConfiguredIdentity::new(account(Some("  "), PlanTier::Free))
            .resolve()
            .is_none());
        assert!(ConfiguredIdentity::new(account(None, PlanTier::Free))
            .resolve()
            .is_none());
    }

    #[test]
    fn guest_is_pro() {
        let guest = GuestIdentity::new(true).resolve().unwrap();
        assert_eq!(guest.user_id, GUEST_USER_ID);
        assert_eq!(guest.tier, PlanTier::Pro);
        assert!(guest.is_guest);
        assert!(GuestIdentity::new(false).resolve().is_none());
    }

    #[test]
    fn chain_prefers_configured_account() {
        let db = Database::open_in_memory().unwrap();
        set_guest_mode(&db, true).unwrap();

        let chain = ChainedIdentity::local(account(Some("me"), PlanTier::Free), &db).unwrap();
        assert_eq!(chain.resolve().unwrap().user_id, "me");

        let chain = ChainedIdentity::local(account(None, PlanTier::Free), &db).unwrap();
        assert!(chain.resolve().unwrap().is_guest);

        set_guest_mode(&db, false).unwrap();
        let chain = ChainedIdentity::local(account(None, PlanTier::Free), &db).unwrap();
        assert!(chain.resolve().is_none());
    }
}
