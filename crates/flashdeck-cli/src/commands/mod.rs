pub mod auth;
pub mod card;
pub mod config;
pub mod deck;
pub mod generate;
pub mod plan;
pub mod study;

use serde::Serialize;

use flashdeck_core::identity::ChainedIdentity;
use flashdeck_core::{Actions, Config, CoreError, Database};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs: the database, the config and who is calling.
pub struct Context {
    pub db: Database,
    pub config: Config,
    identity: ChainedIdentity,
}

impl Context {
    pub fn load() -> Result<Self, CoreError> {
        let config = Config::load()?;
        let db = Database::open()?;
        let identity = ChainedIdentity::local(config.account.clone(), &db)?;
        Ok(Self {
            db,
            config,
            identity,
        })
    }

    pub fn actions(&self) -> Actions<'_> {
        Actions::new(&self.db, &self.identity, self.config.quota_policy())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
