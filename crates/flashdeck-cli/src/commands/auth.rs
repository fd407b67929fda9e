use clap::Subcommand;
use flashdeck_core::credentials;
use flashdeck_core::identity::{set_guest_mode, Identity};
use flashdeck_core::{Config, Database, PlanTier};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in as a local account
    Login {
        /// Account user ID
        user_id: String,
        /// Plan for this account
        #[arg(long, default_value = "free")]
        plan: PlanTier,
    },
    /// Sign out of the local account and guest mode
    Logout,
    /// Sign in as the demo guest (pro features enabled)
    GuestLogin,
    /// Leave guest mode
    GuestLogout,
    /// Print who is signed in
    Whoami,
    /// Store the AI provider API key in the OS keyring
    SetApiKey {
        /// API key
        key: String,
    },
    /// Remove the stored AI provider API key
    ClearApiKey,
}

/// Drop the signed-in caller's saved study session, if anyone is signed in.
fn clear_own_session(ctx: &Context) -> CmdResult {
    let actions = ctx.actions();
    if actions.whoami().is_ok() {
        actions.clear_study_session()?;
    }
    Ok(())
}

pub fn run(action: AuthAction) -> CmdResult {
    match action {
        AuthAction::Login { user_id, plan } => {
            let user_id = user_id.trim().to_string();
            if user_id.is_empty() {
                return Err("user id must not be empty".into());
            }
            let mut config = Config::load()?;
            config.account.user_id = Some(user_id.clone());
            config.account.plan = plan;
            config.save()?;
            tracing::info!(%user_id, %plan, "signed in");
            print_json(&Identity::new(user_id, plan))?;
        }
        AuthAction::Logout => {
            let mut ctx = Context::load()?;
            clear_own_session(&ctx)?;
            set_guest_mode(&ctx.db, false)?;
            ctx.config.account.user_id = None;
            ctx.config.save()?;
            print_json(&serde_json::json!({ "signed_in": false }))?;
        }
        AuthAction::GuestLogin => {
            set_guest_mode(&Database::open()?, true)?;
            print_json(&Identity::guest())?;
        }
        AuthAction::GuestLogout => {
            let ctx = Context::load()?;
            if ctx.actions().whoami().is_ok_and(|who| who.is_guest) {
                clear_own_session(&ctx)?;
            }
            set_guest_mode(&ctx.db, false)?;
            print_json(&serde_json::json!({ "guest": false }))?;
        }
        AuthAction::Whoami => {
            let ctx = Context::load()?;
            print_json(&ctx.actions().whoami()?)?;
        }
        AuthAction::SetApiKey { key } => {
            if key.trim().is_empty() {
                return Err("API key must not be empty".into());
            }
            credentials::store_api_key(&key)?;
            println!("API key stored");
        }
        AuthAction::ClearApiKey => {
            credentials::clear_api_key()?;
            println!("API key removed");
        }
    }
    Ok(())
}
