//! AI provider API key storage.
//!
//! The key lives in the OS keyring; `OPENAI_API_KEY` is the fallback for
//! headless machines where no keyring is available.

const SERVICE: &str = "flashdeck";
const API_KEY_ENTRY: &str = "ai_api_key";

/// Environment fallback for the AI provider key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use super::SERVICE;

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Keyring first, then the environment. Blank values count as absent.
pub fn api_key() -> Option<String> {
    let from_keyring = match keyring_store::get(API_KEY_ENTRY) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "keyring unavailable, falling back to environment");
            None
        }
    };
    from_keyring
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|k| !k.trim().is_empty())
}

pub fn store_api_key(value: &str) -> Result<(), keyring::Error> {
    keyring_store::set(API_KEY_ENTRY, value.trim())
}

pub fn clear_api_key() -> Result<(), keyring::Error> {
    keyring_store::delete(API_KEY_ENTRY)
}
