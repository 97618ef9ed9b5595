use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "gmail_sweeper";

/// Save the refresh token into the OS keyring, keyed by user email.
pub fn save_refresh_token(user_email: &str, refresh_token: &str) -> Result<()> {
    Entry::new(SERVICE, user_email)?
        .set_password(refresh_token)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

pub fn load_refresh_token(user_email: &str) -> Result<Option<String>> {
    match Entry::new(SERVICE, user_email)?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Save the OAuth client secret into the keyring, keyed by client_id.
pub fn save_client_secret(client_id: &str, client_secret: &str) -> Result<()> {
    Entry::new(SERVICE, client_id)?
        .set_password(client_secret)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

pub fn load_client_secret(client_id: &str) -> Result<Option<String>> {
    match Entry::new(SERVICE, client_id)?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}
