use anyhow::{Result, anyhow};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::{GMAIL_SCOPE, oauth, token_store, tokens_file};
use crate::config::Config;

/// Fallback to just under an hour when the provider omits expires_in.
const DEFAULT_TTL_SECS: i64 = 3500;

#[derive(Clone)]
pub struct TokenManager {
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    user_email: String,
}

impl TokenManager {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let user_email = cfg
            .user_email
            .clone()
            .ok_or_else(|| anyhow!("user_email not set in config"))?;
        let redirect_uri = cfg
            .redirect_uri
            .clone()
            .unwrap_or_else(|| "http://127.0.0.1:8080/callback".to_string());
        let client_secret = token_store::load_client_secret(&cfg.client_id)?
            .or_else(|| std::env::var("OAUTH_CLIENT_SECRET").ok());

        Ok(Self {
            client_id: cfg.client_id.clone(),
            client_secret,
            redirect_uri,
            user_email,
        })
    }

    /// Returns a valid access token: cached if unexpired, else refreshed,
    /// else obtained through the interactive PKCE flow.
    pub fn get_access_token(&self) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        if let Some(cached) = tokens_file::load_tokens()?
            && let (Some(token), Some(exp)) = (cached.access_token, cached.expires_at_epoch)
            && now < exp
        {
            return Ok(token);
        }

        if let Some(rt) = token_store::load_refresh_token(&self.user_email)? {
            match oauth::refresh_access_token(&self.client_id, self.client_secret.as_deref(), &rt)
            {
                Ok(t) => return self.persist(t, now),
                Err(e) => {
                    eprintln!("Refresh failed: {e}, falling back to interactive auth");
                }
            }
        }

        let t = oauth::perform_pkce_flow(
            &self.client_id,
            self.client_secret.as_deref(),
            &self.redirect_uri,
            GMAIL_SCOPE,
        )?;
        self.persist(t, now)
    }

    fn persist(&self, tokens: oauth::Tokens, now: i64) -> Result<String> {
        // best-effort: a keyring failure must not lose the working token
        if let Some(rt) = &tokens.refresh_token
            && let Err(e) = token_store::save_refresh_token(&self.user_email, rt)
        {
            eprintln!("Warning: could not store refresh token in keyring: {e}");
        }

        let exp = tokens
            .expires_in
            .map(|s| now + s as i64)
            .unwrap_or(now + DEFAULT_TTL_SECS);
        if let Err(e) = tokens_file::save_tokens(Some(&tokens.access_token), Some(exp)) {
            eprintln!("Warning: couldn't save tokens metadata: {e}");
        }

        Ok(tokens.access_token)
    }
}
