use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config;

/// Non-secret access-token metadata cached in the config dir so restarts
/// skip the interactive flow while the token is still valid.
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedTokens {
    pub access_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

fn tokens_path() -> Result<PathBuf> {
    let mut p = config::config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("tokens.json");
    Ok(p)
}

pub fn save_tokens(access_token: Option<&str>, expires_at_epoch: Option<i64>) -> Result<()> {
    let cached = CachedTokens {
        access_token: access_token.map(|s| s.to_string()),
        expires_at_epoch,
    };
    fs::write(tokens_path()?, serde_json::to_string_pretty(&cached)?)?;
    Ok(())
}

pub fn load_tokens() -> Result<Option<CachedTokens>> {
    let p = tokens_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let cached: CachedTokens = serde_json::from_str(&fs::read_to_string(&p)?)?;
    Ok(Some(cached))
}
