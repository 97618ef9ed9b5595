use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub client_id: String,
    pub user_email: Option<String>,
    pub redirect_uri: Option<String>,
    /// JSON file listing sender addresses to sweep.
    pub senders_path: Option<String>,
    pub log_path: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("gmail_sweeper"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            client_id: "YOUR_CLIENT_ID.apps.googleusercontent.com".to_string(),
            user_email: Some("you@example.com".to_string()),
            redirect_uri: Some("http://127.0.0.1:8080/callback".to_string()),
            senders_path: None,
            log_path: None,
            poll_interval_secs: Some(60),
        };
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(&path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {} — edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn resolve_senders_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.senders_path {
        Ok(PathBuf::from(p))
    } else {
        let mut p = config_dir()?;
        fs::create_dir_all(&p)?;
        p.push("emails_to_delete.json");
        Ok(p)
    }
}

pub fn resolve_log_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.log_path {
        Ok(PathBuf::from(p))
    } else {
        Ok(PathBuf::from("bot.log"))
    }
}

#[derive(Debug, Deserialize)]
struct SenderList {
    sender_emails: Vec<String>,
}

/// Load the ordered list of sender addresses from a JSON file of the form
/// `{ "sender_emails": ["a@x.com", ...] }`.
pub fn load_senders(path: &Path) -> Result<Vec<String>> {
    let s = fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("could not read sender list {}: {}", path.display(), e)
    })?;
    let list: SenderList = serde_json::from_str(&s)?;
    if list.sender_emails.is_empty() {
        return Err(anyhow::anyhow!(
            "sender list {} is empty — nothing to sweep",
            path.display()
        ));
    }
    Ok(list.sender_emails)
}
