use anyhow::Result;
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use crate::auth::token_manager::TokenManager;
use crate::botlog::BotLog;
use crate::mail::gmail_client::GmailClient;
use crate::sweep::{ThreadDelay, run_pass};

pub struct DaemonConfig {
    pub interval_secs: u64,
    pub max_log_lines: usize,
}

/// The sweeper's outer loop: one pass over every sender, bound the log,
/// sleep, repeat until stopped by SIGINT. No failure inside a pass is
/// fatal; a token failure skips the whole cycle and retries next interval.
pub fn run_daemon(
    token_mgr: &TokenManager,
    senders: &[String],
    log: &mut BotLog,
    cfg: DaemonConfig,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    let mut delay = ThreadDelay;

    while running.load(Ordering::SeqCst) {
        // fetched per cycle: the access token may have been refreshed
        let access = match token_mgr.get_access_token() {
            Ok(t) => t,
            Err(e) => {
                log.error(format!("Token error: {e}"));
                thread::sleep(Duration::from_secs(cfg.interval_secs));
                continue;
            }
        };

        let mailbox = GmailClient::new(access);
        run_pass(&mailbox, senders, log, &mut delay);

        if let Err(e) = log.truncate_to_last(cfg.max_log_lines) {
            eprintln!("Warning: could not truncate {}: {}", log.path().display(), e);
        }

        thread::sleep(Duration::from_secs(cfg.interval_secs));
    }

    Ok(())
}
