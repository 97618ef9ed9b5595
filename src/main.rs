use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use gmail_sweeper::auth::{token_manager::TokenManager, token_store};
use gmail_sweeper::botlog::{BotLog, MAX_LOG_LINES};
use gmail_sweeper::config::{self, load_config};
use gmail_sweeper::daemon::{DaemonConfig, run_daemon};

#[derive(Parser)]
#[command(name = "gmail-sweeper")]
#[command(about = "Deletes Gmail messages from configured senders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Store the OAuth client secret in the keyring
    SetClientSecret {
        #[arg(long)]
        client_id: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Some(Command::SetClientSecret { client_id }) = cli.cmd {
        eprintln!("Paste client secret (end with Ctrl-D):");
        let mut secret = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
        token_store::save_client_secret(&client_id, secret.trim())?;
        println!("Saved client secret for client_id {}", client_id);
        return Ok(());
    }

    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;

    let senders_path = config::resolve_senders_path(&cfg)?;
    let senders = config::load_senders(&senders_path)?;
    log::info!("Sweeping mail from {} sender(s)", senders.len());

    let token_mgr = TokenManager::from_config(&cfg)?;
    let mut botlog = BotLog::open(config::resolve_log_path(&cfg)?)?;

    run_daemon(
        &token_mgr,
        &senders,
        &mut botlog,
        DaemonConfig {
            interval_secs: cfg.poll_interval_secs.unwrap_or(60),
            max_log_lines: MAX_LOG_LINES,
        },
    )
}
