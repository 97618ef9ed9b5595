pub mod oauth;
pub mod token_manager;
pub mod token_store;
pub mod tokens_file;

/// Scope the sweeper needs: full mailbox access, required for permanent
/// message deletion.
pub const GMAIL_SCOPE: &str = "https://mail.google.com/";
