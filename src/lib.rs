pub mod auth;
pub mod botlog;
pub mod config;
pub mod daemon;
pub mod mail;
pub mod sweep;
