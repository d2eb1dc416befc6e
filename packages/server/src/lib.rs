// Launch Monitor - server crate
//
// Periodically scrapes a launch board, announces unseen token launches to a
// Telegram chat and exposes trigger/status endpoints over HTTP.
//
// Business logic lives in domains/*, infrastructure behind traits in kernel/.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
