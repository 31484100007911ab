//! worklog-server: private work journal with weekly summaries
//!
//! Users record short daily entries, which are encrypted at rest. Once a week
//! the entries are sent to a chat-completion API and the returned digest is
//! stored, also encrypted. Administrators can review users, toggle accounts
//! and read the audit trail of those changes.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod http;
pub mod journal;
pub mod models;
pub mod session;
pub mod state;
pub mod summarizer;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use http::{run_server, ServerConfig};
pub use journal::Journal;
pub use state::AppState;
