//! Startup errors raised while assembling the application state

use thiserror::Error;

use crate::config::ConfigError;
use crate::summarizer::SummarizerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Summarizer error: {0}")]
    Summarizer(#[from] SummarizerError),
}
