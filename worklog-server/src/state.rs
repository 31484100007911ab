//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::crypto::FieldCipher;
use crate::error::Result;
use crate::session::SessionSigner;
use crate::summarizer::{OpenAiSummarizer, Summarizer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    cipher: FieldCipher,
    sessions: SessionSigner,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        cipher: FieldCipher,
        sessions: SessionSigner,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                cipher,
                sessions,
                summarizer,
            }),
        }
    }

    /// Wire up cipher, session signer and summarizer from configuration.
    pub fn from_config(pool: PgPool, config: &AppConfig) -> Result<Self> {
        let cipher = config.cipher()?;
        let sessions = SessionSigner::new(
            config.session_secret.as_bytes(),
            config.session_ttl,
            config.cookie_secure,
        );

        let summarizer: Option<Arc<dyn Summarizer>> = match &config.openai {
            Some(openai) => Some(Arc::new(OpenAiSummarizer::new(openai.clone())?)),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; summary generation disabled");
                None
            }
        };

        Ok(Self::new(pool, cipher, sessions, summarizer))
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn cipher(&self) -> &FieldCipher {
        &self.inner.cipher
    }

    pub fn sessions(&self) -> &SessionSigner {
        &self.inner.sessions
    }

    pub fn summarizer(&self) -> Option<&dyn Summarizer> {
        self.inner.summarizer.as_deref()
    }
}
