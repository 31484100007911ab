//! Weekly summary generation via a chat-completion API
//!
//! The `Summarizer` trait is the seam between the journal service and the
//! external model, so the service can run against a fake in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;

const SYSTEM_PROMPT: &str = "You are a productivity assistant.";

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response contained no summary")]
    EmptyResponse,
}

/// Turns a week's worth of entry text into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, log_text: &str) -> Result<String, SummarizerError>;
}

/// One `YYYY-MM-DD: text` line per entry, in the order given.
pub fn build_log_text<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (NaiveDate, &'a str)>,
{
    entries
        .into_iter()
        .map(|(date, text)| format!("{}: {}", date.format("%Y-%m-%d"), text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The user prompt sent alongside the log text.
pub fn build_prompt(log_text: &str) -> String {
    format!(
        "These are daily work logs. Please:\n\
         1. Generate bullet points for what was done.\n\
         2. Write a 1-paragraph summary of the overall work and progress.\n\n\
         {}",
        log_text
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat-completion client
pub struct OpenAiSummarizer {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiSummarizer {
    pub fn new(config: OpenAiConfig) -> Result<Self, SummarizerError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, log_text: &str) -> Result<String, SummarizerError> {
        let prompt = build_prompt(log_text);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        tracing::debug!(model = %self.config.model, chars = log_text.len(), "requesting summary");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        extract_summary(response)
    }
}

fn extract_summary(response: ChatResponse) -> Result<String, SummarizerError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(SummarizerError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn log_text_one_line_per_entry() {
        let text = build_log_text(vec![
            (date(10), "Planned sprint"),
            (date(11), "Fixed login bug"),
        ]);
        assert_eq!(text, "2024-06-10: Planned sprint\n2024-06-11: Fixed login bug");
    }

    #[test]
    fn prompt_asks_for_bullets_and_paragraph() {
        let prompt = build_prompt("2024-06-10: Planned sprint");
        assert!(prompt.starts_with("These are daily work logs."));
        assert!(prompt.contains("1. Generate bullet points"));
        assert!(prompt.contains("2. Write a 1-paragraph summary"));
        assert!(prompt.ends_with("\n\n2024-06-10: Planned sprint"));
    }

    #[test]
    fn request_serializes_chat_shape() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are a productivity assistant.");
    }

    #[test]
    fn first_choice_is_the_summary() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  - did things\n"}},
                           {"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_summary(response).unwrap(), "- did things");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_summary(response),
            Err(SummarizerError::EmptyResponse)
        ));

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_summary(response).is_err());
    }
}
