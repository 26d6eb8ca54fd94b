//! Messages API client used for content analysis

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::config::AnalysisConfig;
use super::error::AnalysisError;
use super::ContentAnalyzer;

/// Instruction placed before the page text
const ANALYSIS_INSTRUCTIONS: &str = "You are an SEO and content specialist. Analyze the following \
web page content. Comment on its structure, topic focus, keyword usage and readability, then list \
concrete suggestions for improving it.";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the analysis service's messages endpoint
#[derive(Clone)]
pub struct ClaudeClient {
    client: ReqwestClient,
    config: AnalysisConfig,
}

impl ClaudeClient {
    /// Create a client; the configured timeout applies to every call
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = ReqwestClient::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Prompt sent for `text`, cut to the configured character budget
    pub fn build_prompt(&self, text: &str) -> String {
        let text = match text.char_indices().nth(self.config.max_input_chars) {
            Some((cut, _)) => &text[..cut],
            None => text,
        };
        format!("{}\n\nContent:\n{}", ANALYSIS_INSTRUCTIONS, text)
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model), level = "debug")]
    async fn send(&self, prompt: &str) -> Result<String, AnalysisError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending analysis request ({} chars)", prompt.len());
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            error!("Analysis API error: {} - {}", status, response_text);
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => AnalysisError::RateLimit,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AnalysisError::Auth("Invalid API key".to_string())
                }
                _ => AnalysisError::Api {
                    status_code: status.as_u16(),
                    message: response_text,
                },
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse analysis response: {}", e);
            AnalysisError::UnexpectedResponse(format!("Failed to parse response: {}", e))
        })?;

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                AnalysisError::UnexpectedResponse("response has no text content".to_string())
            })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            AnalysisError::Timeout(self.config.timeout)
        } else {
            AnalysisError::Http(err)
        }
    }
}

#[async_trait]
impl ContentAnalyzer for ClaudeClient {
    async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let prompt = self.build_prompt(text);
        self.send(&prompt).await
    }

    fn deadline(&self) -> Option<Duration> {
        Some(self.config.timeout)
    }
}
