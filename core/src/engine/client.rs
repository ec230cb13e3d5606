//! HTTP analysis engine client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint and asks the
//! model to answer with a single JSON object matching [`AnalysisReport`].
//! Transient failures (429, 5xx, network) are retried with capped
//! jittered backoff; everything else maps to a typed error.

use super::{AnalysisEngine, AnalysisReport};
use crate::error::{Result, TextLensError};
use crate::tone::Tone;
use crate::{error_log, info_log, warn_log};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{
    header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    Client as HttpClient, StatusCode,
};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Engine endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.3),
        }
    }
}

/// Production [`AnalysisEngine`] over HTTP
pub struct EngineClient {
    config: EngineConfig,
    http_client: HttpClient,
}

impl EngineClient {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(300))
            .user_agent("textlens/0.1")
            .build()
            .map_err(|e| TextLensError::ConnectionFailed {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(EngineClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            "application/json"
                .parse()
                .map_err(|_| TextLensError::InvalidConfig {
                    message: "invalid content-type header".to_string(),
                })?,
        );

        if let Some(api_key) = &self.config.api_key {
            let key = api_key.trim();
            if !key.is_empty() {
                let value = format!("Bearer {}", key);
                headers.insert(
                    AUTHORIZATION,
                    value.parse().map_err(|_| TextLensError::InvalidConfig {
                        message: "API key contains characters not valid in a header".to_string(),
                    })?,
                );
            }
        }

        Ok(headers)
    }

    /// Build the instruction and user messages for one analysis request
    fn build_messages(content: &str, tone: Option<Tone>) -> Vec<WireMessage> {
        let tone_clause = match tone {
            Some(t) => format!(
                "Additionally rewrite the full text in a {} tone and put the rewrite in \
                 \"tone_transformed\".",
                t
            ),
            None => "Set \"tone_transformed\" to null; no rewrite was requested.".to_string(),
        };

        let system = format!(
            "You are a text analysis engine. Analyze the user's text and respond with a \
             single JSON object, no prose, with exactly these fields: \
             \"moral\" (string: the core message or lesson of the text), \
             \"keywords\" (array of strings: key phrases and concepts), \
             \"tone_transformed\" (string or null), \
             \"insights\" (array of strings: notable observations and suggestions). {}",
            tone_clause
        );

        vec![
            WireMessage {
                role: "system",
                content: system,
            },
            WireMessage {
                role: "user",
                content: content.to_string(),
            },
        ]
    }

    /// Extract an [`AnalysisReport`] from the model's reply, tolerating
    /// code fences and surrounding prose.
    fn parse_report(raw: &str) -> Result<AnalysisReport> {
        let start = raw.find('{');
        let end = raw.rfind('}');
        let json = match (start, end) {
            (Some(s), Some(e)) if e > s => &raw[s..=e],
            _ => {
                return Err(TextLensError::AnalysisFailure {
                    message: "engine reply contained no JSON object".to_string(),
                })
            }
        };

        serde_json::from_str(json).map_err(|e| TextLensError::AnalysisFailure {
            message: format!("engine reply was not a valid report: {}", e),
        })
    }

    /// Helper with jittered backoff retry for transient failures
    async fn retry_with_backoff<F, Fut>(&self, operation: F) -> Result<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempt = 0;
        let mut delay = INITIAL_BACKOFF;

        loop {
            match operation().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= MAX_RETRIES {
                            error_log!("Rate limit (429) exceeded max retries, giving up");
                            return Ok(response);
                        }
                        // Respect Retry-After when the server sends one
                        let wait = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .map(Duration::from_secs)
                            .unwrap_or(delay);
                        warn_log!(
                            "Rate limited (429), waiting {:?} before retry (attempt {}/{})",
                            wait,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        sleep(wait).await;
                    } else if status.is_server_error() && attempt < MAX_RETRIES {
                        warn_log!("Provider error {}, retrying in {:?}", status, delay);
                        sleep(delay).await;
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    if attempt >= MAX_RETRIES {
                        return Err(TextLensError::ConnectionFailed {
                            message: e.to_string(),
                        });
                    }
                    warn_log!("Network error ({}), retrying in {:?}", e, delay);
                    sleep(delay).await;
                }
            }

            attempt += 1;
            // Exponential backoff with +/- 500ms jitter
            let jitter_ms = rand::thread_rng().gen_range(-500..=500);
            let delay_ms = (delay.as_millis() as i64 * 2 + jitter_ms).max(0) as u64;
            delay = Duration::from_millis(delay_ms);
        }
    }
}

#[async_trait]
impl AnalysisEngine for EngineClient {
    async fn analyze(&self, content: &str, tone: Option<Tone>) -> Result<AnalysisReport> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = CompletionRequest {
            model: self.config.model.clone(),
            messages: Self::build_messages(content, tone),
            max_completion_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        info_log!(
            "Analysis request: model={}, content_len={}, tone={:?}",
            self.config.model,
            content.len(),
            tone
        );

        let headers = self.build_headers()?;
        let response = self
            .retry_with_backoff(|| async {
                self.http_client
                    .post(&url)
                    .headers(headers.clone())
                    .json(&body)
                    .send()
                    .await
            })
            .await?;

        match response.status() {
            StatusCode::OK => {
                let text = response
                    .text()
                    .await
                    .map_err(|e| TextLensError::ConnectionFailed {
                        message: format!("failed to read engine response: {}", e),
                    })?;
                let completion: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
                    error_log!("Failed to parse completion response: {}. Raw body: {}", e, text);
                    TextLensError::AnalysisFailure {
                        message: format!("malformed engine response: {}", e),
                    }
                })?;

                let reply = completion
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .ok_or_else(|| TextLensError::AnalysisFailure {
                        message: "engine returned no completion".to_string(),
                    })?;

                Self::parse_report(&reply)
            }
            StatusCode::UNAUTHORIZED => Err(TextLensError::Unauthorized {
                message: "engine rejected the API key".to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(TextLensError::RateLimitExceeded),
            status => {
                let error_body: Option<serde_json::Value> = response.json().await.ok();
                let message = error_body
                    .as_ref()
                    .and_then(|v| v.get("error").and_then(|e| e.get("message")))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown error")
                    .to_string();
                Err(TextLensError::ProviderError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

// Wire types for the OpenAI-compatible API
#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(rename = "max_completion_tokens", skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}
