// src/core/completion_client.rs
//! Chat-completion client for the scoring model (OpenAI-compatible wire format)

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::environment::CompletionSettings;
use crate::utils::preview;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("completion response carried no message content")]
    EmptyContent,

    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CompletionError {
    /// Upstream status code, when the failure came from the API itself
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Api { status, .. } => Some(*status),
            CompletionError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
}

/// Anything that can turn a prompt into model text.
#[rocket::async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct GrokClient {
    client: Client,
    api_key: Option<String>,
    settings: CompletionSettings,
}

impl GrokClient {
    pub fn new(settings: CompletionSettings, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        if api_key.is_none() {
            warn!(
                "{} is not set, analysis requests will fail",
                settings.api_key_env
            );
        }

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    async fn send_once(
        &self,
        api_key: &str,
        body: &ChatRequest<'_>,
    ) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        parse_message_content(&text)
    }
}

#[rocket::async_trait]
impl CompletionBackend for GrokClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.settings.temperature,
        };

        let mut attempt = 0;
        loop {
            match self.send_once(api_key, &body).await {
                Ok(content) => {
                    info!("Completion received from {}", self.settings.model);
                    debug!("Raw completion: {}", preview(&content));
                    return Ok(content);
                }
                Err(e) if attempt < self.settings.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay = backoff_delay(self.settings.retry_base_delay_ms, attempt);
                    warn!(
                        "Completion attempt {} failed ({}), retrying after {}ms",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Rate limiting, server-side failures and transport errors are worth another try.
pub fn is_retryable(error: &CompletionError) -> bool {
    match error {
        CompletionError::Api { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(status)
        }
        CompletionError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        _ => false,
    }
}

/// Exponential backoff: base, 2*base, 4*base, ...
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(1u64 << exponent))
}

fn parse_message_content(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(CompletionError::EmptyContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const OK_BODY: &str = r#"{"choices":[{"message":{"role":"assistant","content":"{\"totalScore\":80}"}}]}"#;

    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Serves one scripted response per connection and counts the requests
    async fn scripted_api(replies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                read_request(&mut stream).await;
                counter.fetch_add(1, Ordering::SeqCst);

                let response = format!(
                    "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            }
        });

        (url, hits)
    }

    fn client_for(api_url: String) -> GrokClient {
        let settings = CompletionSettings {
            api_url,
            max_retries: 2,
            retry_base_delay_ms: 0,
            ..CompletionSettings::default()
        };
        GrokClient::new(settings, Some("test-key".to_string())).unwrap()
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            prompt: "prompt".to_string(),
        }
    }

    #[test]
    fn test_parse_message_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"totalScore\":80}"}}]}"#;
        assert_eq!(parse_message_content(body).unwrap(), "{\"totalScore\":80}");
    }

    #[test]
    fn test_parse_message_content_without_choices() {
        assert!(matches!(
            parse_message_content(r#"{"choices":[]}"#),
            Err(CompletionError::EmptyContent)
        ));
        assert!(matches!(
            parse_message_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(CompletionError::EmptyContent)
        ));
        assert!(matches!(
            parse_message_content("<html>bad gateway</html>"),
            Err(CompletionError::Decode(_))
        ));
    }

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(0, 5), Duration::ZERO);
    }

    #[test]
    fn test_retryable_statuses() {
        let api = |status| CompletionError::Api {
            status,
            body: String::new(),
        };
        assert!(is_retryable(&api(429)));
        assert!(is_retryable(&api(503)));
        assert!(!is_retryable(&api(401)));
        assert!(!is_retryable(&api(400)));
        assert!(!is_retryable(&CompletionError::MissingApiKey));
        assert!(!is_retryable(&CompletionError::EmptyContent));
    }

    #[tokio::test]
    async fn test_retries_after_server_error() {
        let (url, hits) = scripted_api(vec![(503, "overloaded"), (200, OK_BODY)]).await;
        let client = client_for(url);

        let content = client.complete(&sample_request()).await.unwrap();
        assert_eq!(content, "{\"totalScore\":80}");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (url, hits) = scripted_api(vec![(401, "bad key"), (200, OK_BODY)]).await;
        let client = client_for(url);

        let result = client.complete(&sample_request()).await;
        assert!(matches!(
            result,
            Err(CompletionError::Api { status: 401, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_stop_after_max_retries() {
        let (url, hits) = scripted_api(vec![
            (429, "slow down"),
            (500, "boom"),
            (502, "bad gateway"),
            (200, OK_BODY),
        ])
        .await;
        let client = client_for(url);

        let result = client.complete(&sample_request()).await;
        assert!(matches!(
            result,
            Err(CompletionError::Api { status: 502, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GrokClient::new(CompletionSettings::default(), None).unwrap();
        let request = CompletionRequest {
            system: "system".to_string(),
            prompt: "prompt".to_string(),
        };
        assert!(matches!(
            client.complete(&request).await,
            Err(CompletionError::MissingApiKey)
        ));
    }
}
