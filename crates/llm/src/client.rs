use sahpaathi_core::HistoryEntry;

use crate::ai_types::{ChatRequest, ChatResponse, Message};
use crate::error::LlmError;

/// Default model when `SAHPAATHI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Probe prompt for the health-check endpoint.
const PROBE_PROMPT: &str = "Say hello and confirm you're working";

/// Client for the chat-completions API.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    /// Creates a new LLM client with the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let model = std::env::var("SAHPAATHI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a tutoring reply for `prompt`, steered by `instruction` and
    /// given the session's prior turns as context.
    ///
    /// # Errors
    /// Propagates any [`LlmError`] from the completion call; the caller
    /// decides whether that becomes a user-visible failure.
    pub async fn generate_reply(
        &self,
        instruction: &str,
        history: &[HistoryEntry],
        prompt: &str,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(history.len().saturating_add(2));
        messages.push(Message { role: "system".to_owned(), content: instruction.to_owned() });
        for entry in history {
            messages.push(Message {
                role: entry.role.as_str().to_owned(),
                content: entry.content.clone(),
            });
        }
        messages.push(Message { role: "user".to_owned(), content: prompt.to_owned() });

        let request = ChatRequest { model: self.model.clone(), messages };
        self.chat_completion(&request).await
    }

    /// One fixed-prompt completion proving the API key and endpoint work.
    pub async fn probe(&self) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_owned(),
                content: PROBE_PROMPT.to_owned(),
            }],
        };
        self.chat_completion(&request).await
    }

    /// Send a chat completion request and return the extracted content string.
    ///
    /// Transient failures (connection errors, 429/5xx) are retried with a
    /// short backoff; everything else fails fast.
    pub(crate) async fn chat_completion(&self, request: &ChatRequest) -> Result<String, LlmError> {
        const MAX_RETRIES: usize = 3;
        const RETRY_DELAYS: [u64; 4] = [0, 1, 2, 4];
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS.get(attempt).copied().unwrap_or(4);
                let delay = std::time::Duration::from_secs(delay_secs);
                tokio::time::sleep(delay).await;
                tracing::warn!("LLM retry attempt {attempt}/{MAX_RETRIES} after {delay:?}");
            }

            let response_result = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(request)
                .send()
                .await;

            let response = match response_result {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(LlmError::HttpRequest(e));
                        continue;
                    },
                };

                let chat_response: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                        context: format!(
                            "chat completion response (body: {})",
                            truncate(&body, 200)
                        ),
                        source: e,
                    })?;

                let first_choice = chat_response.choices.first().ok_or(LlmError::EmptyResponse)?;

                return Ok(first_choice.message.content.clone());
            }

            let status_code = status.as_u16();
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());

            let err = LlmError::HttpStatus { code: status_code, body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(LlmError::RetriesExhausted(Box::new(last_error.unwrap_or(LlmError::EmptyResponse))))
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
