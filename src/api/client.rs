//! Assistant backend HTTP API client

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::types::{
    Acknowledgement, Activation, Answer, AskRequest, Health, PromptDraft, PromptFilter,
    PromptPage, PromptPatch, PromptTemplate,
};
use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Ceiling for any single call; LLM answers can be slow
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Assistant API client
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    /// Create a new client against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-call ceiling
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the backend is up; any non-2xx counts as unreachable
    pub async fn health(&self) -> ClientResult<Health> {
        let url = self.url("/health");
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Health check failed: {}", e);
            ClientError::from(e)
        })?;

        read_json(response).await.map_err(|err| match err {
            ClientError::Request { status, message } => {
                ClientError::Network(format!("{} {}", status, message))
            }
            other => other,
        })
    }

    /// Ask the assistant a question
    pub async fn ask(&self, query: &str) -> ClientResult<Answer> {
        if query.trim().is_empty() {
            return Err(ClientError::Validation("Query cannot be empty".into()));
        }

        let url = self.url("/prompt");
        debug!("POST {} ({} chars)", url, query.len());

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { query })
            .send()
            .await?;

        let answer: Answer = read_json(response).await?;
        info!(
            "Assistant answered in {:.2}s (mode: {})",
            answer.latency_seconds, answer.mode
        );
        Ok(answer)
    }

    /// List one page of prompt templates
    pub async fn list_prompts(&self, filter: &PromptFilter) -> ClientResult<PromptPage> {
        let url = self.url("/prompts");
        debug!("GET {} {:?}", url, filter);

        let response = self.client.get(&url).query(filter).send().await?;

        read_json(response).await
    }

    /// Fetch a single template
    pub async fn get_prompt(&self, id: i64) -> ClientResult<PromptTemplate> {
        let url = self.url(&format!("/prompts/{}", id));
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        read_json(response).await
    }

    /// Create a template from a draft
    pub async fn create_prompt(&self, draft: &PromptDraft) -> ClientResult<PromptTemplate> {
        draft.validate()?;

        let url = self.url("/prompts");
        debug!("POST {} title={:?}", url, draft.title);

        let response = self.client.post(&url).json(draft).send().await?;

        let created: PromptTemplate = read_json(response).await?;
        info!("Created prompt {} ({})", created.id, created.prompt_type);
        Ok(created)
    }

    /// Apply a partial update
    pub async fn update_prompt(&self, id: i64, patch: &PromptPatch) -> ClientResult<PromptTemplate> {
        let url = self.url(&format!("/prompts/{}", id));
        debug!("PUT {}", url);

        let response = self.client.put(&url).json(patch).send().await?;

        let updated: PromptTemplate = read_json(response).await?;
        info!("Updated prompt {} (version {})", updated.id, updated.version);
        Ok(updated)
    }

    /// Delete a template
    pub async fn delete_prompt(&self, id: i64) -> ClientResult<Acknowledgement> {
        let url = self.url(&format!("/prompts/{}", id));
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;

        let ack: Acknowledgement = read_json(response).await?;
        info!("Deleted prompt {}", id);
        Ok(ack)
    }

    /// Make a template the active one for its type
    pub async fn activate_prompt(&self, id: i64) -> ClientResult<Activation> {
        let url = self.url(&format!("/prompts/{}/activate", id));
        debug!("PATCH {}", url);

        let response = self.client.patch(&url).send().await?;

        let activation: Activation = read_json(response).await?;
        info!("Activated prompt {} for {}", id, activation.prompt_type);
        Ok(activation)
    }
}

impl Default for AssistantClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Turn a response into `T`, or a request error carrying the backend's message
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        warn!("Assistant API error: {} - {}", status, message);
        return Err(ClientError::Request {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Backend errors come as `{"detail": ...}` or `{"message": ...}`
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let text = json
            .get("detail")
            .or_else(|| json.get("message"))
            .and_then(|v| v.as_str());
        if let Some(text) = text {
            return Some(text.to_string());
        }
    }

    Some(trimmed.to_string())
}
