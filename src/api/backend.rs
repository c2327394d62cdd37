//! Backend trait the controllers talk through

use async_trait::async_trait;

use super::client::AssistantClient;
use super::types::{
    Acknowledgement, Activation, Answer, Health, PromptDraft, PromptFilter, PromptPage,
    PromptPatch, PromptTemplate,
};
use crate::error::ClientResult;

/// Operations the assistant backend exposes
///
/// `AssistantClient` is the HTTP implementation; anything else that speaks
/// the same contract (an in-memory fake, a recording proxy) can stand in.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn health(&self) -> ClientResult<Health>;

    async fn ask(&self, query: &str) -> ClientResult<Answer>;

    async fn list_prompts(&self, filter: &PromptFilter) -> ClientResult<PromptPage>;

    async fn get_prompt(&self, id: i64) -> ClientResult<PromptTemplate>;

    async fn create_prompt(&self, draft: &PromptDraft) -> ClientResult<PromptTemplate>;

    async fn update_prompt(&self, id: i64, patch: &PromptPatch) -> ClientResult<PromptTemplate>;

    async fn delete_prompt(&self, id: i64) -> ClientResult<Acknowledgement>;

    async fn activate_prompt(&self, id: i64) -> ClientResult<Activation>;
}

#[async_trait]
impl AssistantBackend for AssistantClient {
    async fn health(&self) -> ClientResult<Health> {
        AssistantClient::health(self).await
    }

    async fn ask(&self, query: &str) -> ClientResult<Answer> {
        AssistantClient::ask(self, query).await
    }

    async fn list_prompts(&self, filter: &PromptFilter) -> ClientResult<PromptPage> {
        AssistantClient::list_prompts(self, filter).await
    }

    async fn get_prompt(&self, id: i64) -> ClientResult<PromptTemplate> {
        AssistantClient::get_prompt(self, id).await
    }

    async fn create_prompt(&self, draft: &PromptDraft) -> ClientResult<PromptTemplate> {
        AssistantClient::create_prompt(self, draft).await
    }

    async fn update_prompt(&self, id: i64, patch: &PromptPatch) -> ClientResult<PromptTemplate> {
        AssistantClient::update_prompt(self, id, patch).await
    }

    async fn delete_prompt(&self, id: i64) -> ClientResult<Acknowledgement> {
        AssistantClient::delete_prompt(self, id).await
    }

    async fn activate_prompt(&self, id: i64) -> ClientResult<Activation> {
        AssistantClient::activate_prompt(self, id).await
    }
}
