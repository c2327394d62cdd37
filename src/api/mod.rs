//! Assistant backend API

pub mod backend;
pub mod client;
pub mod types;

pub use backend::AssistantBackend;
pub use client::{AssistantClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use types::{
    Acknowledgement, Activation, Answer, Health, PromptDraft, PromptFilter, PromptPage,
    PromptPatch, PromptTemplate, PromptType,
};
