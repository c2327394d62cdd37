//! Request and response shapes for the assistant backend

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Category a prompt template belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    ReasonerSystem,
    VerifierSystem,
    CorrectionFeedback,
}

impl PromptType {
    pub const ALL: [PromptType; 3] = [
        PromptType::ReasonerSystem,
        PromptType::VerifierSystem,
        PromptType::CorrectionFeedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptType::ReasonerSystem => "reasoner_system",
            PromptType::VerifierSystem => "verifier_system",
            PromptType::CorrectionFeedback => "correction_feedback",
        }
    }

    pub fn from_str(s: &str) -> ClientResult<Self> {
        match s.trim() {
            "reasoner_system" => Ok(PromptType::ReasonerSystem),
            "verifier_system" => Ok(PromptType::VerifierSystem),
            "correction_feedback" => Ok(PromptType::CorrectionFeedback),
            other => Err(ClientError::Validation(format!(
                "Unknown prompt type: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PromptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored prompt template, owned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptTemplate {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    #[serde(default)]
    pub tags: String,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_active: bool,
}

impl PromptTemplate {
    /// Tags split on commas, blanks dropped
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Editable mirror of a template, used for both create and edit
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PromptDraft {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub prompt_type: Option<PromptType>,
    pub tags: String,
    pub is_active: bool,
}

impl PromptDraft {
    pub fn from_template(template: &PromptTemplate) -> Self {
        Self {
            title: template.title.clone(),
            content: template.content.clone(),
            prompt_type: Some(template.prompt_type),
            tags: template.tags.clone(),
            is_active: template.is_active,
        }
    }

    /// Check required fields; nothing is sent when this fails
    pub fn validate(&self) -> ClientResult<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.content.trim().is_empty() {
            missing.push("content");
        }
        if self.prompt_type.is_none() {
            missing.push("type");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Partial update body; unset fields are left out of the JSON
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PromptPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<PromptType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<&PromptDraft> for PromptPatch {
    fn from(draft: &PromptDraft) -> Self {
        Self {
            title: Some(draft.title.clone()),
            content: Some(draft.content.clone()),
            prompt_type: draft.prompt_type,
            tags: Some(draft.tags.clone()),
            is_active: Some(draft.is_active),
        }
    }
}

/// Query parameters for `GET /prompts`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<PromptType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for PromptFilter {
    fn default() -> Self {
        Self {
            prompt_type: None,
            tags: None,
            page: 1,
            page_size: 10,
        }
    }
}

impl PromptFilter {
    pub fn with_type(mut self, prompt_type: Option<PromptType>) -> Self {
        self.prompt_type = prompt_type;
        self
    }
}

/// One page of templates
#[derive(Debug, Clone, Deserialize)]
pub struct PromptPage {
    pub total: u64,
    #[serde(default)]
    pub prompts: Vec<PromptTemplate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// Response to `PATCH /prompts/{id}/activate`
#[derive(Debug, Clone, Deserialize)]
pub struct Activation {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    pub is_active: bool,
    pub message: String,
}

/// Plain `{message}` acknowledgement
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    pub mode: String,
}

impl Health {
    /// `status (mode)`
    pub fn summary(&self) -> String {
        format!("{} ({})", self.status, self.mode)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AskRequest<'a> {
    pub query: &'a str,
}

/// The assistant's reply to one query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub mode: String,
    pub latency_seconds: f64,
}
