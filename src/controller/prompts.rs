//! Prompt template manager: list / create / edit view state machine

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::flight::Flight;
use crate::api::{AssistantBackend, PromptDraft, PromptFilter, PromptPatch, PromptTemplate, PromptType};
use crate::error::ClientError;

/// How long a success notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    Create,
    Edit { id: i64 },
}

/// Result of a manager operation; errors never escape the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Another operation is outstanding
    Busy,
    /// User did not confirm
    Declined,
    /// Rejected locally, nothing was sent
    Invalid(String),
    Failed(String),
}

/// Asks the user to confirm a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Always answers with the wrapped value
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Transient success message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub posted_at: Instant,
}

impl Notice {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            posted_at: Instant::now(),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) < NOTICE_TTL
    }
}

#[derive(Debug, Default)]
struct ManagerState {
    view: ViewState,
    prompts: Vec<PromptTemplate>,
    total: u64,
    filter: PromptFilter,
    draft: PromptDraft,
    error: Option<String>,
    notice: Option<Notice>,
    flight: Flight,
}

/// Read-only copy of the manager's state for rendering
#[derive(Debug, Clone)]
pub struct ManagerSnapshot {
    pub view: ViewState,
    pub prompts: Vec<PromptTemplate>,
    pub total: u64,
    pub filter: PromptFilter,
    pub draft: PromptDraft,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub busy: bool,
}

pub struct PromptManager {
    backend: Arc<dyn AssistantBackend>,
    state: RwLock<ManagerState>,
}

impl PromptManager {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self::with_page_size(backend, PromptFilter::default().page_size)
    }

    pub fn with_page_size(backend: Arc<dyn AssistantBackend>, page_size: u32) -> Self {
        let state = ManagerState {
            filter: PromptFilter {
                page_size,
                ..PromptFilter::default()
            },
            ..ManagerState::default()
        };
        Self {
            backend,
            state: RwLock::new(state),
        }
    }

    /// Fetch the list for `filter_type`, replacing the snapshot wholesale
    pub async fn refresh(&self, filter_type: Option<PromptType>) -> Outcome {
        {
            let mut state = self.state.write().await;
            if !state.flight.try_begin() {
                return Outcome::Busy;
            }
            state.error = None;
            state.filter.prompt_type = filter_type;
        }

        let outcome = match self.reload().await {
            Ok(()) => Outcome::Done,
            Err(message) => Outcome::Failed(message),
        };

        self.state.write().await.flight.settle();
        outcome
    }

    /// Set the tag substring used by subsequent refreshes
    pub async fn set_tags(&self, tags: Option<String>) {
        self.state.write().await.filter.tags = tags.filter(|t| !t.trim().is_empty());
    }

    pub async fn set_page(&self, page: u32) {
        self.state.write().await.filter.page = page.max(1);
    }

    pub async fn set_page_size(&self, page_size: u32) {
        self.state.write().await.filter.page_size = page_size.max(1);
    }

    /// Unguarded fetch; callers hold the flight
    async fn reload(&self) -> Result<(), String> {
        let filter = self.state.read().await.filter.clone();
        let result = self.backend.list_prompts(&filter).await;

        let mut state = self.state.write().await;
        match result {
            Ok(page) => {
                debug!("Loaded {} of {} prompts", page.prompts.len(), page.total);
                state.prompts = page.prompts;
                state.total = page.total;
                Ok(())
            }
            Err(e) => {
                let message = describe(&e, "Failed to load prompts");
                warn!("{}", message);
                state.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// `List -> Create` with an empty draft
    pub async fn begin_create(&self) -> bool {
        let mut state = self.state.write().await;
        if state.view != ViewState::List || state.flight.is_in_flight() {
            return false;
        }
        state.draft = PromptDraft::default();
        state.view = ViewState::Create;
        true
    }

    /// `List -> Edit` with the template's fields loaded into the draft
    pub async fn begin_edit(&self, template: &PromptTemplate) -> bool {
        let mut state = self.state.write().await;
        if state.view != ViewState::List || state.flight.is_in_flight() {
            return false;
        }
        state.draft = PromptDraft::from_template(template);
        state.view = ViewState::Edit { id: template.id };
        true
    }

    /// Back to the list, discarding the draft; refused while a call is outstanding
    pub async fn cancel(&self) -> bool {
        let mut state = self.state.write().await;
        if state.flight.is_in_flight() {
            return false;
        }
        state.draft = PromptDraft::default();
        state.view = ViewState::List;
        true
    }

    /// Mutate the draft; ignored outside the form views
    pub async fn edit_draft<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut PromptDraft),
    {
        let mut state = self.state.write().await;
        if state.view == ViewState::List {
            return false;
        }
        f(&mut state.draft);
        true
    }

    /// Create or update from the draft depending on the view
    pub async fn submit_draft(&self) -> Outcome {
        let (view, draft) = {
            let mut state = self.state.write().await;
            if state.view == ViewState::List {
                return Outcome::Invalid("Nothing to submit".to_string());
            }
            if let Err(e) = state.draft.validate() {
                let message = e.to_string();
                state.error = Some(message.clone());
                return Outcome::Invalid(message);
            }
            if !state.flight.try_begin() {
                return Outcome::Busy;
            }
            state.error = None;
            (state.view, state.draft.clone())
        };

        let result = match view {
            ViewState::Create => self
                .backend
                .create_prompt(&draft)
                .await
                .map(|_| "Prompt created successfully"),
            ViewState::Edit { id } => self
                .backend
                .update_prompt(id, &PromptPatch::from(&draft))
                .await
                .map(|_| "Prompt updated successfully"),
            ViewState::List => Err(ClientError::Validation("Nothing to submit".to_string())),
        };

        let outcome = match result {
            Ok(notice) => {
                {
                    let mut state = self.state.write().await;
                    state.view = ViewState::List;
                    state.draft = PromptDraft::default();
                }
                self.finish(notice).await;
                Outcome::Done
            }
            Err(e) => {
                let message = describe(&e, "Failed to save prompt");
                warn!("{}", message);
                self.state.write().await.error = Some(message.clone());
                Outcome::Failed(message)
            }
        };

        self.state.write().await.flight.settle();
        outcome
    }

    /// Delete after the user confirms
    pub async fn delete(&self, id: i64, confirm: &dyn Confirm) -> Outcome {
        if self.state.read().await.flight.is_in_flight() {
            return Outcome::Busy;
        }
        if !confirm.confirm("Are you sure you want to delete this prompt?") {
            debug!("Delete of prompt {} not confirmed", id);
            return Outcome::Declined;
        }

        self.mutate(
            self.backend.delete_prompt(id),
            "Prompt deleted successfully",
            "Failed to delete prompt",
        )
        .await
    }

    /// Make `id` the active template for its type; the backend deactivates the rest
    pub async fn activate(&self, id: i64) -> Outcome {
        self.mutate(
            self.backend.activate_prompt(id),
            "Prompt activated successfully",
            "Failed to activate prompt",
        )
        .await
    }

    async fn mutate<T, F>(&self, call: F, notice: &str, fallback: &str) -> Outcome
    where
        F: std::future::Future<Output = Result<T, ClientError>>,
    {
        {
            let mut state = self.state.write().await;
            if !state.flight.try_begin() {
                return Outcome::Busy;
            }
            state.error = None;
        }

        let outcome = match call.await {
            Ok(_) => {
                self.finish(notice).await;
                Outcome::Done
            }
            Err(e) => {
                let message = describe(&e, fallback);
                warn!("{}", message);
                self.state.write().await.error = Some(message.clone());
                Outcome::Failed(message)
            }
        };

        self.state.write().await.flight.settle();
        outcome
    }

    /// Reload after a successful mutation and post the notice
    async fn finish(&self, notice: &str) {
        info!("{}", notice);
        // A failed reload leaves its message in the banner
        let _ = self.reload().await;
        self.state.write().await.notice = Some(Notice::new(notice));
    }

    pub async fn view(&self) -> ViewState {
        self.state.read().await.view
    }

    pub async fn prompts(&self) -> Vec<PromptTemplate> {
        self.state.read().await.prompts.clone()
    }

    pub async fn draft(&self) -> PromptDraft {
        self.state.read().await.draft.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// The success notice, while it is still visible
    pub async fn notice(&self) -> Option<String> {
        self.notice_at(Instant::now()).await
    }

    pub async fn notice_at(&self, now: Instant) -> Option<String> {
        self.state
            .read()
            .await
            .notice
            .as_ref()
            .filter(|n| n.is_visible_at(now))
            .map(|n| n.message.clone())
    }

    pub async fn is_busy(&self) -> bool {
        self.state.read().await.flight.is_in_flight()
    }

    pub async fn snapshot(&self) -> ManagerSnapshot {
        let now = Instant::now();
        let state = self.state.read().await;
        ManagerSnapshot {
            view: state.view,
            prompts: state.prompts.clone(),
            total: state.total,
            filter: state.filter.clone(),
            draft: state.draft.clone(),
            error: state.error.clone(),
            notice: state
                .notice
                .as_ref()
                .filter(|n| n.is_visible_at(now))
                .map(|n| n.message.clone()),
            busy: state.flight.is_in_flight(),
        }
    }
}

fn describe(err: &ClientError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        format!("{}: {}", fallback, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_ttl() {
        let notice = Notice::new("saved");
        assert!(notice.is_visible_at(notice.posted_at));
        assert!(notice.is_visible_at(notice.posted_at + Duration::from_millis(2999)));
        assert!(!notice.is_visible_at(notice.posted_at + NOTICE_TTL));
    }
}
