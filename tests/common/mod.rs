// Shared test fixtures: an in-memory assistant backend

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use localassist::api::{
    Acknowledgement, Activation, Answer, AssistantBackend, Health, PromptDraft, PromptFilter,
    PromptPage, PromptPatch, PromptTemplate, PromptType,
};
use localassist::error::{ClientError, ClientResult};

/// Holds a call open until the test releases it
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<PromptTemplate>>,
    answers: Mutex<VecDeque<ClientResult<Answer>>>,
    /// (status, detail) returned by every mutating call when set
    mutation_failure: Mutex<Option<(u16, String)>>,
    list_failure: Mutex<Option<String>>,
    pub gate: Option<Gate>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Gate::default()),
            ..Self::default()
        }
    }

    pub fn with_prompts(self, prompts: Vec<PromptTemplate>) -> Self {
        *self.prompts.lock().unwrap() = prompts;
        self
    }

    pub fn push_answer(&self, answer: ClientResult<Answer>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn fail_mutations(&self, status: u16, detail: &str) {
        *self.mutation_failure.lock().unwrap() = Some((status, detail.to_string()));
    }

    pub fn fail_lists(&self, message: &str) {
        *self.list_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn stored(&self, id: i64) -> Option<PromptTemplate> {
        self.prompts.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_error(&self) -> Option<ClientError> {
        self.mutation_failure
            .lock()
            .unwrap()
            .clone()
            .map(|(status, message)| ClientError::Request { status, message })
    }

    fn not_found(id: i64) -> ClientError {
        ClientError::Request {
            status: 404,
            message: format!("Prompt with ID {} not found", id),
        }
    }

    fn make_exclusive(prompts: &mut [PromptTemplate], id: i64) {
        let Some(prompt_type) = prompts.iter().find(|p| p.id == id).map(|p| p.prompt_type) else {
            return;
        };
        for p in prompts.iter_mut().filter(|p| p.prompt_type == prompt_type) {
            p.is_active = p.id == id;
        }
    }
}

pub fn template(id: i64, title: &str, prompt_type: PromptType, is_active: bool) -> PromptTemplate {
    let now = Utc::now().naive_utc();
    PromptTemplate {
        id,
        title: title.to_string(),
        content: format!("{} content", title),
        prompt_type,
        tags: String::new(),
        version: 1,
        created_at: now,
        updated_at: now,
        is_active,
    }
}

pub fn answer(text: &str) -> Answer {
    Answer {
        answer: text.to_string(),
        mode: "local".to_string(),
        latency_seconds: 0.8,
    }
}

#[async_trait]
impl AssistantBackend for FakeBackend {
    async fn health(&self) -> ClientResult<Health> {
        self.log("health".into());
        Ok(Health {
            status: "ok".into(),
            mode: "local".into(),
        })
    }

    async fn ask(&self, query: &str) -> ClientResult<Answer> {
        self.log(format!("ask:{}", query));
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(answer("ok")))
    }

    async fn list_prompts(&self, filter: &PromptFilter) -> ClientResult<PromptPage> {
        let label = filter.prompt_type.map(|t| t.as_str()).unwrap_or("all");
        self.log(format!("list:{}", label));
        if let Some(message) = self.list_failure.lock().unwrap().clone() {
            return Err(ClientError::Network(message));
        }

        let prompts: Vec<PromptTemplate> = self
            .prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.prompt_type.map_or(true, |t| p.prompt_type == t))
            .cloned()
            .collect();

        Ok(PromptPage {
            total: prompts.len() as u64,
            prompts,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn get_prompt(&self, id: i64) -> ClientResult<PromptTemplate> {
        self.log(format!("get:{}", id));
        self.stored(id).ok_or_else(|| Self::not_found(id))
    }

    async fn create_prompt(&self, draft: &PromptDraft) -> ClientResult<PromptTemplate> {
        self.log(format!("create:{}", draft.title));
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }

        let mut prompts = self.prompts.lock().unwrap();
        let id = prompts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let mut created = template(
            id,
            &draft.title,
            draft.prompt_type.unwrap_or(PromptType::ReasonerSystem),
            draft.is_active,
        );
        created.content = draft.content.clone();
        created.tags = draft.tags.clone();
        prompts.push(created.clone());
        if draft.is_active {
            Self::make_exclusive(&mut prompts, id);
        }
        Ok(created)
    }

    async fn update_prompt(&self, id: i64, patch: &PromptPatch) -> ClientResult<PromptTemplate> {
        self.log(format!("update:{}", id));
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }

        let mut prompts = self.prompts.lock().unwrap();
        let updated = {
            let prompt = prompts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| Self::not_found(id))?;
            if let Some(title) = &patch.title {
                prompt.title = title.clone();
            }
            if let Some(content) = &patch.content {
                prompt.content = content.clone();
            }
            if let Some(prompt_type) = patch.prompt_type {
                prompt.prompt_type = prompt_type;
            }
            if let Some(tags) = &patch.tags {
                prompt.tags = tags.clone();
            }
            if let Some(active) = patch.is_active {
                prompt.is_active = active;
            }
            prompt.version += 1;
            prompt.clone()
        };
        if updated.is_active {
            Self::make_exclusive(&mut prompts, id);
        }
        Ok(updated)
    }

    async fn delete_prompt(&self, id: i64) -> ClientResult<Acknowledgement> {
        self.log(format!("delete:{}", id));
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }

        let mut prompts = self.prompts.lock().unwrap();
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        if prompts.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(Acknowledgement {
            message: format!("Prompt {} deleted successfully", id),
        })
    }

    async fn activate_prompt(&self, id: i64) -> ClientResult<Activation> {
        self.log(format!("activate:{}", id));
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if let Some(err) = self.mutation_error() {
            return Err(err);
        }

        let mut prompts = self.prompts.lock().unwrap();
        Self::make_exclusive(&mut prompts, id);
        let prompt = prompts
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(Activation {
            id,
            title: prompt.title.clone(),
            prompt_type: prompt.prompt_type,
            is_active: prompt.is_active,
            message: format!(
                "Prompt '{}' activated for type '{}'",
                prompt.title, prompt.prompt_type
            ),
        })
    }
}
