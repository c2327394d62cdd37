//! Query lifecycle: one tracked record per question asked

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::flight::Flight;
use crate::api::{AssistantBackend, Answer};

const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// A question asked during this session and its eventual outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantQueryRecord {
    pub id: String,
    pub query: String,
    pub response: Option<Answer>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AssistantQueryRecord {
    fn pending(query: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query,
            response: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Neither response nor error yet
    pub fn is_pending(&self) -> bool {
        self.response.is_none() && self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Why a submission was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyQuery,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Ignored(SkipReason),
    Settled(AssistantQueryRecord),
}

#[derive(Debug, Default)]
struct QueryState {
    /// Oldest first; new records are appended
    records: Vec<AssistantQueryRecord>,
    flight: Flight,
}

/// Tracks the questions asked in a session
pub struct QueryController {
    backend: Arc<dyn AssistantBackend>,
    state: RwLock<QueryState>,
}

impl QueryController {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(QueryState::default()),
        }
    }

    /// Ask `text`, tracking it as a record until the call settles
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SubmitOutcome::Ignored(SkipReason::EmptyQuery);
        }

        let record = {
            let mut state = self.state.write().await;
            if !state.flight.try_begin() {
                debug!("Dropping query while another is in flight");
                return SubmitOutcome::Ignored(SkipReason::Busy);
            }
            let record = AssistantQueryRecord::pending(query.to_string());
            state.records.push(record.clone());
            record
        };

        let result = self.backend.ask(&record.query).await;

        let mut state = self.state.write().await;
        state.flight.settle();

        let mut settled = record;
        match result {
            Ok(answer) => settled.response = Some(answer),
            Err(e) => {
                warn!("Query {} failed: {}", settled.id, e);
                let message = e.to_string();
                settled.error = Some(if message.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                });
            }
        }

        // Removed while in flight: report the outcome, leave the list alone
        if let Some(slot) = state.records.iter_mut().find(|r| r.id == settled.id) {
            *slot = settled.clone();
        }

        SubmitOutcome::Settled(settled)
    }

    /// Drop a record; unknown ids are ignored
    pub async fn remove(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        state.records.len() != before
    }

    /// Drop every settled record
    pub async fn clear_settled(&self) -> usize {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| r.is_pending());
        before - state.records.len()
    }

    pub async fn records(&self) -> Vec<AssistantQueryRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn get(&self, id: &str) -> Option<AssistantQueryRecord> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// First record whose id starts with `prefix`, if exactly one matches
    pub async fn find_by_prefix(&self, prefix: &str) -> Option<AssistantQueryRecord> {
        let state = self.state.read().await;
        let mut matches = state.records.iter().filter(|r| r.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record.clone()),
            _ => None,
        }
    }

    pub async fn is_in_flight(&self) -> bool {
        self.state.read().await.flight.is_in_flight()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
