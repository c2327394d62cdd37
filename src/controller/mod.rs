//! Controllers owning session state

pub mod flight;
pub mod prompts;
pub mod query;

pub use flight::Flight;
pub use prompts::{AutoConfirm, Confirm, ManagerSnapshot, Outcome, PromptManager, ViewState, NOTICE_TTL};
pub use query::{AssistantQueryRecord, QueryController, SkipReason, SubmitOutcome};
