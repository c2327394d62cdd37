//! Text rendering of controller state
//!
//! Everything here is a pure function of its inputs.

use std::fmt::Write;

use crate::api::{Health, PromptDraft, PromptTemplate};
use crate::controller::{AssistantQueryRecord, ManagerSnapshot, ViewState};
use crate::error::ClientResult;

const OFFLINE: &str = "offline";

/// `status (mode)`, or `offline` when the check failed
pub fn health_line(health: &ClientResult<Health>) -> String {
    match health {
        Ok(h) => h.summary(),
        Err(_) => OFFLINE.to_string(),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn record(record: &AssistantQueryRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  ({})",
        short_id(&record.id),
        record.query,
        record.timestamp.format("%H:%M:%S")
    );

    match (&record.response, &record.error) {
        (_, Some(error)) => {
            let _ = writeln!(out, "  Error: {}", error);
        }
        (Some(response), None) => {
            for line in response.answer.lines() {
                let _ = writeln!(out, "  {}", line);
            }
            let _ = writeln!(
                out,
                "  mode: {} | latency: {:.2}s",
                response.mode, response.latency_seconds
            );
        }
        (None, None) => {
            let _ = writeln!(out, "  ... asking the assistant");
        }
    }
    out
}

pub fn records(records: &[AssistantQueryRecord]) -> String {
    if records.is_empty() {
        return "No queries yet\n".to_string();
    }
    records.iter().map(record).collect::<Vec<_>>().join("\n")
}

pub fn prompt_table(prompts: &[PromptTemplate], total: u64) -> String {
    if prompts.is_empty() {
        return "No prompts found\n".to_string();
    }

    let title_width = prompts
        .iter()
        .map(|p| p.title.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(5, 40);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<tw$}  {:<19}  {:>7}  {}",
        "ID",
        "TITLE",
        "TYPE",
        "VERSION",
        "STATUS",
        tw = title_width
    );
    for p in prompts {
        let title: String = p.title.chars().take(title_width).collect();
        let _ = writeln!(
            out,
            "{:>5}  {:<tw$}  {:<19}  {:>7}  {}",
            p.id,
            title,
            p.prompt_type.as_str(),
            p.version,
            if p.is_active { "Active" } else { "Inactive" },
            tw = title_width
        );
    }
    let _ = writeln!(out, "{} of {} prompt(s)", prompts.len(), total);
    out
}

pub fn prompt_detail(p: &PromptTemplate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", p.id, p.title);
    let _ = writeln!(
        out,
        "type: {}  version: {}  {}",
        p.prompt_type,
        p.version,
        if p.is_active { "active" } else { "inactive" }
    );
    if !p.tags.trim().is_empty() {
        let _ = writeln!(out, "tags: {}", p.tag_list().join(", "));
    }
    let _ = writeln!(
        out,
        "created: {}  updated: {}",
        p.created_at.format("%Y-%m-%d %H:%M:%S"),
        p.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", p.content);
    out
}

pub fn draft(draft: &PromptDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title:   {}", draft.title);
    let _ = writeln!(
        out,
        "type:    {}",
        draft.prompt_type.map(|t| t.as_str()).unwrap_or("-")
    );
    let _ = writeln!(out, "tags:    {}", draft.tags);
    let _ = writeln!(out, "active:  {}", draft.is_active);
    let _ = writeln!(out, "content:");
    let _ = writeln!(out, "{}", draft.content);
    out
}

/// Banner, notice and the current view
pub fn manager(snapshot: &ManagerSnapshot) -> String {
    let mut out = String::new();
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {}", error);
    }
    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "* {}", notice);
    }

    match snapshot.view {
        ViewState::List => out.push_str(&prompt_table(&snapshot.prompts, snapshot.total)),
        ViewState::Create => {
            out.push_str("Create New Prompt\n");
            out.push_str(&draft(&snapshot.draft));
        }
        ViewState::Edit { id } => {
            let _ = writeln!(out, "Edit Prompt #{}", id);
            out.push_str(&draft(&snapshot.draft));
        }
    }
    out
}
