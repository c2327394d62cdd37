//! Interactive chat loop

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render;
use crate::controller::{QueryController, SkipReason, SubmitOutcome};

/// A line typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Ask(String),
    List,
    Remove(String),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return ChatCommand::Ask(line.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match name {
            "q" | "quit" | "exit" => ChatCommand::Quit,
            "l" | "list" => ChatCommand::List,
            "rm" | "remove" if !arg.is_empty() => ChatCommand::Remove(arg.to_string()),
            "clear" => ChatCommand::Clear,
            "h" | "help" => ChatCommand::Help,
            _ => ChatCommand::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "\
Type a question and press enter.
  :list          show every query in this session
  :rm <id>       remove a query (id prefix is enough)
  :clear         remove all answered queries
  :quit          leave
";

pub async fn run(controller: &QueryController, backend_status: &str) -> Result<()> {
    println!("Backend: {}", backend_status);
    println!("Type :help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Quit => break,
            ChatCommand::Help => print!("{}", HELP),
            ChatCommand::List => print!("{}", render::records(&controller.records().await)),
            ChatCommand::Clear => {
                let removed = controller.clear_settled().await;
                println!("Removed {} quer{}", removed, if removed == 1 { "y" } else { "ies" });
            }
            ChatCommand::Remove(prefix) => match controller.find_by_prefix(&prefix).await {
                Some(record) => {
                    controller.remove(&record.id).await;
                    println!("Removed [{}]", &record.id[..8.min(record.id.len())]);
                }
                None => println!("No single query matches '{}'", prefix),
            },
            ChatCommand::Unknown(text) => println!("Unknown command: {} (try :help)", text),
            ChatCommand::Ask(text) => match controller.submit(&text).await {
                SubmitOutcome::Settled(record) => print!("{}", render::record(&record)),
                SubmitOutcome::Ignored(SkipReason::EmptyQuery) => {}
                SubmitOutcome::Ignored(SkipReason::Busy) => {
                    println!("Still waiting on the previous question")
                }
            },
        }
    }

    Ok(())
}
