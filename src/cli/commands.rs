//! CLI commands

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::{chat, render};
use crate::api::{AssistantBackend, AssistantClient, PromptDraft, PromptType};
use crate::config::Config;
use crate::controller::{
    AutoConfirm, Confirm, Outcome, PromptManager, QueryController, SkipReason, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "localassist")]
#[command(about = "Ask a local AI assistant and manage its prompt templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, env = "LOCALASSIST_URL")]
    base_url: Option<String>,

    /// Config path (default: ~/.localassist/config.yml)
    #[arg(long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend health
    Health,

    /// Ask a single question
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Ask questions interactively
    Chat,

    /// Manage prompt templates
    Prompts {
        #[command(subcommand)]
        command: PromptCommands,
    },
}

#[derive(Subcommand)]
enum PromptCommands {
    /// List prompt templates
    List {
        /// Filter by type (reasoner_system, verifier_system, correction_feedback)
        #[arg(long = "type")]
        prompt_type: Option<String>,

        /// Filter by tag substring
        #[arg(long)]
        tags: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one template
    Show {
        id: i64,
    },

    /// Create a template
    Create {
        #[arg(long)]
        title: String,

        #[arg(long = "type")]
        prompt_type: String,

        #[arg(long)]
        content: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,

        /// Activate it (deactivates others of the same type)
        #[arg(long)]
        active: bool,
    },

    /// Edit a template
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long = "type")]
        prompt_type: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a template
    Delete {
        id: i64,

        /// Skip the confirmation question
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Make a template the active one for its type
    Activate {
        id: i64,
    },
}

/// Confirms on the terminal with a `y/N` question
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        std::io::stdout().flush().ok();

        let answer = tokio::task::block_in_place(|| {
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer).map(|_| answer)
        });
        match answer {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn parse_type(value: Option<&str>) -> Result<Option<PromptType>> {
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .map(PromptType::from_str)
        .transpose()?)
}

/// Print the manager state and fail on an unsuccessful outcome
async fn report(manager: &PromptManager, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Done => {
            if let Some(notice) = manager.notice().await {
                println!("{}", notice);
            }
            Ok(())
        }
        Outcome::Declined => {
            println!("Cancelled");
            Ok(())
        }
        Outcome::Busy => anyhow::bail!("Another operation is still running"),
        Outcome::Invalid(message) | Outcome::Failed(message) => anyhow::bail!(message),
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_base_url(cli.base_url);
    tracing::debug!("Using backend at {}", config.base_url);

    let backend: Arc<dyn AssistantBackend> = Arc::new(AssistantClient::new(&config.base_url));

    // Create a multi-threaded runtime for CLI operations
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        match cli.command {
        Commands::Health => {
            println!("Backend: {}", render::health_line(&backend.health().await));
            Ok(())
        }

        Commands::Ask { query } => {
            let controller = QueryController::new(backend);

            match controller.submit(&query.join(" ")).await {
                SubmitOutcome::Settled(record) => {
                    print!("{}", render::record(&record));
                    if record.is_error() {
                        anyhow::bail!("Query failed");
                    }
                    Ok(())
                }
                SubmitOutcome::Ignored(SkipReason::EmptyQuery) => {
                    anyhow::bail!("Query cannot be empty")
                }
                SubmitOutcome::Ignored(SkipReason::Busy) => {
                    anyhow::bail!("Another query is still running")
                }
            }
        }

        Commands::Chat => {
            let status = render::health_line(&backend.health().await);
            let controller = QueryController::new(backend);
            chat::run(&controller, &status).await
        }

        Commands::Prompts { command } => {
            let manager = PromptManager::with_page_size(backend.clone(), config.page_size);
            run_prompts(&manager, backend.as_ref(), command).await
        }
        }
    })
}

async fn run_prompts(
    manager: &PromptManager,
    backend: &dyn AssistantBackend,
    command: PromptCommands,
) -> Result<()> {
    match command {
        PromptCommands::List {
            prompt_type,
            tags,
            page,
            page_size,
        } => {
            let prompt_type = parse_type(prompt_type.as_deref())?;
            manager.set_tags(tags).await;
            manager.set_page(page).await;
            if let Some(size) = page_size {
                manager.set_page_size(size).await;
            }
            list_with(manager, prompt_type).await
        }

        PromptCommands::Show { id } => {
            let template = backend.get_prompt(id).await?;
            print!("{}", render::prompt_detail(&template));
            Ok(())
        }

        PromptCommands::Create {
            title,
            prompt_type,
            content,
            tags,
            active,
        } => {
            let prompt_type = parse_type(Some(prompt_type.as_str()))?;
            manager.begin_create().await;
            manager
                .edit_draft(|draft| {
                    *draft = PromptDraft {
                        title,
                        content,
                        prompt_type,
                        tags,
                        is_active: active,
                    }
                })
                .await;
            let outcome = manager.submit_draft().await;
            report(manager, outcome).await
        }

        PromptCommands::Edit {
            id,
            title,
            prompt_type,
            content,
            tags,
            active,
        } => {
            let prompt_type = parse_type(prompt_type.as_deref())?;
            let template = backend.get_prompt(id).await?;
            manager.begin_edit(&template).await;
            manager
                .edit_draft(|draft| {
                    if let Some(title) = title {
                        draft.title = title;
                    }
                    if let Some(content) = content {
                        draft.content = content;
                    }
                    if prompt_type.is_some() {
                        draft.prompt_type = prompt_type;
                    }
                    if let Some(tags) = tags {
                        draft.tags = tags;
                    }
                    if let Some(active) = active {
                        draft.is_active = active;
                    }
                })
                .await;
            let outcome = manager.submit_draft().await;
            report(manager, outcome).await
        }

        PromptCommands::Delete { id, yes } => {
            let outcome = if yes {
                manager.delete(id, &AutoConfirm(true)).await
            } else {
                manager.delete(id, &StdinConfirm).await
            };
            report(manager, outcome).await
        }

        PromptCommands::Activate { id } => {
            let outcome = manager.activate(id).await;
            report(manager, outcome).await?;
            let snapshot = manager.snapshot().await;
            print!("{}", render::prompt_table(&snapshot.prompts, snapshot.total));
            Ok(())
        }
    }
}

async fn list_with(manager: &PromptManager, prompt_type: Option<PromptType>) -> Result<()> {
    let outcome = manager.refresh(prompt_type).await;
    let snapshot = manager.snapshot().await;
    if let Outcome::Failed(message) = outcome {
        anyhow::bail!(message);
    }
    print!("{}", render::manager(&snapshot));
    Ok(())
}
