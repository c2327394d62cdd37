//! CLI module

pub mod chat;
pub mod commands;
pub mod render;

pub fn run() -> anyhow::Result<()> {
    commands::run()
}
