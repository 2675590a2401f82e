//! Command-line interface for hitl-agent.

use clap::{Args, Parser, Subcommand};

use crate::models::DEFAULT_MODEL;

/// Thread used when `--thread` is not given.
pub const DEFAULT_THREAD: &str = "buy_thread";

/// Human-in-the-loop stock agent
#[derive(Parser, Debug)]
#[command(name = "hitl-agent", version, about = "Tool-calling agent that asks before it buys")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat interactively; purchases pause for approval
    Chat(ChatArgs),
    /// Run the scripted price check and purchase
    Demo(DemoArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model to use (format: provider:model, e.g., groq:llama-3.3-70b-versatile)
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Conversation thread id
    #[arg(short, long, default_value = DEFAULT_THREAD)]
    pub thread: String,
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,
}

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}
