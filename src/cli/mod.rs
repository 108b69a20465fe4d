//! CLI module for Solace
//!
//! Provides the commands:
//! - `chat`: interactive conversation with inline assessments
//! - `analyze`: one-shot signal extraction printed as JSON
//! - `assess`: standalone questionnaire

use crate::settings::AppConfig;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod assess;
pub mod chat;
mod input;

/// Solace support assistant CLI
#[derive(Parser, Debug)]
#[command(name = "solace")]
#[command(about = "Conversational mental-health support assistant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Chat {
        /// User identifier attached to the session
        #[arg(long)]
        user: Option<String>,
        /// Answer from built-in templates instead of a language model
        #[arg(long)]
        offline: bool,
    },
    /// Print sentiment, intent and crisis signals for a message
    Analyze {
        /// Message to analyze
        text: String,
    },
    /// Run a questionnaire (phq9, gad7 or custom)
    Assess {
        /// Assessment type
        #[arg(value_name = "TYPE")]
        kind: String,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Chat { user, offline }) => chat::run(&config, user, offline).await,
        Some(Commands::Analyze { text }) => analyze::run(&text),
        Some(Commands::Assess { kind }) => assess::run(&kind).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
