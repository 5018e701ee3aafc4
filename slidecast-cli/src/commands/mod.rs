//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod health;
mod material;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use slidecast_client::ClientError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a video for a material, step by step
    Generate {
        /// Material ID
        material_id: String,

        /// Render quality
        #[arg(short, long, default_value = "medium", value_parser = ["low", "medium", "high"])]
        quality: String,

        /// Write the generated source to this file
        #[arg(long)]
        save_code: Option<String>,

        /// Run all steps server-side in a single request
        #[arg(long)]
        one_shot: bool,
    },
    /// Show the normalized slides of a material
    Prepare {
        /// Material ID
        material_id: String,
    },
    /// Check that the server is reachable
    Health,
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate {
            material_id,
            quality,
            save_code,
            one_shot,
        } => {
            generate::handle_generate(
                config,
                &material_id,
                quality.as_str().into(),
                save_code.as_deref(),
                one_shot,
            )
            .await
        }
        Commands::Prepare { material_id } => material::handle_prepare(config, &material_id).await,
        Commands::Health => health::handle_health(config).await,
    }
}

/// Turn a client error into a user-facing error, printing the server's hint
fn report(err: ClientError, what: &str) -> anyhow::Error {
    if let Some(hint) = err.hint() {
        eprintln!("{} {}", "hint:".yellow().bold(), hint);
    }
    anyhow::anyhow!("{}: {}", what, err)
}
