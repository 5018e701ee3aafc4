//! Slidecast CLI
//!
//! Command-line interface for driving the slidecast generation server.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "slidecast")]
#[command(about = "Turn lesson materials into animated videos", long_about = None)]
struct Cli {
    /// Generation server URL
    #[arg(
        long,
        env = "SLIDECAST_SERVER_URL",
        default_value = "http://localhost:8080"
    )]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
