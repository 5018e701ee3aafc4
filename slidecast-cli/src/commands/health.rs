//! Health command handler

use anyhow::Result;
use colored::*;
use slidecast_client::SlidecastClient;

use crate::config::Config;

pub async fn handle_health(config: &Config) -> Result<()> {
    let client = SlidecastClient::new(&config.server_url);

    client
        .health()
        .await
        .map_err(|e| super::report(e, "Server is not healthy"))?;

    println!(
        "{} {}",
        "✓ Server is up:".green().bold(),
        client.base_url().cyan()
    );
    Ok(())
}
