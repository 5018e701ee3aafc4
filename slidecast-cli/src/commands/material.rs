//! Material command handlers

use anyhow::{Result, bail};
use colored::*;
use slidecast_client::SlidecastClient;

use crate::config::Config;

/// Print the normalized slides of a material
pub async fn handle_prepare(config: &Config, material_id: &str) -> Result<()> {
    let client = SlidecastClient::new(&config.server_url);

    let prepared = match client.prepare(material_id).await {
        Ok(prepared) => prepared,
        Err(e) if e.is_not_found() => bail!("Material not found: {}", material_id),
        Err(e) => return Err(super::report(e, "Failed to prepare material")),
    };

    println!("{}", "Material".bold().underline());
    println!("  ID:     {}", prepared.material_id.cyan());
    println!("  Topic:  {}", prepared.topic.bold());
    println!("  Slides: {}", prepared.total_slides);
    println!();

    for slide in &prepared.slides {
        println!(
            "{} {}",
            format!("[{}]", slide.slide_number).dimmed(),
            slide.title.bold()
        );
        for line in slide.content.lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}
