//! Generate command handler
//!
//! Walks the four generation steps against the server, printing progress,
//! or asks the server to run them all at once.

use anyhow::{Context, Result, bail};
use colored::*;
use slidecast_client::SlidecastClient;
use slidecast_core::domain::render::Quality;
use slidecast_core::dto::code::CodeRequest;
use slidecast_core::dto::render::{GenerateRequest, RenderRequest};
use slidecast_core::dto::storyboard::StoryboardRequest;

use crate::config::Config;

const TOTAL_STEPS: usize = 4;

fn step(n: usize, label: &str) {
    println!(
        "{} {}",
        format!("Step {}/{}:", n, TOTAL_STEPS).cyan().bold(),
        label
    );
}

pub async fn handle_generate(
    config: &Config,
    material_id: &str,
    quality: Quality,
    save_code: Option<&str>,
    one_shot: bool,
) -> Result<()> {
    let client = SlidecastClient::new(&config.server_url);

    let video_url = if one_shot {
        println!("Generating video for {} ({} quality)...", material_id.cyan(), quality);
        client
            .generate(&GenerateRequest {
                material_id: Some(material_id.to_string()),
                quality,
            })
            .await
            .map_err(|e| super::report(e, "Generation failed"))?
            .video_url
    } else {
        run_steps(&client, material_id, quality, save_code).await?
    };

    println!("{}", "✓ Video generated!".green().bold());
    println!("  URL: {}{}", client.base_url().dimmed(), video_url.cyan());
    Ok(())
}

async fn run_steps(
    client: &SlidecastClient,
    material_id: &str,
    quality: Quality,
    save_code: Option<&str>,
) -> Result<String> {
    step(1, "Preparing slides");
    let prepared = match client.prepare(material_id).await {
        Ok(prepared) => prepared,
        Err(e) if e.is_not_found() => bail!("Material not found: {}", material_id),
        Err(e) => return Err(super::report(e, "Failed to prepare material")),
    };
    println!(
        "  {} slide(s) on {}",
        prepared.total_slides,
        prepared.topic.bold()
    );

    step(2, "Writing storyboard");
    let storyboard = client
        .storyboard(&StoryboardRequest {
            slides: prepared.slides,
            topic: Some(prepared.topic.clone()),
        })
        .await
        .map_err(|e| super::report(e, "Storyboard generation failed"))?;
    println!("  {} scene(s)", storyboard.scenes.len());
    for scene in &storyboard.scenes {
        let duration = scene
            .duration_seconds
            .map(|s| format!("{:.0}s", s))
            .unwrap_or_else(|| "?".to_string());
        println!("    - {} {}", scene.title, format!("({})", duration).dimmed());
    }

    step(3, "Generating animation code");
    let code = client
        .code(&CodeRequest {
            storyboard: storyboard.storyboard,
            topic: Some(prepared.topic),
        })
        .await
        .map_err(|e| super::report(e, "Code generation failed"))?;
    println!("  {} line(s)", code.generated_source.lines().count());

    if let Some(path) = save_code {
        std::fs::write(path, &code.generated_source)
            .with_context(|| format!("Failed to write generated code to {}", path))?;
        println!("  Saved to {}", path.dimmed());
    }

    step(4, &format!("Rendering video ({} quality)", quality));
    let rendered = client
        .render(&RenderRequest {
            generated_source: code.generated_source,
            material_id: Some(prepared.material_id),
            quality,
        })
        .await
        .map_err(|e| super::report(e, "Render failed"))?;

    Ok(rendered.video_url)
}
