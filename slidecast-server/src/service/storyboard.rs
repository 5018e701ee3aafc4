//! Storyboard synthesis
//!
//! One chat completion turns normalized slides into a natural-language
//! scene plan. The text is used verbatim downstream; the scene list parsed
//! from it is only used for diagnostics.

use slidecast_client::{ChatClient, CompletionOptions};
use slidecast_core::domain::slide::Slide;
use slidecast_core::domain::storyboard::{EXPECTED_RUNTIME_SECONDS, Storyboard};
use tracing::{info, warn};

use crate::service::error::{PipelineError, Result};

pub const STORYBOARD_SYSTEM_PROMPT: &str = "\
You are an educational animator who plans short animated lesson videos.

Turn the slide content you are given into a scene-by-scene storyboard with at least four scenes:
1) an introduction to the topic
2) the key concepts
3) a worked example or visualization
4) a summary

The whole video should run 60 to 120 seconds.

For every scene describe the visual elements, the animations in order with their timing, the approximate duration, and the colors and styling.

Use exactly this layout:

Scene 1: <title>
Duration: <X> seconds
Visual:
- <element>
Animations:
- <animation, order and timing>

Write natural language only. Do not include any source code.";

/// User prompt listing every slide under the topic
pub fn build_prompt(topic: &str, slides: &[Slide]) -> String {
    let slide_text = slides
        .iter()
        .map(Slide::to_prompt_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Create an animation storyboard for an educational video on \"{}\".\n\n\
         Slides:\n{}\n\n\
         Follow the requested storyboard format (Scene 1, Scene 2, ...).",
        topic, slide_text
    )
}

/// Ask the LLM for a storyboard
///
/// # Errors
/// Upstream failures from the chat client, or
/// [`PipelineError::EmptyStoryboard`] when the reply is blank.
pub async fn synthesize(
    chat: &ChatClient,
    options: CompletionOptions,
    topic: &str,
    slides: &[Slide],
) -> Result<Storyboard> {
    let prompt = build_prompt(topic, slides);
    let reply = chat
        .complete(STORYBOARD_SYSTEM_PROMPT, &prompt, options)
        .await?;

    let text = reply.trim();
    if text.is_empty() {
        return Err(PipelineError::EmptyStoryboard);
    }

    let storyboard = Storyboard::parse(text);
    if storyboard.scenes.is_empty() {
        warn!("Storyboard for '{}' has no recognizable scenes", topic);
    } else if !storyboard.within_expected_runtime() {
        warn!(
            "Storyboard for '{}' runs {:.0} s, outside {:?} s",
            topic,
            storyboard.total_duration_seconds(),
            EXPECTED_RUNTIME_SECONDS
        );
    }
    info!(
        "Storyboard for '{}' ready: {} scene(s), {} chars",
        topic,
        storyboard.scenes.len(),
        storyboard.text.len()
    );

    Ok(storyboard)
}
