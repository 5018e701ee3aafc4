//! Code synthesis
//!
//! One chat completion translates the storyboard into a script for the
//! rendering toolchain. The reply is reduced to its code block; sanitizing
//! and syntax checking happen at render time.

use slidecast_client::{ChatClient, CompletionOptions};
use slidecast_script::extract_code_block;
use tracing::info;

use crate::service::error::Result;

/// Bounds on the explicit duration of each animation call, in seconds
pub const MIN_PLAY_SECONDS: f32 = 2.0;
pub const MAX_PLAY_SECONDS: f32 = 4.0;

/// Minimum number of animation calls in the generated scene
pub const MIN_PLAY_CALLS: usize = 20;

/// System instruction for code generation, for the given scene class
pub fn system_prompt(scene_class: &str) -> String {
    format!(
        "You are an expert Manim Community Edition programmer. Write complete code for an educational video.

Requirements:
- Start with: from manim import *
- Define exactly one scene: class {scene_class}(Scene):
- Implement the storyboard scene by scene: one block of code per storyboard scene, matching its visuals, animations and timing.
- BLUE for titles, GREEN for formulas, standard Manim styling otherwise.
- No narration or audio.

Syntax rules:
- Valid Python 3.11 with 4-space indentation and balanced brackets.
- Inside f-strings, never reuse the enclosing quote character.
- Every self.play(...) call must be complete on a single logical line.
- Never leave a bare expression or a dangling trailing comma on its own line.
- Every self.play(...) call must pass run_time between {min:.1} and {max:.1} seconds.
- Use at least {calls} self.play(...) calls, with self.wait(1) after each scene.
- Do not use MathTex or Tex. Write formulas with Text(...) and plain characters.

Return only the Python code, with no explanation.",
        scene_class = scene_class,
        min = MIN_PLAY_SECONDS,
        max = MAX_PLAY_SECONDS,
        calls = MIN_PLAY_CALLS,
    )
}

pub fn build_prompt(topic: &str, storyboard: &str) -> String {
    format!(
        "Topic: {}\n\nStoryboard:\n{}\n\nGenerate the Manim code following the requirements.",
        topic, storyboard
    )
}

/// Ask the LLM for the animation script
///
/// # Errors
/// Upstream failures from the chat client, or
/// [`crate::service::error::PipelineError::EmptyCode`] when no code can be
/// extracted from the reply.
pub async fn synthesize(
    chat: &ChatClient,
    options: CompletionOptions,
    scene_class: &str,
    topic: &str,
    storyboard: &str,
) -> Result<String> {
    let reply = chat
        .complete(&system_prompt(scene_class), &build_prompt(topic, storyboard), options)
        .await?;

    let code = extract_code_block(&reply)?;
    info!("Generated {} lines of code for '{}'", code.lines().count(), topic);

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_scene_and_bounds() {
        let prompt = system_prompt("EducationalVideo");
        assert!(prompt.contains("class EducationalVideo(Scene):"));
        assert!(prompt.contains("between 2.0 and 4.0 seconds"));
        assert!(prompt.contains("at least 20 self.play"));
        assert!(prompt.contains("Do not use MathTex"));
        // The syntax check only understands the 3.11 grammar
        assert!(prompt.contains("Valid Python 3.11"));
    }

    #[test]
    fn test_prompt_embeds_storyboard() {
        let prompt = build_prompt("Fractions", "Scene 1: Intro");
        assert!(prompt.starts_with("Topic: Fractions"));
        assert!(prompt.contains("Storyboard:\nScene 1: Intro"));
    }
}
