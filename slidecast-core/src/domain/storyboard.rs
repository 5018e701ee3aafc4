//! Storyboard domain types
//!
//! The storyboard is LLM-written prose. Downstream stages use the text
//! verbatim; the scene list is a best-effort reading of the requested
//! `Scene N: ... / Duration: ... / Visual: ... / Animations: ...` layout and
//! is used for diagnostics only.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Intended total runtime of a storyboard, in seconds
pub const EXPECTED_RUNTIME_SECONDS: RangeInclusive<f64> = 60.0..=120.0;

/// One planned scene of the video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub title: String,
    pub duration_seconds: Option<f64>,
    pub visual_elements: Vec<String>,
    pub animation_directives: Vec<String>,
}

/// Scene plan produced by the storyboard synthesizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storyboard {
    pub text: String,
    pub scenes: Vec<Scene>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Visual,
    Animations,
    Other,
}

impl Storyboard {
    /// Wraps storyboard text and reads whatever scenes it can find in it
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let scenes = parse_scenes(&text);
        Self { text, scenes }
    }

    /// Sum of the scene durations that could be read
    pub fn total_duration_seconds(&self) -> f64 {
        self.scenes
            .iter()
            .filter_map(|scene| scene.duration_seconds)
            .sum()
    }

    /// Whether the scene durations add up to the intended runtime window
    pub fn within_expected_runtime(&self) -> bool {
        EXPECTED_RUNTIME_SECONDS.contains(&self.total_duration_seconds())
    }
}

fn parse_scenes(text: &str) -> Vec<Scene> {
    let mut scenes: Vec<Scene> = Vec::new();
    let mut section = Section::None;

    for raw_line in text.lines() {
        let line = strip_decoration(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some(title) = scene_header(line) {
            let title = if title.is_empty() {
                format!("Scene {}", scenes.len() + 1)
            } else {
                title.to_string()
            };
            scenes.push(Scene {
                title,
                ..Scene::default()
            });
            section = Section::None;
            continue;
        }

        let Some(scene) = scenes.last_mut() else {
            continue;
        };

        if let Some((label, rest)) = line.split_once(':') {
            let label = label.trim().to_lowercase();
            let rest = rest.trim();
            let next = match label.as_str() {
                "duration" | "time" | "timing" => {
                    scene.duration_seconds = first_number(rest);
                    Some(Section::None)
                }
                "visual" | "visuals" | "visual elements" => Some(Section::Visual),
                "animation" | "animations" => Some(Section::Animations),
                _ if !is_bullet(raw_line) && label.split_whitespace().count() <= 3 => {
                    Some(Section::Other)
                }
                _ => None,
            };
            if let Some(next) = next {
                section = next;
                if !rest.is_empty() {
                    push_item(scene, section, rest);
                }
                continue;
            }
        }

        if is_bullet(raw_line) {
            push_item(scene, section, strip_bullet(raw_line));
        }
    }

    scenes
}

/// Returns the scene title when the line is a `Scene N: Title` header
fn scene_header(line: &str) -> Option<&str> {
    let lower = line.to_lowercase();
    let rest = lower.strip_prefix("scene")?;
    let digits = rest.trim_start();
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let colon = line.find(':')?;
    let number_part = &line["scene".len()..colon];
    if !number_part
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c.is_whitespace())
    {
        return None;
    }
    Some(line[colon + 1..].trim())
}

fn push_item(scene: &mut Scene, section: Section, item: &str) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }
    match section {
        Section::Visual => scene.visual_elements.push(item.to_string()),
        Section::Animations => scene.animation_directives.push(item.to_string()),
        Section::None | Section::Other => {}
    }
}

fn strip_decoration(line: &str) -> &str {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim()
}

fn is_bullet(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("- ") || t.starts_with("* ") || t.starts_with("• ")
}

fn strip_bullet(line: &str) -> &str {
    let t = line.trim_start();
    t.strip_prefix("- ")
        .or_else(|| t.strip_prefix("* "))
        .or_else(|| t.strip_prefix("• "))
        .unwrap_or(t)
        .trim()
}

fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.trim_end_matches('.').parse().ok()
}
