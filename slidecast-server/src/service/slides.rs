//! Slide normalization
//!
//! Materials store slides in several shapes. Normalization turns any of them
//! into an ordered, 1-indexed list of [`Slide`] values.

use slidecast_core::domain::material::{RawSlide, RawSlides};
use slidecast_core::domain::slide::{Slide, UNTITLED_SLIDE};
use uuid::Uuid;

use crate::service::error::{PipelineError, Result};

/// Explicit slide separator in freeform text
pub const SLIDE_DELIMITER: &str = "---";

/// Fallback separator: two or more blank lines
pub const BLANK_LINE_DELIMITER: &str = "\n\n\n";

/// Lines this long or longer are body text, not headings
const MAX_HEADING_CHARS: usize = 80;

/// Parse a material identifier from request input
pub fn parse_material_id(raw: Option<&str>) -> Result<Uuid> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PipelineError::InputInvalid("material_id is required".to_string()))?;

    Uuid::parse_str(raw)
        .map_err(|_| PipelineError::InputInvalid(format!("Invalid material_id format: {}", raw)))
}

/// Normalize raw slide data
///
/// # Errors
/// Returns [`PipelineError::EmptyContent`] when no slide has any content.
pub fn normalize_slides(raw: &RawSlides) -> Result<Vec<Slide>> {
    let slides = match raw {
        RawSlides::Empty => Vec::new(),
        RawSlides::Items(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| item_to_slide(i as u32 + 1, item))
            .collect(),
        RawSlides::Text(text) => split_text(text)
            .into_iter()
            .enumerate()
            .map(|(i, part)| Slide {
                slide_number: i as u32 + 1,
                title: extract_title(part),
                content: part.to_string(),
            })
            .collect(),
    };

    if slides.iter().all(|slide| slide.content.trim().is_empty()) {
        return Err(PipelineError::EmptyContent);
    }

    Ok(slides)
}

fn item_to_slide(position: u32, item: &RawSlide) -> Slide {
    match item {
        RawSlide::Structured {
            subtitle,
            content,
            page,
        } => Slide {
            slide_number: page.unwrap_or(position),
            title: subtitle
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Slide {}", position)),
            content: content.clone(),
        },
        RawSlide::Plain(text) => Slide {
            slide_number: position,
            title: extract_title(text),
            content: text.trim().to_string(),
        },
    }
}

/// Split freeform text into non-empty, trimmed fragments
///
/// Prefers the explicit delimiter, then blank-line gaps, else the whole text.
pub fn split_text(text: &str) -> Vec<&str> {
    let parts: Vec<&str> = if text.contains(SLIDE_DELIMITER) {
        text.split(SLIDE_DELIMITER).collect()
    } else if text.contains(BLANK_LINE_DELIMITER) {
        text.split(BLANK_LINE_DELIMITER).collect()
    } else {
        vec![text]
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Derive a heading from a slide body
///
/// A markdown heading wins; otherwise the first non-empty line shorter than
/// 80 characters; otherwise a placeholder.
pub fn extract_title(body: &str) -> String {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('#') {
            return line.trim_start_matches('#').trim().to_string();
        }
        if line.chars().count() < MAX_HEADING_CHARS {
            return line.to_string();
        }
    }
    UNTITLED_SLIDE.to_string()
}
