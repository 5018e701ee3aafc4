//! Material domain types
//!
//! A material is a lesson record owned by the content store. The pipeline only
//! reads its topic and slide data, and writes back the published video location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Topic used when a material carries neither a topic nor a title
pub const DEFAULT_TOPIC: &str = "Educational Topic";

/// Lesson material record
///
/// `slides` is kept as raw JSON because the content store holds several
/// historical shapes (structured slide objects, plain strings, one text blob).
/// Use [`Material::raw_slides`] to get a typed view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub title: Option<String>,
    pub topic: Option<String>,
    #[serde(default)]
    pub slides: JsonValue,
    pub video_url: Option<String>,
    pub video_generated_at: Option<DateTime<Utc>>,
}

impl Material {
    /// Topic to present to the generators: topic, then title, then a placeholder
    pub fn display_topic(&self) -> &str {
        [self.topic.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TOPIC)
    }

    /// Typed view over the stored slide data
    pub fn raw_slides(&self) -> RawSlides {
        RawSlides::from(&self.slides)
    }
}

/// Slide data as found in the content store, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawSlides {
    /// No slide data at all (null, empty list, empty object)
    Empty,
    /// A list of slides, one element per slide
    Items(Vec<RawSlide>),
    /// A single block of freeform text that still has to be split
    Text(String),
}

/// One element of a slide list
#[derive(Debug, Clone, PartialEq)]
pub enum RawSlide {
    /// A structured slide object
    Structured {
        subtitle: Option<String>,
        content: String,
        page: Option<u32>,
    },
    /// A plain string (or any other scalar) used as the slide body
    Plain(String),
}

impl RawSlides {
    /// Returns `true` when there is nothing to normalize
    pub fn is_empty(&self) -> bool {
        match self {
            RawSlides::Empty => true,
            RawSlides::Items(items) => items.is_empty(),
            RawSlides::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<&JsonValue> for RawSlides {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RawSlides::Empty,
            JsonValue::Array(items) if items.is_empty() => RawSlides::Empty,
            JsonValue::Array(items) => RawSlides::Items(items.iter().map(RawSlide::from).collect()),
            JsonValue::Object(map) if map.is_empty() => RawSlides::Empty,
            JsonValue::Object(_) => RawSlides::Items(vec![RawSlide::from(value)]),
            JsonValue::String(text) => RawSlides::Text(text.clone()),
            other => RawSlides::Text(other.to_string()),
        }
    }
}

impl From<&JsonValue> for RawSlide {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => RawSlide::Structured {
                subtitle: map
                    .get("subtitle")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                content: map.get("content").map(content_text).unwrap_or_default(),
                page: map
                    .get("page")
                    .and_then(JsonValue::as_u64)
                    .and_then(|p| u32::try_from(p).ok()),
            },
            other => RawSlide::Plain(scalar_text(other)),
        }
    }
}

/// Flattens a slide `content` field: lists become newline-joined lines
fn content_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Array(lines) => lines
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
