//! Render domain types

use serde::{Deserialize, Serialize};

/// Render quality requested by the caller
///
/// Unknown strings deserialize to [`Quality::Medium`] so that a typo in a
/// request degrades to the default instead of failing the render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Command-line flag understood by the rendering toolchain
    pub fn flag(&self) -> &'static str {
        match self {
            Quality::Low => "-ql",
            Quality::Medium => "-qm",
            Quality::High => "-qh",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl From<String> for Quality {
    fn from(value: String) -> Self {
        Quality::from(value.as_str())
    }
}

impl From<&str> for Quality {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Quality::Low,
            "high" => Quality::High,
            _ => Quality::Medium,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
