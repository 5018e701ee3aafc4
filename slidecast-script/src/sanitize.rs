//! Script sanitization
//!
//! Deterministic text repairs for defects that generated scripts show often
//! enough to fix blindly. Every repair is a pure string transform and the
//! whole pass is idempotent: sanitizing a sanitized script changes nothing.
//!
//! Repairs, in order:
//! 1. Remove U+FFFD replacement characters left by broken encodings
//! 2. Remove stray markdown fence markers
//! 3. Swap the LaTeX-backed text primitives for plain `Text(`
//! 4. Expand tabs to four spaces and strip trailing whitespace per line
//! 5. Drop lines that only construct a right-angle marker
//! 6. Strip leading blank space from the document

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const REPLACEMENT_CHAR: char = '\u{FFFD}';

static FENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:python)?").expect("Valid fence marker regex"));

static LATEX_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:MathTex|Tex)\(").expect("Valid latex text regex"));

// Only a line whose whole statement is `[name =] RightAngle(<flat args>)[,]`.
// Calls nested in other expressions and multi-line constructions are left alone.
static RIGHT_ANGLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[A-Za-z_][A-Za-z0-9_]*\s*=\s*)?RightAngle\([^()]*\)\s*,?\s*$")
        .expect("Valid right angle regex")
});

/// A repair that changed the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    ReplacementCharacters,
    FenceMarkers,
    LatexText,
    Whitespace,
    RightAngleLines(usize),
    LeadingBlank,
}

/// Sanitized script plus the repairs that were applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub source: String,
    pub repairs: Vec<Repair>,
}

impl Sanitized {
    pub fn is_unchanged(&self) -> bool {
        self.repairs.is_empty()
    }
}

/// Apply every repair to `source`
pub fn sanitize(source: &str) -> Sanitized {
    let mut repairs = Vec::new();

    let text: String = source.chars().filter(|c| *c != REPLACEMENT_CHAR).collect();
    if text.len() != source.len() {
        repairs.push(Repair::ReplacementCharacters);
    }

    let text = replace_tracked(&FENCE_MARKER, &text, "", Repair::FenceMarkers, &mut repairs);
    let text = replace_tracked(&LATEX_TEXT, &text, "Text(", Repair::LatexText, &mut repairs);

    let mut dropped = 0;
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let line = line.replace('\t', "    ");
        let line = line.trim_end();
        if RIGHT_ANGLE_LINE.is_match(line) {
            dropped += 1;
            continue;
        }
        lines.push(line.to_string());
    }
    let joined = lines.join("\n");
    if dropped > 0 {
        repairs.push(Repair::RightAngleLines(dropped));
    }
    if dropped == 0 && joined != text {
        repairs.push(Repair::Whitespace);
    }

    let trimmed = joined.trim_start();
    if trimmed.len() != joined.len() {
        repairs.push(Repair::LeadingBlank);
    }

    if !repairs.is_empty() {
        debug!("Sanitized generated script: {:?}", repairs);
    }

    Sanitized {
        source: trimmed.to_string(),
        repairs,
    }
}

fn replace_tracked(
    re: &Regex,
    text: &str,
    replacement: &str,
    repair: Repair,
    repairs: &mut Vec<Repair>,
) -> String {
    if re.is_match(text) {
        repairs.push(repair);
        re.replace_all(text, replacement).into_owned()
    } else {
        text.to_string()
    }
}
