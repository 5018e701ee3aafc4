//! Code block extraction
//!
//! Chat models wrap code in markdown fences, sometimes with a language tag,
//! sometimes without, occasionally not at all. Extraction tries the most
//! specific shape first and falls back to the raw completion.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ExtractionError;

static TAGGED_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*(?:python3?|py)\b[^\n]*\n(.*?)```").expect("Valid tagged fence regex")
});

static UNTAGGED_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n`]*\n(.*?)```").expect("Valid untagged fence regex")
});

static INLINE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("Valid inline fence regex"));

/// Extract the script from a chat completion
///
/// Order of preference:
/// 1. The first fence tagged as Python
/// 2. The first fence with any or no tag (the tag line is dropped)
/// 3. The first fence opened and closed on the same line
/// 4. The whole completion
///
/// # Errors
/// Returns [`ExtractionError::Empty`] when nothing but whitespace remains.
pub fn extract_code_block(completion: &str) -> Result<String, ExtractionError> {
    let code = [&*TAGGED_FENCE, &*UNTAGGED_FENCE, &*INLINE_FENCE]
        .into_iter()
        .find_map(|re| re.captures(completion))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(completion)
        .trim();

    if code.is_empty() {
        return Err(ExtractionError::Empty);
    }

    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_fence_wins() {
        let completion = "Here you go:\n```text\nnot this\n```\n```python\nfrom manim import *\n```\nEnjoy";
        assert_eq!(extract_code_block(completion).unwrap(), "from manim import *");
    }

    #[test]
    fn test_tag_is_case_insensitive() {
        let completion = "```Python\nx = 1\n```";
        assert_eq!(extract_code_block(completion).unwrap(), "x = 1");
    }

    #[test]
    fn test_untagged_fence() {
        let completion = "```\nclass EducationalVideo(Scene):\n    pass\n```";
        assert_eq!(
            extract_code_block(completion).unwrap(),
            "class EducationalVideo(Scene):\n    pass"
        );
    }

    #[test]
    fn test_py_prefix_does_not_match_other_tags() {
        let completion = "```pyret\nfun f(): 1 end\n```";
        assert_eq!(extract_code_block(completion).unwrap(), "fun f(): 1 end");
    }

    #[test]
    fn test_raw_completion_without_fences() {
        let completion = "  x = 1\ny = 2  \n";
        assert_eq!(extract_code_block(completion).unwrap(), "x = 1\ny = 2");
    }

    #[test]
    fn test_empty_completion() {
        assert_eq!(extract_code_block("   \n"), Err(ExtractionError::Empty));
        assert_eq!(extract_code_block("```python\n\n```"), Err(ExtractionError::Empty));
    }
}
