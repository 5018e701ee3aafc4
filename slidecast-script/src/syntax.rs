//! Syntax-only validation
//!
//! The script is parsed against the Python grammar and discarded. It is never
//! compiled to bytecode nor executed here; the rendering toolchain is the only
//! thing that runs it.
//!
//! The grammar is Python 3.11's. Python 3.12 f-strings that reuse the
//! enclosing quote inside a replacement field (`f"{d["a"]}"`) are rejected,
//! so the code prompt asks for 3.11 syntax.

use rustpython_parser::lexer::LexicalErrorType;
use rustpython_parser::{Mode, ParseError, ParseErrorType, parse};
use tracing::debug;

use crate::error::ScriptError;
use crate::sanitize::sanitize;

/// Source path reported in parse errors
pub const SOURCE_PATH: &str = "<generated-script>";

/// Check that `source` parses as a Python module
///
/// # Errors
/// Returns [`ScriptError::SyntaxInvalid`] carrying the error class
/// (`SyntaxError` or `IndentationError`) and the parser message.
pub fn check_syntax(source: &str) -> Result<(), ScriptError> {
    parse(source, Mode::Module, SOURCE_PATH)
        .map(|_| ())
        .map_err(|err| ScriptError::SyntaxInvalid {
            class_name: error_class(&err).to_string(),
            message: err.to_string(),
        })
}

/// Sanitize a generated script and check its syntax
///
/// Returns the sanitized source, ready to be written out for rendering.
pub fn prepare_for_render(generated: &str) -> Result<String, ScriptError> {
    let sanitized = sanitize(generated);
    if sanitized.source.trim().is_empty() {
        return Err(ScriptError::Empty);
    }

    check_syntax(&sanitized.source)?;
    debug!(
        "Script passed syntax check ({} bytes, {} repairs)",
        sanitized.source.len(),
        sanitized.repairs.len()
    );

    Ok(sanitized.source)
}

fn error_class(err: &ParseError) -> &'static str {
    match &err.error {
        ParseErrorType::Lexical(LexicalErrorType::IndentationError) => "IndentationError",
        _ => "SyntaxError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"from manim import *

class EducationalVideo(Scene):
    def construct(self):
        title = Text("Fractions", color=BLUE)
        self.play(Write(title), run_time=2)
        self.wait(1)
        self.play(FadeOut(title))
"#;

    #[test]
    fn test_valid_script_passes() {
        assert!(check_syntax(VALID).is_ok());
    }

    #[test]
    fn test_unbalanced_parenthesis_fails() {
        let source = "from manim import *\n\nclass EducationalVideo(Scene):\n    def construct(self):\n        self.play(Write(Text(\"x\"))\n";
        let err = check_syntax(source).unwrap_err();

        match err {
            ScriptError::SyntaxInvalid { class_name, message } => {
                assert_eq!(class_name, "SyntaxError");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nested_quote_f_string_is_rejected() {
        assert!(check_syntax("d = {'a': 1}\nx = f\"{d['a']}\"\n").is_ok());
        assert!(check_syntax("d = {'a': 1}\nx = f\"{d[\"a\"]}\"\n").is_err());
    }

    #[test]
    fn test_prepare_sanitizes_before_checking() {
        let generated = "```python\nfrom manim import *\n\nclass EducationalVideo(Scene):\n\tdef construct(self):\n\t\tself.add(MathTex(\"x\"))\n```";
        let source = prepare_for_render(generated).unwrap();

        assert!(source.starts_with("from manim import *"));
        assert!(source.contains("        self.add(Text(\"x\"))"));
        assert!(!source.contains("```"));
    }

    #[test]
    fn test_prepare_rejects_empty_script() {
        assert_eq!(prepare_for_render("```python\n```"), Err(ScriptError::Empty));
    }
}
