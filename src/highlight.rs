//! Syntax highlighting behind a narrow capability interface.
//!
//! The pipeline only knows the [`Highlight`] trait. Whatever implements it is
//! responsible for escaping the source text; its output is wrapped in
//! [`HtmlFragment`] and inserted into the document verbatim.

use log::warn;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::utils::grammar_alias;

/// Prefix of every CSS class the highlighter emits (`hl-keyword`, `hl-string`, ...).
pub const CLASS_PREFIX: &str = "hl-";

static SYNTAXES: Lazy<Arc<SyntaxSet>> =
    Lazy::new(|| Arc::new(SyntaxSet::load_defaults_newlines()));

/// Markup that is already safe to embed in an HTML document as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFragment(String);

impl HtmlFragment {
    /// Wraps markup the caller vouches for. Nothing is escaped here.
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HtmlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
#[error("could not highlight as {language}")]
pub struct HighlightError {
    pub language: String,
    #[source]
    pub source: syntect::Error,
}

/// Turns source text into highlighted markup.
///
/// `language` is a grammar hint such as `py` or `js`. `None` asks for
/// best-effort detection from the content.
pub trait Highlight: Send + Sync {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<HtmlFragment, HighlightError>;
}

/// Class-based HTML highlighting with syntect's bundled grammars.
#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    syntax_set: Arc<SyntaxSet>,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: Arc::clone(&SYNTAXES),
        }
    }

    /// Name of the grammar that would be used for this input.
    pub fn language_name(&self, code: &str, language: Option<&str>) -> &str {
        &self.resolve(code, language).name
    }

    fn resolve(&self, code: &str, language: Option<&str>) -> &SyntaxReference {
        if let Some(hint) = language.filter(|h| !h.is_empty()) {
            if let Some(syntax) = self.syntax_set.find_syntax_by_token(hint) {
                return syntax;
            }
            if let Some(syntax) = grammar_alias(hint)
                .and_then(|token| self.syntax_set.find_syntax_by_token(token))
            {
                return syntax;
            }
            warn!("No grammar for '{hint}', detecting from content");
        }

        self.detect(code)
    }

    fn detect(&self, code: &str) -> &SyntaxReference {
        code.lines()
            .next()
            .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

impl Highlight for SyntectHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<HtmlFragment, HighlightError> {
        let syntax = self.resolve(code, language);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|source| HighlightError {
                    language: syntax.name.clone(),
                    source,
                })?;
        }

        Ok(HtmlFragment(generator.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_is_highlighted_with_prefixed_classes() {
        let highlighter = SyntectHighlighter::new();
        let html = highlighter.highlight("print(1)\n", Some("py")).unwrap();

        assert!(html.as_str().contains("class=\"hl-"));
        assert!(html.as_str().contains("print</span>"));
    }

    #[test]
    fn test_source_is_escaped() {
        let highlighter = SyntectHighlighter::new();
        let html = highlighter
            .highlight("if (a < b && c > d) {}\n", Some("js"))
            .unwrap();

        assert!(html.as_str().contains("&lt;"));
        assert!(html.as_str().contains("&amp;&amp;"));
        assert!(!html.as_str().contains("a < b"));
    }

    #[test]
    fn test_hint_resolution() {
        let highlighter = SyntectHighlighter::new();
        assert_eq!(highlighter.language_name("", Some("py")), "Python");
        assert_eq!(highlighter.language_name("", Some("java")), "Java");
        assert_eq!(highlighter.language_name("", Some("tsx")), "JavaScript");
    }

    #[test]
    fn test_unknown_hint_falls_back_to_detection() {
        let highlighter = SyntectHighlighter::new();
        assert_eq!(
            highlighter.language_name("just words", Some("nope")),
            "Plain Text"
        );
    }

    #[test]
    fn test_detection_uses_first_line() {
        let highlighter = SyntectHighlighter::new();
        let code = "#!/usr/bin/env python\nprint('hi')\n";
        assert_eq!(highlighter.language_name(code, None), "Python");
        assert_eq!(highlighter.language_name("plain words", None), "Plain Text");
    }

    #[test]
    fn test_empty_input() {
        let highlighter = SyntectHighlighter::new();
        let html = highlighter.highlight("", None).unwrap();
        assert_eq!(html.as_str(), "");
    }
}
