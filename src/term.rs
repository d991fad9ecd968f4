//! Term normalization and stem derivation
//!
//! A record's raw term field value may carry HTML markup, character
//! entities, and non-breaking-space padding. `Term::normalize` reduces it
//! to the plain-text pronunciation key, and `sanitize` derives the
//! filesystem-safe stem used to name the generated media asset.

use crate::error::{Error, Result};
use html2text::render::text_renderer::TrivialDecorator;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Characters outside this class are replaced with `_` when deriving a
/// stem. `\w` is Unicode-aware, so accented letters survive sanitization
/// (`café au lait` becomes `café_au_lait`).
static UNSAFE_FOR_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-]").expect("stem character class must compile"));

/// Width passed to the HTML text extractor. Wide enough that no term short
/// enough to be accepted is ever line-wrapped by the extractor.
const EXTRACT_WIDTH: usize = 4096;

/// A normalized, non-empty pronunciation key derived from a record field.
///
/// Construction through [`Term::normalize`] is the only way to obtain one,
/// so holding a `Term` guarantees the empty/overlong cases were already
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term(String);

impl Term {
    /// Upper bound on normalized term length, in code points. Longer terms
    /// are rejected rather than truncated: truncation could collide two
    /// distinct terms onto one stem.
    pub const MAX_CHARS: usize = 200;

    /// Normalize a raw field value into a pronunciation term.
    ///
    /// Decodes HTML character entities and strips markup (html2text's
    /// parser decodes entities while extracting visible text; the trivial
    /// decorator emits no emphasis or link markers), replaces
    /// non-breaking-space variants with ordinary spaces, collapses
    /// whitespace runs, and trims.
    ///
    /// # Errors
    /// `Error::EmptyTerm` if nothing visible remains, `Error::TermTooLong`
    /// past [`Term::MAX_CHARS`]. Both skip the record; neither fails the
    /// batch.
    pub fn normalize(raw: &str) -> Result<Self> {
        let text = html2text::from_read_with_decorator(
            raw.as_bytes(),
            EXTRACT_WIDTH,
            TrivialDecorator::new(),
        );

        // U+00A0 from decoded &nbsp;, plus any literal &nbsp; that was
        // double-escaped in the source and survived decoding.
        let text = text.replace('\u{a0}', " ").replace("&nbsp;", " ");

        // The extractor separates block elements with line breaks; the term
        // is a single line, so fold all whitespace runs into single spaces.
        let term = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if term.is_empty() {
            return Err(Error::EmptyTerm);
        }

        let length = term.chars().count();
        if length > Self::MAX_CHARS {
            return Err(Error::TermTooLong {
                length,
                limit: Self::MAX_CHARS,
            });
        }

        Ok(Term(term))
    }

    /// The plain-text term, as passed to the speech synthesizer.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe stem naming this term's media asset.
    ///
    /// Deterministic: the same term always yields the same stem, which is
    /// what makes existing-asset reuse possible.
    pub fn stem(&self) -> String {
        sanitize(&self.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every character outside {Unicode alphanumerics, `_`, `-`} with
/// `_`. Pure and idempotent: re-applying it never changes the result.
pub fn sanitize(text: &str) -> String {
    UNSAFE_FOR_FILENAME.replace_all(text, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_markup_and_entities() {
        let term = Term::normalize("<b>caf&eacute;&nbsp;au&nbsp;lait</b>").unwrap();
        assert_eq!(term.as_str(), "café au lait");
    }

    #[test]
    fn test_normalize_plain_text_unchanged() {
        let term = Term::normalize("hello world").unwrap();
        assert_eq!(term.as_str(), "hello world");
    }

    #[test]
    fn test_normalize_replaces_nbsp_character() {
        let term = Term::normalize("caf\u{a0}au\u{a0}lait").unwrap();
        assert_eq!(term.as_str(), "caf au lait");
    }

    #[test]
    fn test_normalize_replaces_double_escaped_nbsp() {
        // &amp;nbsp; decodes to a literal "&nbsp;" string, which still must
        // not survive into the term.
        let term = Term::normalize("au&amp;nbsp;lait").unwrap();
        assert_eq!(term.as_str(), "au lait");
    }

    #[test]
    fn test_normalize_trims_and_collapses_whitespace() {
        let term = Term::normalize("  hello   world \n").unwrap();
        assert_eq!(term.as_str(), "hello world");
    }

    #[test]
    fn test_normalize_block_elements_keep_word_separation() {
        let term = Term::normalize("<div>hello</div><div>world</div>").unwrap();
        assert_eq!(term.as_str(), "hello world");
    }

    #[test]
    fn test_normalize_emphasis_adds_no_markers() {
        let term = Term::normalize("<em>bonjour</em> <strong>madame</strong>").unwrap();
        assert_eq!(term.as_str(), "bonjour madame");
    }

    #[test]
    fn test_normalize_empty_input_rejected() {
        assert!(matches!(Term::normalize(""), Err(Error::EmptyTerm)));
    }

    #[test]
    fn test_normalize_nbsp_only_rejected() {
        assert!(matches!(Term::normalize("&nbsp;"), Err(Error::EmptyTerm)));
    }

    #[test]
    fn test_normalize_markup_only_rejected() {
        assert!(matches!(Term::normalize("<b></b>"), Err(Error::EmptyTerm)));
    }

    #[test]
    fn test_normalize_rejects_overlong_terms() {
        let raw = "a".repeat(Term::MAX_CHARS + 1);
        match Term::normalize(&raw) {
            Err(Error::TermTooLong { length, limit }) => {
                assert_eq!(length, Term::MAX_CHARS + 1);
                assert_eq!(limit, Term::MAX_CHARS);
            }
            other => panic!("expected TermTooLong, got {:?}", other.map(|t| t.0)),
        }
    }

    #[test]
    fn test_normalize_accepts_terms_at_the_limit() {
        let raw = "a".repeat(Term::MAX_CHARS);
        assert!(Term::normalize(&raw).is_ok());
    }

    #[test]
    fn test_stem_replaces_unsafe_characters() {
        let term = Term::normalize("hello, world!").unwrap();
        assert_eq!(term.stem(), "hello__world_");
    }

    #[test]
    fn test_stem_keeps_unicode_letters() {
        let term = Term::normalize("café au lait").unwrap();
        assert_eq!(term.stem(), "café_au_lait");
    }

    #[test]
    fn test_stem_keeps_hyphen_and_underscore() {
        let term = Term::normalize("well-known_word").unwrap();
        assert_eq!(term.stem(), "well-known_word");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = ["hello world", "a/b\\c", "café!", "1 + 1 = 2", "..."];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "sanitize not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        assert_eq!(sanitize("a b/c"), sanitize("a b/c"));
        assert_eq!(sanitize("a b/c"), "a_b_c");
    }
}
