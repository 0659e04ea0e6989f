//! Cursor-anchored patterns with lookaround assertions
//!
//! The regex engine has no lookaround, so a pattern carries up to three
//! extra assertions that are checked around the main match:
//!
//! - `followed_by` / `not_followed_by` run anchored at the match end and
//!   never consume input.
//! - `not_preceded_by` runs against the single character before the cursor.
//!   `not_preceded_by(r"\w")` is how a leading word boundary is written,
//!   since the main pattern only ever sees the input from the cursor on.

use regex::{Captures, Regex};

/// Uncompiled pattern as written in a rule table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternDef {
    pub source: String,
    pub followed_by: Option<String>,
    pub not_followed_by: Option<String>,
    pub not_preceded_by: Option<String>,
}

impl PatternDef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Compile the main pattern and every assertion
    pub fn compile(&self) -> Result<Pattern, regex::Error> {
        let anchored = |source: &str| Regex::new(&format!("^(?:{})", source));

        Ok(Pattern {
            regex: anchored(&self.source)?,
            followed_by: self.followed_by.as_deref().map(anchored).transpose()?,
            not_followed_by: self.not_followed_by.as_deref().map(anchored).transpose()?,
            not_preceded_by: self
                .not_preceded_by
                .as_deref()
                .map(|source| Regex::new(&format!("^(?:{})$", source)))
                .transpose()?,
        })
    }
}

/// Compiled pattern; cheap to clone
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    followed_by: Option<Regex>,
    not_followed_by: Option<Regex>,
    not_preceded_by: Option<Regex>,
}

impl Pattern {
    /// Source of the main pattern, including the anchor
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of capture groups, not counting the implicit whole-match group
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// End offset of a match starting exactly at `cursor`
    pub fn match_end(&self, input: &str, cursor: usize) -> Option<usize> {
        if !self.preceded_ok(input, cursor) {
            return None;
        }
        let found = self.regex.find(&input[cursor..])?;
        let end = cursor + found.end();
        self.followed_ok(input, end).then_some(end)
    }

    /// Captures of a match starting exactly at `cursor`, relative to `cursor`
    pub fn captures_at<'h>(&self, input: &'h str, cursor: usize) -> Option<Captures<'h>> {
        if !self.preceded_ok(input, cursor) {
            return None;
        }
        let captures = self.regex.captures(&input[cursor..])?;
        let end = cursor + captures.get(0)?.end();
        self.followed_ok(input, end).then_some(captures)
    }

    fn preceded_ok(&self, input: &str, cursor: usize) -> bool {
        let Some(assertion) = &self.not_preceded_by else {
            return true;
        };
        match input[..cursor].chars().next_back() {
            Some(previous) => {
                let start = cursor - previous.len_utf8();
                !assertion.is_match(&input[start..cursor])
            }
            None => true,
        }
    }

    fn followed_ok(&self, input: &str, end: usize) -> bool {
        let rest = &input[end..];
        if let Some(assertion) = &self.followed_by {
            if !assertion.is_match(rest) {
                return false;
            }
        }
        if let Some(assertion) = &self.not_followed_by {
            if assertion.is_match(rest) {
                return false;
            }
        }
        true
    }
}
