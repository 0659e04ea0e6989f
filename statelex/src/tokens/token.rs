//! Emitted tokens
use super::kind::TokenKind;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A classified slice of the input
///
/// `text` borrows from the input, so joining the text of every token of a
/// stream, in order, yields the input back byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of `text` in the input
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset one past the last byte
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn span(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.text, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_extent() {
        let token = Token::new(TokenKind::Keyword, "let", 4);

        assert_eq!(token.len(), 3);
        assert_eq!(token.end(), 7);
        assert_eq!(token.span(), 4..7);
        assert!(!token.is_empty());
        assert_eq!(token.to_string(), "Keyword(\"let\")@4");
    }

    #[test]
    fn test_token_serializes_kind_by_name() {
        let token = Token::new(TokenKind::NameNamespace, "System", 5);
        let json = serde_json::to_value(token).unwrap();

        assert_eq!(json["kind"], "Name.Namespace");
        assert_eq!(json["text"], "System");
        assert_eq!(json["offset"], 5);
    }
}
