//! Lazy token streams
//!
//! A [`TokenStream`] runs the match loop only as far as the consumer pulls.
//! Dropping it mid-way is fine; nothing is held but the borrowed input.

use super::kind::TokenKind;
use super::token::Token;
use crate::config::compile_time::lexical::TOKEN_BUFFER_SIZE;
use crate::lexical::{LexContext, LexicalMetrics, Scanner};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Tokens of one input, in offset order
#[derive(Debug, Clone)]
pub struct TokenStream<'r, 'a> {
    scanner: Scanner<'r, 'a>,
    /// Tokens from a multi-group match not yet handed out
    pending: VecDeque<Token<'a>>,
    finished: bool,
}

impl<'r, 'a> TokenStream<'r, 'a> {
    pub(crate) fn new(scanner: Scanner<'r, 'a>) -> Self {
        Self {
            scanner,
            pending: VecDeque::with_capacity(TOKEN_BUFFER_SIZE),
            finished: false,
        }
    }

    /// Live cursor and state stack
    pub fn context(&self) -> &LexContext<'a> {
        self.scanner.context()
    }

    /// Counters for the tokens produced so far
    pub fn metrics(&self) -> &LexicalMetrics {
        self.scanner.metrics()
    }

    pub fn input(&self) -> &'a str {
        self.scanner.context().input()
    }

    /// Merge adjacent tokens of the same kind
    pub fn coalesce(self) -> Coalesce<'a, Self> {
        let source = self.input();
        Coalesce::new(source, self)
    }

    /// Drain the stream and rebuild the text it covered
    pub fn collect_text(self) -> String {
        self.map(|token| token.text).collect()
    }
}

impl<'a> Iterator for TokenStream<'_, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            if self.scanner.is_at_end() {
                self.finished = true;
                self.scanner.finish();
                return None;
            }
            self.scanner.step(&mut self.pending);
        }
    }
}

impl FusedIterator for TokenStream<'_, '_> {}

/// Adapter merging runs of same-kind tokens and dropping empty ones
///
/// Tokens must come from `source` in order, as a [`TokenStream`]
/// produces them; merged text is re-sliced from `source`.
#[derive(Debug, Clone)]
pub struct Coalesce<'a, I> {
    source: &'a str,
    inner: I,
    held: Option<Token<'a>>,
}

impl<'a, I> Coalesce<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(source: &'a str, inner: I) -> Self {
        Self {
            source,
            inner,
            held: None,
        }
    }

    fn merge(&self, held: Token<'a>, next: &Token<'a>) -> Option<Token<'a>> {
        if held.kind != next.kind || held.end() != next.offset {
            return None;
        }
        let text = self.source.get(held.offset..next.end())?;
        Some(Token::new(held.kind, text, held.offset))
    }
}

impl<'a, I> Iterator for Coalesce<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let Some(next) = self.inner.next() else {
                return self.held.take();
            };
            if next.is_empty() {
                continue;
            }
            match self.held.take() {
                None => self.held = Some(next),
                Some(held) => match self.merge(held, &next) {
                    Some(merged) => self.held = Some(merged),
                    None => {
                        self.held = Some(next);
                        return Some(held);
                    }
                },
            }
        }
    }
}

impl<'a, I> FusedIterator for Coalesce<'a, I> where I: FusedIterator<Item = Token<'a>> {}

/// Count of tokens per kind, for quick summaries in tests and tools
pub fn count_kinds<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Vec<(TokenKind, usize)> {
    let mut counts = [0usize; TokenKind::COUNT];
    for token in tokens {
        counts[token.kind as usize] += 1;
    }
    TokenKind::ALL
        .iter()
        .map(|&kind| (kind, counts[kind as usize]))
        .filter(|&(_, count)| count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerEngine;
    use crate::registry::StateRegistry;
    use crate::rules::RuleDef;

    fn words() -> StateRegistry {
        StateRegistry::builder("words")
            .state("root", |s| {
                s.rule(RuleDef::new(r"[a-z]", TokenKind::Name))
                    .rule(RuleDef::new(r"\s", TokenKind::Text))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_stream_is_lazy_and_fused() {
        let registry = words();
        let engine = LexerEngine::new(&registry);
        let mut stream = engine.tokenize("ab c");

        assert_eq!(stream.next().map(|t| t.text), Some("a"));
        assert_eq!(stream.context().cursor(), 1);

        assert_eq!(stream.by_ref().count(), 3);
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
        assert_eq!(stream.metrics().total_tokens, 4);
    }

    #[test]
    fn test_coalesce_merges_adjacent_same_kind() {
        let registry = words();
        let engine = LexerEngine::new(&registry);
        let merged: Vec<_> = engine
            .tokenize("ab  cd")
            .coalesce()
            .map(|t| (t.kind, t.text, t.offset))
            .collect();

        assert_eq!(
            merged,
            vec![
                (TokenKind::Name, "ab", 0),
                (TokenKind::Text, "  ", 2),
                (TokenKind::Name, "cd", 4),
            ]
        );
    }

    #[test]
    fn test_coalesce_drops_empty_tokens() {
        let source = "xy";
        let tokens = vec![
            Token::new(TokenKind::Name, "x", 0),
            Token::new(TokenKind::Text, "", 1),
            Token::new(TokenKind::Name, "y", 1),
        ];
        let merged: Vec<_> = Coalesce::new(source, tokens.into_iter()).collect();

        assert_eq!(merged, vec![Token::new(TokenKind::Name, "xy", 0)]);
    }

    #[test]
    fn test_collect_text_round_trips() {
        let registry = words();
        let engine = LexerEngine::new(&registry);
        let input = "ab\t§ Z\n";

        assert_eq!(engine.tokenize(input).collect_text(), input);
    }

    #[test]
    fn test_count_kinds() {
        let registry = words();
        let engine = LexerEngine::new(&registry);

        assert_eq!(
            count_kinds(engine.tokenize("a b!")),
            vec![
                (TokenKind::Text, 1),
                (TokenKind::Error, 1),
                (TokenKind::Name, 2),
            ]
        );
    }
}
