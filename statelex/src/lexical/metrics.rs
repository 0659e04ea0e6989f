//! Counters gathered while a token stream is drained

use crate::tokens::TokenKind;

/// Lexical analysis metrics for one tokenization call
#[derive(Debug, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    /// Single-character tokens emitted because no rule matched
    pub fallback_tokens: usize,
    pub max_stack_depth: usize,
    /// Accepted matches that consumed nothing but moved the stack
    pub zero_width_transitions: usize,
    /// Pushes past the stored-frame limit, counted instead of stored
    pub overflow_pushes: usize,
    kind_counts: [usize; TokenKind::COUNT],
    count_kinds: bool,
}

impl LexicalMetrics {
    pub(crate) fn new(count_kinds: bool) -> Self {
        Self {
            total_tokens: 0,
            fallback_tokens: 0,
            max_stack_depth: 1,
            zero_width_transitions: 0,
            overflow_pushes: 0,
            kind_counts: [0; TokenKind::COUNT],
            count_kinds,
        }
    }

    pub(crate) fn record_token(&mut self, kind: TokenKind) {
        self.total_tokens += 1;
        if self.count_kinds {
            self.kind_counts[kind as usize] += 1;
        }
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_stack_depth = self.max_stack_depth.max(depth);
    }

    /// Tokens emitted with exactly `kind`; zero when kind counting is off
    pub fn count(&self, kind: TokenKind) -> usize {
        self.kind_counts[kind as usize]
    }

    /// Non-zero per-kind counts, in kind order
    pub fn kind_counts(&self) -> Vec<(TokenKind, usize)> {
        TokenKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    pub fn counts_kinds(&self) -> bool {
        self.count_kinds
    }
}

impl Default for LexicalMetrics {
    fn default() -> Self {
        Self::new(true)
    }
}
