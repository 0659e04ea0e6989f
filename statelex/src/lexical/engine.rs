//! First-match-wins tokenizer over a [`StateRegistry`]

use super::context::LexContext;
use super::metrics::LexicalMetrics;
use crate::config::compile_time::lexical::MAX_ZERO_WIDTH_STEPS;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::registry::StateRegistry;
use crate::rules::{Emission, Rule, StateId, Transition};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::{log_error, log_success, log_warning};
use regex::Captures;
use std::collections::VecDeque;

/// Errors that stop a tokenization call before it starts
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Unknown start state '{state}' for language '{language}'")]
    UnknownState { state: String, language: String },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnknownState { .. } => codes::lexical::UNKNOWN_START_STATE,
        }
    }
}

/// Drives tokenization against one registry
///
/// The engine only borrows the registry, so any number of engines, on any
/// number of threads, can share one.
#[derive(Debug, Clone)]
pub struct LexerEngine<'r> {
    registry: &'r StateRegistry,
    preferences: LexicalPreferences,
}

impl<'r> LexerEngine<'r> {
    pub fn new(registry: &'r StateRegistry) -> Self {
        Self::with_preferences(registry, LexicalPreferences::default())
    }

    pub fn with_preferences(registry: &'r StateRegistry, preferences: LexicalPreferences) -> Self {
        Self {
            registry,
            preferences,
        }
    }

    pub fn registry(&self) -> &'r StateRegistry {
        self.registry
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize from the registry's root state
    pub fn tokenize<'a>(&self, input: &'a str) -> TokenStream<'r, 'a> {
        self.start(LexContext::new(input, self.registry.root()))
    }

    /// Tokenize starting in a named state
    pub fn tokenize_from<'a>(
        &self,
        input: &'a str,
        state: &str,
    ) -> Result<TokenStream<'r, 'a>, LexerError> {
        let Some(start) = self.registry.state_id(state) else {
            let error = LexerError::UnknownState {
                state: state.to_string(),
                language: self.registry.language().to_string(),
            };
            log_error!(error.error_code(), "Cannot start tokenization",
                "state" => state,
                "language" => self.registry.language()
            );
            return Err(error);
        };
        Ok(self.start(LexContext::new(input, start)))
    }

    fn start<'a>(&self, context: LexContext<'a>) -> TokenStream<'r, 'a> {
        TokenStream::new(Scanner {
            registry: self.registry,
            context,
            metrics: LexicalMetrics::new(self.preferences.collect_kind_counts),
            zero_width_cursor: 0,
            zero_width_steps: 0,
            warned_depth: false,
            warned_zero_width: false,
            log_completion: self.preferences.log_completion,
        })
    }
}

/// The match loop, one step at a time
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'r, 'a> {
    registry: &'r StateRegistry,
    context: LexContext<'a>,
    metrics: LexicalMetrics,
    zero_width_cursor: usize,
    zero_width_steps: usize,
    warned_depth: bool,
    warned_zero_width: bool,
    log_completion: bool,
}

impl<'r, 'a> Scanner<'r, 'a> {
    pub(crate) fn context(&self) -> &LexContext<'a> {
        &self.context
    }

    pub(crate) fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.context.is_at_end()
    }

    /// Run one iteration of the match loop
    ///
    /// Either the cursor advances, or a zero-width rule changes the stack.
    /// Zero-width steps at one cursor position are capped, so a stream of
    /// steps always reaches the end of the input.
    pub(crate) fn step(&mut self, out: &mut VecDeque<Token<'a>>) {
        let registry = self.registry;
        let input = self.context.input();
        let cursor = self.context.cursor();

        if cursor != self.zero_width_cursor {
            self.zero_width_cursor = cursor;
            self.zero_width_steps = 0;
        }
        let allow_zero_width = self.zero_width_steps < MAX_ZERO_WIDTH_STEPS;

        let state = registry.state(self.context.top());
        for rule in &state.rules {
            let (end, captures) = match rule.emission {
                Emission::Groups(_) => match rule.pattern.captures_at(input, cursor) {
                    Some(captures) => {
                        let end = cursor + captures.get(0).map_or(0, |m| m.end());
                        (end, Some(captures))
                    }
                    None => continue,
                },
                _ => match rule.pattern.match_end(input, cursor) {
                    Some(end) => (end, None),
                    None => continue,
                },
            };

            if end == cursor {
                let overflow = self.context.overflow();
                if allow_zero_width && self.context.apply(&rule.transition) {
                    self.zero_width_steps += 1;
                    self.metrics.zero_width_transitions += 1;
                    if self.context.overflow() > overflow {
                        self.metrics.overflow_pushes += 1;
                    }
                    self.metrics.record_depth(self.context.depth());
                    self.check_zero_width_limit();
                    return;
                }
                continue;
            }

            self.emit(rule, cursor, end, captures.as_ref(), out);
            self.transition(&rule.transition);
            self.context.advance_to(end);
            return;
        }

        // Nothing matched: one character with the state's fallback kind
        let width = input[cursor..].chars().next().map_or(1, char::len_utf8);
        self.metrics.fallback_tokens += 1;
        self.push_token(state.fallback, cursor, cursor + width, out);
        self.context.advance_to(cursor + width);
    }

    fn emit(
        &mut self,
        rule: &Rule,
        cursor: usize,
        end: usize,
        captures: Option<&Captures<'a>>,
        out: &mut VecDeque<Token<'a>>,
    ) {
        match (&rule.emission, captures) {
            (Emission::Token(kind), _) => self.push_token(*kind, cursor, end, out),
            (Emission::Groups(groups), Some(captures)) => {
                let mut position = cursor;
                for &(group, kind) in groups {
                    let Some(found) = captures.get(group) else {
                        continue;
                    };
                    let start = cursor + found.start();
                    let stop = cursor + found.end();
                    // Groups behind the emitted prefix would reorder output
                    if start < position || start == stop {
                        continue;
                    }
                    self.push_token(TokenKind::Text, position, start, out);
                    self.push_token(kind, start, stop, out);
                    position = stop;
                }
                self.push_token(TokenKind::Text, position, end, out);
            }
            _ => self.push_token(TokenKind::Text, cursor, end, out),
        }
    }

    fn transition(&mut self, transition: &Transition<StateId>) {
        let overflow = self.context.overflow();
        self.context.apply(transition);
        if self.context.overflow() > overflow {
            self.metrics.overflow_pushes += 1;
            if !self.warned_depth {
                self.warned_depth = true;
                log_warning!(code = codes::lexical::STATE_DEPTH_LIMIT, "State stack depth limit reached; deeper frames are counted only",
                    "depth" => self.context.depth(),
                    "offset" => self.context.cursor()
                );
            }
        }
        self.metrics.record_depth(self.context.depth());
    }

    fn check_zero_width_limit(&mut self) {
        if self.zero_width_steps == MAX_ZERO_WIDTH_STEPS && !self.warned_zero_width {
            self.warned_zero_width = true;
            log_warning!(code = codes::lexical::ZERO_WIDTH_LIMIT, "Zero-width rules disabled at offset",
                "offset" => self.context.cursor(),
                "state" => self.registry.state_name(self.context.top())
            );
        }
    }

    fn push_token(
        &mut self,
        kind: TokenKind,
        start: usize,
        end: usize,
        out: &mut VecDeque<Token<'a>>,
    ) {
        if start >= end {
            return;
        }
        let input = self.context.input();
        self.metrics.record_token(kind);
        out.push_back(Token::new(kind, &input[start..end], start));
    }

    /// Log the outcome once the input is exhausted
    pub(crate) fn finish(&self) {
        let language = self.registry.language();

        if self.metrics.fallback_tokens > 0 {
            log_warning!(code = codes::lexical::UNMATCHED_INPUT, "Input not matched by any rule",
                "language" => language,
                "fallback_tokens" => self.metrics.fallback_tokens
            );
        }

        if self.log_completion {
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
                "language" => language,
                "bytes" => self.context.input().len(),
                "tokens" => self.metrics.total_tokens,
                "max_depth" => self.metrics.max_stack_depth,
                "final_depth" => self.context.depth()
            );
        }
    }
}
