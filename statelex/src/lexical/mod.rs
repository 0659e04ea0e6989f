//! Lexical analysis: the match loop and its per-call state
//!
//! [`LexerEngine`] borrows a compiled [`StateRegistry`](crate::registry::StateRegistry)
//! and hands out [`TokenStream`]s. Each stream owns a [`LexContext`] (cursor
//! and state stack), so concurrent calls never share mutable state.

pub mod context;
pub mod engine;
pub mod metrics;

pub use context::LexContext;
pub use engine::{LexerEngine, LexerError};
pub use metrics::LexicalMetrics;

pub(crate) use engine::Scanner;

use crate::config::runtime::LexicalPreferences;
use crate::registry::StateRegistry;
use crate::tokens::TokenStream;

/// Tokenize `input` from the root state with default preferences
pub fn tokenize<'r, 'a>(registry: &'r StateRegistry, input: &'a str) -> TokenStream<'r, 'a> {
    LexerEngine::new(registry).tokenize(input)
}

/// Create an engine with custom runtime preferences
pub fn create_engine_with_preferences(
    registry: &StateRegistry,
    preferences: LexicalPreferences,
) -> LexerEngine<'_> {
    LexerEngine::with_preferences(registry, preferences)
}
