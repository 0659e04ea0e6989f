//! Stateful regex-dispatch lexer engine
//!
//! A language is a table of named states, each an ordered list of rules.
//! [`StateRegistry`] compiles and flattens a table once; [`LexerEngine`]
//! walks input against it and yields a lazy [`TokenStream`] whose token
//! texts always concatenate back to the input.
//!
//! ```
//! use statelex::languages::LanguageRegistry;
//! use statelex::tokens::TokenKind;
//!
//! let languages = LanguageRegistry::load().unwrap();
//! let fsharp = languages.find("f#").unwrap();
//! let kinds: Vec<_> = fsharp.engine().tokenize("let x = 1").map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::Keyword);
//! ```

// Internal modules
pub mod config;
pub mod file_processor;
pub mod languages;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod registry;
pub mod rules;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use languages::{Language, LanguageError, LanguageRegistry, LoadedLanguage};
pub use lexical::{LexContext, LexerEngine, LexerError, LexicalMetrics};
pub use registry::{RegistryError, StateRegistry};
pub use rules::{RuleDef, StateDef, StateId};
pub use tokens::{Token, TokenKind, TokenStream};
