//! Token model
//!
//! - [`TokenKind`]: hierarchical classification (`Name.Namespace` is-a `Name`)
//! - [`Token`]: a kind plus the slice of input it covers and its byte offset
//! - [`TokenStream`]: the lazy output of one tokenization call
//!
//! Every stream covers its input exactly: concatenating the text of all
//! tokens in order reproduces the input.

pub mod kind;
pub mod token;
pub mod token_stream;

pub use kind::TokenKind;
pub use token::Token;
pub use token_stream::{count_kinds, Coalesce, TokenStream};
