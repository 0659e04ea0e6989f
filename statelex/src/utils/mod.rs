//! Shared helpers used by the token layer and the CLI

pub mod span;

pub use span::{Position, SourceMap};
