//! Rule tables as plain data
//!
//! Tables are written with the builder methods on [`RuleDef`] and handed to
//! the registry builder, which compiles and validates them in one place.
//!
//! ```
//! use statelex::rules::RuleDef;
//! use statelex::tokens::TokenKind;
//!
//! let open = RuleDef::new(r"\(\*", TokenKind::Comment).push("comment");
//! let close = RuleDef::new(r"\*\)", TokenKind::Comment).pop();
//! assert_eq!(open.pattern.source, r"\(\*");
//! assert!(close.transition.target().is_none());
//! ```

use super::action::{Emission, Transition};
use super::pattern::PatternDef;
use crate::tokens::TokenKind;

/// A pattern and its action, as written in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub pattern: PatternDef,
    pub emission: Emission,
    pub transition: Transition<String>,
}

impl RuleDef {
    /// Emit the whole match as `kind`
    pub fn new(pattern: impl Into<String>, kind: TokenKind) -> Self {
        Self::with_emission(pattern, Emission::Token(kind))
    }

    /// Emit capture group `i + 1` as `kinds[i]`
    pub fn groups(pattern: impl Into<String>, kinds: &[TokenKind]) -> Self {
        let groups = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| (index + 1, *kind))
            .collect();
        Self::with_emission(pattern, Emission::Groups(groups))
    }

    /// Classify nothing; combine with a transition
    pub fn silent(pattern: impl Into<String>) -> Self {
        Self::with_emission(pattern, Emission::Nothing)
    }

    pub fn with_emission(pattern: impl Into<String>, emission: Emission) -> Self {
        Self {
            pattern: PatternDef::new(pattern),
            emission,
            transition: Transition::Stay,
        }
    }

    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.transition = Transition::Push(state.into());
        self
    }

    pub fn push_current(mut self) -> Self {
        self.transition = Transition::PushCurrent;
        self
    }

    pub fn pop(mut self) -> Self {
        self.transition = Transition::Pop;
        self
    }

    pub fn switch(mut self, state: impl Into<String>) -> Self {
        self.transition = Transition::Switch(state.into());
        self
    }

    pub fn followed_by(mut self, pattern: impl Into<String>) -> Self {
        self.pattern.followed_by = Some(pattern.into());
        self
    }

    pub fn not_followed_by(mut self, pattern: impl Into<String>) -> Self {
        self.pattern.not_followed_by = Some(pattern.into());
        self
    }

    pub fn not_preceded_by(mut self, pattern: impl Into<String>) -> Self {
        self.pattern.not_preceded_by = Some(pattern.into());
        self
    }
}

/// One entry of a state's ordered rule list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEntry {
    Rule(RuleDef),
    /// Splice the named state's flattened rules here
    Mixin(String),
}

/// A named state as written in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDef {
    pub name: String,
    pub entries: Vec<StateEntry>,
    /// Kind of the one-character token emitted when nothing matches
    pub fallback: TokenKind,
}

impl StateDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            fallback: TokenKind::Error,
        }
    }

    /// Rules declared directly in this state, mixins excluded
    pub fn own_rules(&self) -> impl Iterator<Item = &RuleDef> {
        self.entries.iter().filter_map(|entry| match entry {
            StateEntry::Rule(rule) => Some(rule),
            StateEntry::Mixin(_) => None,
        })
    }

    /// Names of mixed-in states, in order
    pub fn mixins(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            StateEntry::Mixin(name) => Some(name.as_str()),
            StateEntry::Rule(_) => None,
        })
    }
}
