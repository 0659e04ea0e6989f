//! Rule and state model
//!
//! Two layers live here. The definition layer ([`RuleDef`], [`StateDef`])
//! is what language tables are written in: names are strings and patterns
//! are uncompiled. The compiled layer ([`Rule`], [`State`]) is what the
//! registry hands to the match loop: patterns are compiled, mixins are
//! already spliced in and state references are [`StateId`]s.

pub mod action;
pub mod definition;
pub mod pattern;

pub use action::{Emission, Transition};
pub use definition::{RuleDef, StateDef, StateEntry};
pub use pattern::{Pattern, PatternDef};

use crate::tokens::TokenKind;
use std::fmt;

/// Name of the state every tokenization starts in by default
pub const ROOT_STATE: &str = "root";

/// Interned state name, valid for the registry that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub emission: Emission,
    pub transition: Transition<StateId>,
}

/// Compiled state with mixins flattened in declaration order
#[derive(Debug, Clone)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub rules: Vec<Rule>,
    pub fallback: TokenKind,
}

impl State {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
