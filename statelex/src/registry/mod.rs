//! Immutable, shareable state tables
//!
//! A [`StateRegistry`] is built once per language from its rule table.
//! Mixins are already flattened and every state reference is a
//! [`StateId`], so the match loop only ever indexes into a `Vec`.

pub mod builder;
pub mod error;

pub use builder::{StateBuilder, StateRegistryBuilder};
pub use error::{RegistryError, RegistryResult};

use crate::rules::{State, StateId};
use std::collections::HashMap;

/// Compiled, flattened states of one language
#[derive(Debug, Clone)]
pub struct StateRegistry {
    language: String,
    root: StateId,
    ids: HashMap<String, StateId>,
    states: Vec<State>,
}

impl StateRegistry {
    pub fn builder(language: impl Into<String>) -> StateRegistryBuilder {
        StateRegistryBuilder::new(language)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// State tokenization starts in
    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.ids.get(name).copied()
    }

    /// Ids are only issued by this registry, so lookup cannot miss
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn state_name(&self, id: StateId) -> &str {
        &self.state(id).name
    }

    /// States in definition order
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Total rules across all flattened states
    pub fn rule_count(&self) -> usize {
        self.states.iter().map(State::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleDef;
    use crate::tokens::TokenKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_registry_is_send_and_sync() {
        assert_send_sync::<StateRegistry>();
    }

    #[test]
    fn test_lookups() {
        let registry = StateRegistry::builder("demo")
            .state("root", |s| {
                s.rule(RuleDef::new(r"\d+", TokenKind::NumberInteger))
                    .rule(RuleDef::new("#", TokenKind::Comment).push("comment"))
            })
            .state("comment", |s| {
                s.rule(RuleDef::new("\n", TokenKind::Text).pop())
                    .fallback(TokenKind::CommentSingle)
            })
            .build()
            .unwrap();

        assert_eq!(registry.language(), "demo");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.rule_count(), 3);
        assert_eq!(registry.state_name(registry.root()), "root");

        let comment = registry.state_id("comment").unwrap();
        assert_eq!(registry.state_name(comment), "comment");
        assert_eq!(registry.state_id("missing"), None);
        assert_eq!(
            registry.states().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["root", "comment"]
        );
    }
}
