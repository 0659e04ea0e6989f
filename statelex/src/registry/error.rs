//! Error types for state registry construction

use crate::logging::codes::{self, Code};

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Configuration errors found while building a registry
///
/// All of these are detected before any input is tokenized.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("State '{state}' is defined more than once in language '{language}'")]
    DuplicateState { language: String, state: String },

    #[error("State '{referenced_by}' refers to undefined state '{state}'")]
    UndefinedState { state: String, referenced_by: String },

    #[error("Mixin cycle: {}", path.join(" -> "))]
    MixinCycle { path: Vec<String> },

    #[error("Invalid pattern in state '{state}', rule {rule}: {source}")]
    InvalidPattern {
        state: String,
        rule: usize,
        #[source]
        source: regex::Error,
    },

    #[error("Language '{language}' has no '{root}' state")]
    MissingRootState { language: String, root: String },

    #[error("Language '{language}' defines {count} states (limit: {limit})")]
    TooManyStates {
        language: String,
        count: usize,
        limit: usize,
    },

    #[error("State '{state}' has {count} rules after flattening (limit: {limit})")]
    TooManyRules {
        state: String,
        count: usize,
        limit: usize,
    },

    #[error("Rule {rule} in state '{state}' {reason}")]
    InvalidGroups {
        state: String,
        rule: usize,
        reason: String,
    },

    #[error("Mixins nest deeper than {limit} levels under state '{state}'")]
    MixinTooDeep { state: String, limit: usize },
}

impl RegistryError {
    pub fn undefined_state(state: &str, referenced_by: &str) -> Self {
        Self::UndefinedState {
            state: state.to_string(),
            referenced_by: referenced_by.to_string(),
        }
    }

    /// Create a cycle error, keeping at most `max_len` names of the path
    pub fn mixin_cycle(path: Vec<String>, max_len: usize) -> Self {
        let mut path = path;
        if path.len() > max_len {
            let hidden = path.len() - max_len + 1;
            path.truncate(max_len - 1);
            path.push(format!("... ({} more)", hidden));
        }
        Self::MixinCycle { path }
    }

    /// State the error is about, when there is one
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::DuplicateState { state, .. }
            | Self::UndefinedState { state, .. }
            | Self::InvalidPattern { state, .. }
            | Self::TooManyRules { state, .. }
            | Self::InvalidGroups { state, .. }
            | Self::MixinTooDeep { state, .. } => Some(state),
            Self::MixinCycle { path } => path.first().map(String::as_str),
            Self::MissingRootState { .. } | Self::TooManyStates { .. } => None,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateState { .. } => codes::registry::DUPLICATE_STATE,
            Self::UndefinedState { .. } => codes::registry::UNDEFINED_STATE,
            Self::MixinCycle { .. } => codes::registry::MIXIN_CYCLE,
            Self::InvalidPattern { .. } => codes::registry::INVALID_PATTERN,
            Self::MissingRootState { .. } => codes::registry::MISSING_ROOT_STATE,
            Self::TooManyStates { .. } => codes::registry::TOO_MANY_STATES,
            Self::TooManyRules { .. } => codes::registry::TOO_MANY_RULES,
            Self::InvalidGroups { .. } => codes::registry::INVALID_GROUPS,
            Self::MixinTooDeep { .. } => codes::registry::MIXIN_TOO_DEEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let error = RegistryError::mixin_cycle(
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
            16,
        );
        assert_eq!(error.to_string(), "Mixin cycle: a -> b -> a");
        assert_eq!(error.error_code(), codes::registry::MIXIN_CYCLE);
        assert_eq!(error.state(), Some("a"));
    }

    #[test]
    fn test_cycle_path_is_truncated() {
        let path: Vec<String> = (0..10).map(|i| format!("s{}", i)).collect();
        let RegistryError::MixinCycle { path } = RegistryError::mixin_cycle(path, 4) else {
            panic!("expected a cycle error");
        };

        assert_eq!(path.len(), 4);
        assert_eq!(path[0], "s0");
        assert_eq!(path[3], "... (7 more)");
    }

    #[test]
    fn test_undefined_state_message() {
        let error = RegistryError::undefined_state("coment", "root");
        assert_eq!(error.to_string(), "State 'root' refers to undefined state 'coment'");
        assert_eq!(error.error_code().as_str(), "E031");
    }
}
