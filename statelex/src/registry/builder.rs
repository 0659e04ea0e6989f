//! Builder that compiles rule tables into a [`StateRegistry`]

use super::error::{RegistryError, RegistryResult};
use super::StateRegistry;
use crate::config::compile_time::registry::*;
use crate::logging::codes;
use crate::rules::{
    Emission, Rule, RuleDef, State, StateDef, StateEntry, StateId, ROOT_STATE,
};
use crate::tokens::TokenKind;
use crate::{log_debug, log_success};
use std::collections::HashMap;

/// Collects state definitions for one language
#[derive(Debug, Clone)]
pub struct StateRegistryBuilder {
    language: String,
    root: String,
    states: Vec<StateDef>,
}

/// Adds entries to a single state; see [`StateRegistryBuilder::state`]
#[derive(Debug, Clone)]
pub struct StateBuilder {
    def: StateDef,
}

impl StateBuilder {
    pub fn rule(mut self, rule: RuleDef) -> Self {
        self.def.entries.push(StateEntry::Rule(rule));
        self
    }

    /// Splice in every rule of `state` at this position
    pub fn mixin(mut self, state: impl Into<String>) -> Self {
        self.def.entries.push(StateEntry::Mixin(state.into()));
        self
    }

    /// Kind used for unmatched characters while this state is on top
    pub fn fallback(mut self, kind: TokenKind) -> Self {
        self.def.fallback = kind;
        self
    }
}

impl StateRegistryBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            root: ROOT_STATE.to_string(),
            states: Vec::new(),
        }
    }

    /// Use a start state other than `root`
    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.root = name.into();
        self
    }

    /// Define a state; rules are matched in the order they are added
    pub fn state(
        mut self,
        name: impl Into<String>,
        define: impl FnOnce(StateBuilder) -> StateBuilder,
    ) -> Self {
        let builder = define(StateBuilder {
            def: StateDef::new(name),
        });
        self.states.push(builder.def);
        self
    }

    /// Add an already assembled definition
    pub fn state_def(mut self, def: StateDef) -> Self {
        self.states.push(def);
        self
    }

    /// Compile patterns, resolve names, flatten mixins and validate limits
    pub fn build(self) -> RegistryResult<StateRegistry> {
        if self.states.len() > MAX_STATES {
            return Err(RegistryError::TooManyStates {
                language: self.language,
                count: self.states.len(),
                limit: MAX_STATES,
            });
        }

        let mut ids: HashMap<String, StateId> = HashMap::with_capacity(self.states.len());
        for (index, def) in self.states.iter().enumerate() {
            if ids.insert(def.name.clone(), StateId(index as u32)).is_some() {
                return Err(RegistryError::DuplicateState {
                    language: self.language,
                    state: def.name.clone(),
                });
            }
        }

        let Some(&root) = ids.get(&self.root) else {
            return Err(RegistryError::MissingRootState {
                language: self.language,
                root: self.root,
            });
        };

        let entries = self
            .states
            .iter()
            .map(|def| compile_entries(def, &ids))
            .collect::<RegistryResult<Vec<_>>>()?;

        let mut flattener = Flattener {
            entries: &entries,
            names: &self.states,
            memo: vec![None; self.states.len()],
            path: Vec::new(),
        };

        let mut states = Vec::with_capacity(self.states.len());
        for (index, def) in self.states.iter().enumerate() {
            let id = StateId(index as u32);
            let rules = flattener.flatten(id)?;

            if rules.len() > MAX_RULES_PER_STATE {
                return Err(RegistryError::TooManyRules {
                    state: def.name.clone(),
                    count: rules.len(),
                    limit: MAX_RULES_PER_STATE,
                });
            }

            log_debug!("State flattened",
                "state" => def.name,
                "own_rules" => def.own_rules().count(),
                "rules" => rules.len()
            );

            states.push(State {
                id,
                name: def.name.clone(),
                rules,
                fallback: def.fallback,
            });
        }

        let registry = StateRegistry {
            language: self.language,
            root,
            ids,
            states,
        };

        log_success!(codes::success::REGISTRY_BUILT, "State registry built",
            "language" => registry.language,
            "states" => registry.len(),
            "rules" => registry.rule_count()
        );

        Ok(registry)
    }
}

enum CompiledEntry {
    Rule(Rule),
    Mixin(StateId),
}

fn compile_entries(
    def: &StateDef,
    ids: &HashMap<String, StateId>,
) -> RegistryResult<Vec<CompiledEntry>> {
    let resolve = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| RegistryError::undefined_state(name, &def.name))
    };

    def.entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            StateEntry::Mixin(name) => resolve(name).map(CompiledEntry::Mixin),
            StateEntry::Rule(rule) => {
                let pattern =
                    rule.pattern
                        .compile()
                        .map_err(|source| RegistryError::InvalidPattern {
                            state: def.name.clone(),
                            rule: index,
                            source,
                        })?;

                if let Emission::Groups(groups) = &rule.emission {
                    let invalid = |reason: String| RegistryError::InvalidGroups {
                        state: def.name.clone(),
                        rule: index,
                        reason,
                    };
                    if groups.is_empty() {
                        return Err(invalid("lists no capture groups".to_string()));
                    }
                    let available = pattern.group_count();
                    if let Some((group, _)) = groups
                        .iter()
                        .find(|(group, _)| *group == 0 || *group > available)
                    {
                        return Err(invalid(format!(
                            "emits group {} but the pattern has groups 1..={}",
                            group, available
                        )));
                    }
                }

                let transition = rule.transition.clone().resolve(|name| resolve(name.as_str()))?;

                Ok(CompiledEntry::Rule(Rule {
                    pattern,
                    emission: rule.emission.clone(),
                    transition,
                }))
            }
        })
        .collect()
}

/// Depth-first mixin expansion with memoization and cycle detection
struct Flattener<'b> {
    entries: &'b [Vec<CompiledEntry>],
    names: &'b [StateDef],
    memo: Vec<Option<Vec<Rule>>>,
    path: Vec<StateId>,
}

impl Flattener<'_> {
    fn name(&self, id: StateId) -> String {
        self.names[id.index()].name.clone()
    }

    fn flatten(&mut self, id: StateId) -> RegistryResult<Vec<Rule>> {
        if let Some(rules) = &self.memo[id.index()] {
            return Ok(rules.clone());
        }

        if let Some(start) = self.path.iter().position(|&seen| seen == id) {
            let cycle = self.path[start..]
                .iter()
                .chain(std::iter::once(&id))
                .map(|&state| self.name(state))
                .collect();
            return Err(RegistryError::mixin_cycle(cycle, MAX_CYCLE_PATH_LENGTH));
        }

        if self.path.len() >= MAX_MIXIN_DEPTH {
            return Err(RegistryError::MixinTooDeep {
                state: self.name(self.path[0]),
                limit: MAX_MIXIN_DEPTH,
            });
        }

        self.path.push(id);
        let entries = self.entries;
        let mut rules = Vec::new();
        for entry in &entries[id.index()] {
            match entry {
                CompiledEntry::Rule(rule) => rules.push(rule.clone()),
                CompiledEntry::Mixin(mixed) => rules.extend(self.flatten(*mixed)?),
            }
        }
        self.path.pop();

        self.memo[id.index()] = Some(rules.clone());
        Ok(rules)
    }
}
