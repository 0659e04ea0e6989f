//! What a matching rule does: emit tokens, then move the state stack

use crate::tokens::TokenKind;

/// Tokens produced from a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// One token spanning the whole match
    Token(TokenKind),
    /// One token per listed capture group, in listed order
    Groups(Vec<(usize, TokenKind)>),
    /// No classified token; any consumed text still comes out as `Text`
    Nothing,
}

/// Stack operation applied after emission
///
/// `S` is a state name in rule tables and a resolved id once compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<S> {
    Stay,
    Push(S),
    /// Push another frame of the current state
    PushCurrent,
    /// Pop one frame; never pops the bottom frame
    Pop,
    /// Replace the top frame
    Switch(S),
}

impl<S> Transition<S> {
    /// Resolve state references, keeping the operation
    pub fn resolve<T, E>(self, mut f: impl FnMut(S) -> Result<T, E>) -> Result<Transition<T>, E> {
        Ok(match self {
            Transition::Stay => Transition::Stay,
            Transition::Push(state) => Transition::Push(f(state)?),
            Transition::PushCurrent => Transition::PushCurrent,
            Transition::Pop => Transition::Pop,
            Transition::Switch(state) => Transition::Switch(f(state)?),
        })
    }

    /// State named by this transition, if any
    pub fn target(&self) -> Option<&S> {
        match self {
            Transition::Push(state) | Transition::Switch(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }
}
