//! Per-call tokenization state: input, cursor and state stack

use crate::config::compile_time::lexical::MAX_STATE_DEPTH;
use crate::rules::{StateId, Transition};

/// Mutable state of one tokenization call
///
/// The stack is never empty: the bottom frame is the start state and
/// popping it is a no-op. At most `MAX_STATE_DEPTH` frames are stored;
/// deeper pushes only bump `overflow`, repeat the top stored frame, and
/// are the first to be popped.
#[derive(Debug, Clone)]
pub struct LexContext<'a> {
    input: &'a str,
    cursor: usize,
    stack: Vec<StateId>,
    overflow: usize,
}

impl<'a> LexContext<'a> {
    pub fn new(input: &'a str, start: StateId) -> Self {
        Self {
            input,
            cursor: 0,
            stack: vec![start],
            overflow: 0,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset of the next unconsumed character
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.input.len()
    }

    /// State currently matching
    pub fn top(&self) -> StateId {
        // The stack always holds the start frame
        self.stack[self.stack.len() - 1]
    }

    /// Nesting depth, counting frames past the storage limit
    pub fn depth(&self) -> usize {
        self.stack.len() + self.overflow
    }

    /// Stored frames from bottom to top
    pub fn stack(&self) -> &[StateId] {
        &self.stack
    }

    /// Pushes that went past `MAX_STATE_DEPTH` and are still open
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Push a frame; past `MAX_STATE_DEPTH` it is counted instead of stored
    pub fn push(&mut self, state: StateId) -> bool {
        if self.stack.len() >= MAX_STATE_DEPTH {
            self.overflow += 1;
        } else {
            self.stack.push(state);
        }
        true
    }

    /// Pop a frame, overflow first; the bottom frame stays
    pub fn pop(&mut self) -> bool {
        if self.overflow > 0 {
            self.overflow -= 1;
            return true;
        }
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Replace the top frame
    pub fn switch(&mut self, state: StateId) -> bool {
        let last = self.stack.len() - 1;
        let changed = self.stack[last] != state;
        self.stack[last] = state;
        changed
    }

    /// Apply a transition; true if the stack changed
    pub fn apply(&mut self, transition: &Transition<StateId>) -> bool {
        match transition {
            Transition::Stay => false,
            Transition::Push(state) => self.push(*state),
            Transition::PushCurrent => self.push(self.top()),
            Transition::Pop => self.pop(),
            Transition::Switch(state) => self.switch(*state),
        }
    }

    pub(crate) fn advance_to(&mut self, offset: usize) {
        debug_assert!(offset >= self.cursor && offset <= self.input.len());
        self.cursor = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: StateId = StateId(0);
    const COMMENT: StateId = StateId(1);

    #[test]
    fn test_pop_never_empties_stack() {
        let mut context = LexContext::new("x", ROOT);

        assert!(!context.pop());
        assert_eq!(context.depth(), 1);
        assert_eq!(context.top(), ROOT);
    }

    #[test]
    fn test_push_pop_and_switch() {
        let mut context = LexContext::new("(* *)", ROOT);

        assert!(context.apply(&Transition::Push(COMMENT)));
        assert!(context.apply(&Transition::PushCurrent));
        assert_eq!(context.stack(), &[ROOT, COMMENT, COMMENT]);

        assert!(context.apply(&Transition::Pop));
        assert!(!context.apply(&Transition::Switch(COMMENT)));
        assert!(context.apply(&Transition::Switch(ROOT)));
        assert_eq!(context.stack(), &[ROOT, ROOT]);
        assert!(!context.apply(&Transition::Stay));
    }

    #[test]
    fn test_pushes_past_limit_are_counted() {
        let mut context = LexContext::new("", ROOT);
        for _ in 1..MAX_STATE_DEPTH {
            assert!(context.push(COMMENT));
        }
        assert_eq!(context.overflow(), 0);

        assert!(context.push(COMMENT));
        assert!(context.push(ROOT));
        assert_eq!(context.stack().len(), MAX_STATE_DEPTH);
        assert_eq!(context.overflow(), 2);
        assert_eq!(context.depth(), MAX_STATE_DEPTH + 2);
        assert_eq!(context.top(), COMMENT);

        // Overflow unwinds before stored frames
        assert!(context.pop());
        assert!(context.pop());
        assert_eq!(context.overflow(), 0);
        assert_eq!(context.stack().len(), MAX_STATE_DEPTH);

        while context.pop() {}
        assert_eq!(context.depth(), 1);
        assert_eq!(context.top(), ROOT);
    }

    #[test]
    fn test_cursor_and_remaining() {
        let mut context = LexContext::new("let x", ROOT);
        assert_eq!(context.remaining(), "let x");

        context.advance_to(4);
        assert_eq!(context.cursor(), 4);
        assert_eq!(context.remaining(), "x");
        assert!(!context.is_at_end());

        context.advance_to(5);
        assert!(context.is_at_end());
    }
}
