//! Loop stack
//!
//! A LIFO sequence of (label, loop-node) pairs, pushed on loop entry and
//! popped on loop exit. There is exactly one loop stack process-wide.

use crate::interpreter::errors::ContextError;
use crate::interpreter::parse_node::NodeId;
use crate::interpreter::util::new_unique_suffix;

#[derive(Debug, Clone)]
pub struct LoopFrame {
    pub label: String,
    pub node: NodeId,
}

#[derive(Debug, Default)]
pub struct LoopStack {
    frames: Vec<LoopFrame>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push_loop(&mut self, label: String, node: NodeId) {
        self.frames.push(LoopFrame { label, node });
    }

    pub fn pop_loop(&mut self) -> Result<LoopFrame, ContextError> {
        self.frames.pop().ok_or(ContextError::EmptyStackPop)
    }

    pub fn loop_contains_label(&self, label: &str) -> bool {
        self.frames.iter().any(|f| f.label == label)
    }

    /// Enumerate labels top-first (innermost loop first).
    pub fn get_loop_labels(&self) -> Vec<String> {
        self.frames.iter().rev().map(|f| f.label.clone()).collect()
    }

    pub fn top(&self) -> Option<&LoopFrame> {
        self.frames.last()
    }
}

/// The label from the source if present, else a synthesized
/// `"<depth>-loop-<uuid>"` label.
pub fn current_loop_label(source_label: Option<&str>, depth: u32) -> String {
    match source_label {
        Some(label) => label.to_string(),
        None => format!("{depth}-loop-{}", new_unique_suffix()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_loop_lookup_scenario() {
        let mut stack = LoopStack::new();
        stack.push_loop("outer".to_string(), NodeId(1));
        stack.push_loop("inner".to_string(), NodeId(2));

        assert_eq!(stack.get_loop_labels(), vec!["inner".to_string(), "outer".to_string()]);
        assert!(stack.loop_contains_label("outer"));
        assert!(stack.loop_contains_label("inner"));
        assert!(!stack.loop_contains_label("missing"));

        stack.pop_loop().unwrap();
        stack.pop_loop().unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_loop_stack_is_empty_stack_pop() {
        let mut stack = LoopStack::new();
        let err = stack.pop_loop().unwrap_err();
        assert!(matches!(err, ContextError::EmptyStackPop));
    }

    #[test]
    fn current_loop_label_prefers_source_label() {
        assert_eq!(current_loop_label(Some("outer"), 3), "outer");
    }

    #[test]
    fn current_loop_label_synthesizes_when_absent() {
        let label = current_loop_label(None, 2);
        assert!(label.starts_with("2-loop-"));
    }
}
