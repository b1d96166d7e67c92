//! Call stack
//!
//! A LIFO sequence of frames, one per user-function invocation currently on
//! the evaluator's call chain. There is exactly one call stack process-wide
//! (owned by the `Interpreter`).

use crate::interpreter::declarations::{DeclaredFunction, RuntimeValue};
use crate::interpreter::errors::ContextError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function: DeclaredFunction,
    pub arguments: HashMap<String, RuntimeValue>,
    pub return_value: Option<RuntimeValue>,
}

#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push_call(&mut self, function: DeclaredFunction, arguments: HashMap<String, RuntimeValue>) {
        self.frames.push(CallFrame { function, arguments, return_value: None });
    }

    /// Replace the top frame's function/arguments, setting its return value.
    pub fn update_call(
        &mut self,
        function: DeclaredFunction,
        arguments: HashMap<String, RuntimeValue>,
        return_value: RuntimeValue,
    ) -> Result<(), ContextError> {
        let top = self.frames.last_mut().ok_or(ContextError::EmptyStackPop)?;
        top.function = function;
        top.arguments = arguments;
        top.return_value = Some(return_value);
        Ok(())
    }

    pub fn pop_call(&mut self) -> Result<CallFrame, ContextError> {
        self.frames.pop().ok_or(ContextError::EmptyStackPop)
    }

    pub fn top(&self) -> Option<&CallFrame> {
        self.frames.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parse_node::NodeId;

    fn func(name: &str) -> DeclaredFunction {
        DeclaredFunction::new(name, vec!["n".to_string()], NodeId(1))
    }

    #[test]
    fn push_then_pop_round_trips_frame() {
        let mut stack = CallStack::new();
        let mut args = HashMap::new();
        args.insert("n".to_string(), RuntimeValue::new("3", None));
        stack.push_call(func("f"), args.clone());

        let frame = stack.pop_call().unwrap();
        assert_eq!(frame.function.name, "f");
        assert_eq!(frame.arguments, args);
        assert!(frame.return_value.is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn update_then_pop_carries_return_value() {
        let mut stack = CallStack::new();
        let mut args = HashMap::new();
        args.insert("n".to_string(), RuntimeValue::new("3", None));
        stack.push_call(func("f"), args.clone());

        stack.update_call(func("f"), args, RuntimeValue::new("9", None)).unwrap();
        let frame = stack.pop_call().unwrap();
        assert_eq!(frame.return_value.unwrap().raw, "9");
    }

    #[test]
    fn pop_on_empty_stack_is_empty_stack_pop() {
        let mut stack = CallStack::new();
        let err = stack.pop_call().unwrap_err();
        assert!(matches!(err, ContextError::EmptyStackPop));
    }

    #[test]
    fn update_on_empty_stack_is_empty_stack_pop() {
        let mut stack = CallStack::new();
        let err = stack.update_call(func("f"), HashMap::new(), RuntimeValue::new("0", None)).unwrap_err();
        assert!(matches!(err, ContextError::EmptyStackPop));
    }

    #[test]
    fn push_pop_leaves_length_unchanged() {
        let mut stack = CallStack::new();
        let before = stack.len();
        stack.push_call(func("f"), HashMap::new());
        stack.pop_call().unwrap();
        assert_eq!(stack.len(), before);
    }
}
