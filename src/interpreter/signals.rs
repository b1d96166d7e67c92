//! Non-local control transfer
//!
//! Loop and function bodies communicate break/continue/return upward as a
//! plain value rather than through a native exception mechanism, so the
//! evaluator can inspect and re-dispatch a signal without unwinding the
//! Rust call stack.

use crate::interpreter::errors::ContextError;

/// The kind of non-local transfer a loop/function body is carrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    None,
    Continue,
    Break,
    Return,
}

/// A non-local control transfer produced by the evaluator.
///
/// `source_label`/`target_label` distinguish plain `break`/`continue` from
/// their labelled variants (`break outer`); `result` carries the value a
/// `return` is propagating.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSignal {
    pub kind: SignalKind,
    pub source_label: Option<String>,
    pub target_label: Option<String>,
    pub result: Option<String>,
}

impl LoopSignal {
    /// No signal in flight; evaluation proceeds normally.
    pub fn none() -> Self {
        Self { kind: SignalKind::None, source_label: None, target_label: None, result: None }
    }

    pub fn break_loop(target_label: Option<String>) -> Self {
        Self { kind: SignalKind::Break, source_label: None, target_label, result: None }
    }

    pub fn continue_loop(target_label: Option<String>) -> Self {
        Self { kind: SignalKind::Continue, source_label: None, target_label, result: None }
    }

    pub fn return_value(result: Option<String>) -> Self {
        Self { kind: SignalKind::Return, source_label: None, target_label: None, result }
    }

    pub fn is_none(&self) -> bool {
        self.kind == SignalKind::None
    }

    /// A signal targets the given loop label if it is unlabelled (targets the
    /// nearest enclosing loop) or the label matches exactly.
    pub fn targets(&self, label: &str) -> bool {
        match &self.target_label {
            None => true,
            Some(t) => t == label,
        }
    }

    /// Construct a details record, failing if `kind` was never set explicitly.
    ///
    /// Mirrors `InvalidSignal`: a signal constructed without a kind is a
    /// program-structure bug, not a recoverable condition.
    pub fn with_kind(kind: Option<SignalKind>) -> Result<Self, ContextError> {
        match kind {
            Some(kind) => Ok(Self { kind, source_label: None, target_label: None, result: None }),
            None => Err(ContextError::InvalidSignal),
        }
    }
}

impl Default for LoopSignal {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_signal_is_none() {
        assert!(LoopSignal::none().is_none());
    }

    #[test]
    fn unlabelled_signal_targets_any_label() {
        let sig = LoopSignal::break_loop(None);
        assert!(sig.targets("outer"));
        assert!(sig.targets("inner"));
    }

    #[test]
    fn labelled_signal_targets_only_its_label() {
        let sig = LoopSignal::break_loop(Some("outer".to_string()));
        assert!(sig.targets("outer"));
        assert!(!sig.targets("inner"));
    }

    #[test]
    fn with_kind_none_is_invalid_signal() {
        let err = LoopSignal::with_kind(None).unwrap_err();
        assert!(matches!(err, ContextError::InvalidSignal));
    }

    #[test]
    fn with_kind_some_succeeds() {
        let sig = LoopSignal::with_kind(Some(SignalKind::Return)).unwrap();
        assert_eq!(sig.kind, SignalKind::Return);
    }
}
