//! Execution-context error taxonomy
//!
//! `NameNotFound`/`Redeclaration` are reported to the evaluator, which may
//! translate them into user-facing diagnostics with source locations. Every
//! other variant denotes a program-structure bug and should abort the
//! current evaluation.

use thiserror::Error;

/// Which of the four name tables (plus function) an operation was targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    Function,
    Parameter,
    Argument,
    LoopVariable,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NameKind::Variable => "variable",
            NameKind::Function => "function",
            NameKind::Parameter => "parameter",
            NameKind::Argument => "argument",
            NameKind::LoopVariable => "loop variable",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("{kind} '{name}' not found")]
    NameNotFound { kind: NameKind, name: String },

    #[error("{kind} '{name}' already declared in this scope")]
    Redeclaration { kind: NameKind, name: String },

    #[error("a root scope may only be created when no other scopes exist (outside REPL mode)")]
    IllegalScopeCreation,

    #[error("pop on an empty stack")]
    EmptyStackPop,

    #[error("host classpath scan failed: {cause}")]
    HostScanFailed { cause: String },

    #[error("failed to persist host-class scan cache: {cause}")]
    CachePersistFailed { cause: String },

    #[error("loop signal constructed with no signal kind")]
    InvalidSignal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_name() {
        let err = ContextError::NameNotFound { kind: NameKind::Variable, name: "x".into() };
        assert_eq!(err.to_string(), "variable 'x' not found");
    }

    #[test]
    fn redeclaration_display() {
        let err = ContextError::Redeclaration { kind: NameKind::Parameter, name: "n".into() };
        assert_eq!(err.to_string(), "parameter 'n' already declared in this scope");
    }
}
