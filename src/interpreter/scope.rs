//! Scope node
//!
//! A single node in the name-resolution chain. Holds the four per-scope
//! name tables plus the transient evaluator-visit flags described in
//! SPEC_FULL.md §3/§4.1.
//!
//! Cross-scope resolution (walking the parent chain) is implemented as free
//! functions generic over [`ScopeChain`] rather than as methods on `Scope`
//! itself, since a single scope has no notion of its ancestors beyond a
//! `parent_depth` integer — the registry (or, in tests, a minimal stand-in)
//! supplies the chain.

use std::collections::HashMap;

use crate::interpreter::declarations::{DeclaredFunction, DeclaredParameter, DeclaredVariable, RuntimeValue};
use crate::interpreter::errors::{ContextError, NameKind};
use crate::interpreter::parse_tree::ParseTreeExecutionMap;

/// Why a scope was created; used only for the table-presence invariant and
/// debug assertions, never for resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    FunctionCall,
    LoopIteration,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    depth: u32,
    parent_depth: Option<u32>,
    kind: Option<ScopeKind>,

    variables: HashMap<String, DeclaredVariable>,
    functions: HashMap<String, DeclaredFunction>,
    parameters: Option<HashMap<String, DeclaredParameter>>,
    arguments: Option<HashMap<String, RuntimeValue>>,
    loop_variables: Option<HashMap<String, RuntimeValue>>,

    function_call_id: Option<String>,
    function_name: Option<String>,
    loop_label: Option<String>,

    parsing_function_call_id: bool,
    parsing_assignment: bool,
    creating_object: bool,
    declaration_of_assignment: Option<(DeclaredVariable, bool)>,

    parse_tree_execution: ParseTreeExecutionMap,
}

impl Scope {
    pub fn new_root(depth: u32) -> Self {
        Self { depth, kind: Some(ScopeKind::Root), ..Default::default() }
    }

    pub fn new_function_call(depth: u32, parent_depth: u32, function_call_id: String, function_name: String) -> Self {
        Self {
            depth,
            parent_depth: Some(parent_depth),
            kind: Some(ScopeKind::FunctionCall),
            parameters: Some(HashMap::new()),
            arguments: Some(HashMap::new()),
            function_call_id: Some(function_call_id),
            function_name: Some(function_name),
            ..Default::default()
        }
    }

    pub fn new_loop_iteration(depth: u32, parent_depth: u32, loop_label: String) -> Self {
        Self {
            depth,
            parent_depth: Some(parent_depth),
            kind: Some(ScopeKind::LoopIteration),
            loop_variables: Some(HashMap::new()),
            loop_label: Some(loop_label),
            ..Default::default()
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn parent_depth(&self) -> Option<u32> {
        self.parent_depth
    }

    pub fn kind(&self) -> Option<ScopeKind> {
        self.kind
    }

    pub fn function_call_id(&self) -> Option<&str> {
        self.function_call_id.as_deref()
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    pub fn loop_label(&self) -> Option<&str> {
        self.loop_label.as_deref()
    }

    // ---- transient flags ----

    pub fn parsing_function_call_id(&self) -> bool {
        self.parsing_function_call_id
    }

    pub fn set_parsing_function_call_id(&mut self, value: bool) {
        self.parsing_function_call_id = value;
    }

    pub fn parsing_assignment(&self) -> bool {
        self.parsing_assignment
    }

    /// Clearing `parsing_assignment` also clears `declaration_of_assignment`.
    pub fn set_parsing_assignment(&mut self, value: bool) {
        self.parsing_assignment = value;
        if !value {
            self.declaration_of_assignment = None;
        }
    }

    pub fn creating_object(&self) -> bool {
        self.creating_object
    }

    pub fn set_creating_object(&mut self, value: bool) {
        self.creating_object = value;
    }

    pub fn declaration_of_assignment(&self) -> Option<&(DeclaredVariable, bool)> {
        self.declaration_of_assignment.as_ref()
    }

    pub fn set_declaration_of_assignment(&mut self, value: Option<(DeclaredVariable, bool)>) {
        self.declaration_of_assignment = value;
    }

    // ---- parse-tree execution annotation ----

    pub fn parse_tree_execution(&self) -> &ParseTreeExecutionMap {
        &self.parse_tree_execution
    }

    pub fn parse_tree_execution_mut(&mut self) -> &mut ParseTreeExecutionMap {
        &mut self.parse_tree_execution
    }

    // ---- local (single-scope) table access ----
    // Cross-scope semantics (contains/get/set/define walking ancestors) live
    // in the free functions below, generic over ScopeChain; these are the
    // single-scope primitives they're built from.

    pub fn local_variable(&self, name: &str) -> Option<&DeclaredVariable> {
        self.variables.get(name)
    }

    pub fn local_set_variable(&mut self, name: &str, value: DeclaredVariable) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn local_function(&self, name: &str) -> Option<&DeclaredFunction> {
        self.functions.get(name)
    }

    pub fn local_set_function(&mut self, name: &str, value: DeclaredFunction) {
        self.functions.insert(name.to_string(), value);
    }

    pub fn local_parameter(&self, canonical_key: &str) -> Option<&DeclaredParameter> {
        self.parameters.as_ref().and_then(|p| p.get(canonical_key))
    }

    pub fn local_set_parameter(&mut self, canonical_key: &str, value: DeclaredParameter) {
        self.parameters.get_or_insert_with(HashMap::new).insert(canonical_key.to_string(), value);
    }

    pub fn local_argument(&self, canonical_key: &str) -> Option<&RuntimeValue> {
        self.arguments.as_ref().and_then(|a| a.get(canonical_key))
    }

    pub fn local_set_argument(&mut self, canonical_key: &str, value: RuntimeValue) {
        self.arguments.get_or_insert_with(HashMap::new).insert(canonical_key.to_string(), value);
    }

    pub fn local_loop_variable(&self, canonical_key: &str) -> Option<&RuntimeValue> {
        self.loop_variables.as_ref().and_then(|v| v.get(canonical_key))
    }

    pub fn local_set_loop_variable(&mut self, canonical_key: &str, value: RuntimeValue) {
        self.loop_variables.get_or_insert_with(HashMap::new).insert(canonical_key.to_string(), value);
    }

    pub fn local_remove_loop_variable(&mut self, canonical_key: &str) -> bool {
        self.loop_variables.as_mut().map(|v| v.remove(canonical_key).is_some()).unwrap_or(false)
    }
}

// ============================================================================
// Canonical key derivation (§3 / §6)
// ============================================================================

/// `<functionName>-<paramName>`; passed through unchanged if no function is
/// active (root-level built-ins), per §4.1.
pub fn canonical_parameter_key(function_name: Option<&str>, param_name: &str) -> String {
    match function_name {
        Some(fname) => format!("{fname}-{param_name}"),
        None => param_name.to_string(),
    }
}

/// `<functionCallId>-<argName>`.
pub fn canonical_argument_key(function_call_id: &str, arg_name: &str) -> String {
    format!("{function_call_id}-{arg_name}")
}

/// `<loopLabel>-<varName>`.
pub fn canonical_loop_variable_key(loop_label: &str, var_name: &str) -> String {
    format!("{loop_label}-{var_name}")
}

// ============================================================================
// Cross-scope resolution (walks the parent chain)
// ============================================================================

/// The chain-of-scopes context required to walk ancestors. Implemented by
/// the scope registry; kept as a trait so the resolution logic here can be
/// unit tested against a minimal stand-in.
pub trait ScopeChain {
    fn scope_at(&self, depth: u32) -> Option<&Scope>;
    fn scope_at_mut(&mut self, depth: u32) -> Option<&mut Scope>;
}

/// Walk from `start_depth` up through parents, in nearest-first order.
fn ancestor_depths<C: ScopeChain>(chain: &C, start_depth: u32) -> Vec<u32> {
    let mut depths = Vec::new();
    let mut current = chain.scope_at(start_depth);
    while let Some(scope) = current {
        depths.push(scope.depth());
        current = scope.parent_depth().and_then(|d| chain.scope_at(d));
    }
    depths
}

pub fn contains_variable<C: ScopeChain>(chain: &C, start_depth: u32, name: &str) -> bool {
    ancestor_depths(chain, start_depth)
        .iter()
        .any(|d| chain.scope_at(*d).map(|s| s.local_variable(name).is_some()).unwrap_or(false))
}

pub fn get_variable<C: ScopeChain>(
    chain: &C,
    start_depth: u32,
    name: &str,
    safe: bool,
) -> Result<Option<(u32, DeclaredVariable)>, ContextError> {
    for d in ancestor_depths(chain, start_depth) {
        if let Some(scope) = chain.scope_at(d) {
            if let Some(v) = scope.local_variable(name) {
                return Ok(Some((d, v.clone())));
            }
        }
    }
    if safe {
        Ok(None)
    } else {
        Err(ContextError::NameNotFound { kind: NameKind::Variable, name: name.to_string() })
    }
}

pub fn set_variable<C: ScopeChain>(chain: &mut C, start_depth: u32, name: &str, value: DeclaredVariable) {
    for d in ancestor_depths(chain, start_depth) {
        if let Some(scope) = chain.scope_at_mut(d) {
            if scope.local_variable(name).is_some() {
                scope.local_set_variable(name, value);
                return;
            }
        }
    }
    if let Some(scope) = chain.scope_at_mut(start_depth) {
        scope.local_set_variable(name, value);
    }
}

pub fn define_variable<C: ScopeChain>(
    chain: &mut C,
    start_depth: u32,
    name: &str,
    value: DeclaredVariable,
    lenient: bool,
) -> Result<(), ContextError> {
    let already_local = chain.scope_at(start_depth).map(|s| s.local_variable(name).is_some()).unwrap_or(false);
    if already_local {
        if lenient {
            return Ok(());
        }
        return Err(ContextError::Redeclaration { kind: NameKind::Variable, name: name.to_string() });
    }
    if let Some(scope) = chain.scope_at_mut(start_depth) {
        scope.local_set_variable(name, value);
    }
    Ok(())
}

/// Function table lookup across the parent chain only (root's built-in and
/// host tables are consulted separately, one layer up, since they require
/// the interpreter's host-bootstrap state).
pub fn get_user_function<C: ScopeChain>(chain: &C, start_depth: u32, name: &str) -> Option<(u32, DeclaredFunction)> {
    for d in ancestor_depths(chain, start_depth) {
        if let Some(scope) = chain.scope_at(d) {
            if let Some(f) = scope.local_function(name) {
                return Some((d, f.clone()));
            }
        }
    }
    None
}

pub fn define_function<C: ScopeChain>(
    chain: &mut C,
    start_depth: u32,
    func: DeclaredFunction,
    lenient: bool,
) -> Result<(), ContextError> {
    let already_local = chain.scope_at(start_depth).map(|s| s.local_function(&func.name).is_some()).unwrap_or(false);
    if already_local {
        if lenient {
            return Ok(());
        }
        return Err(ContextError::Redeclaration { kind: NameKind::Function, name: func.name });
    }
    if let Some(scope) = chain.scope_at_mut(start_depth) {
        scope.local_set_function(&func.name.clone(), func);
    }
    Ok(())
}

/// Parameters canonicalize using the *current* scope's function name.
pub fn get_parameter<C: ScopeChain>(
    chain: &C,
    start_depth: u32,
    param_name: &str,
    safe: bool,
) -> Result<Option<(u32, DeclaredParameter)>, ContextError> {
    let function_name = chain.scope_at(start_depth).and_then(|s| s.function_name());
    let key = canonical_parameter_key(function_name, param_name);
    for d in ancestor_depths(chain, start_depth) {
        if let Some(scope) = chain.scope_at(d) {
            if let Some(p) = scope.local_parameter(&key) {
                return Ok(Some((d, p.clone())));
            }
        }
    }
    if safe {
        Ok(None)
    } else {
        Err(ContextError::NameNotFound { kind: NameKind::Parameter, name: param_name.to_string() })
    }
}

pub fn contains_parameter<C: ScopeChain>(chain: &C, start_depth: u32, param_name: &str) -> bool {
    get_parameter(chain, start_depth, param_name, true).ok().flatten().is_some()
}

/// Per §9 Open Questions: always insert under the canonical key, including
/// the first definition for a given function (the source's raw-name insert
/// on first-define is treated as a bug, not intended behavior).
pub fn define_parameter<C: ScopeChain>(
    chain: &mut C,
    start_depth: u32,
    param_name: &str,
    value: DeclaredParameter,
    lenient: bool,
) -> Result<(), ContextError> {
    let function_name = chain.scope_at(start_depth).and_then(|s| s.function_name().map(|s| s.to_string()));
    let key = canonical_parameter_key(function_name.as_deref(), param_name);
    let already_local = chain.scope_at(start_depth).map(|s| s.local_parameter(&key).is_some()).unwrap_or(false);
    if already_local {
        if lenient {
            return Ok(());
        }
        return Err(ContextError::Redeclaration { kind: NameKind::Parameter, name: param_name.to_string() });
    }
    if let Some(scope) = chain.scope_at_mut(start_depth) {
        scope.local_set_parameter(&key, value);
    }
    Ok(())
}

pub fn get_argument<C: ScopeChain>(
    chain: &C,
    start_depth: u32,
    arg_name: &str,
    safe: bool,
) -> Result<Option<(u32, RuntimeValue)>, ContextError> {
    let function_call_id = chain.scope_at(start_depth).and_then(|s| s.function_call_id());
    let key = function_call_id.map(|id| canonical_argument_key(id, arg_name));
    if let Some(key) = key {
        for d in ancestor_depths(chain, start_depth) {
            if let Some(scope) = chain.scope_at(d) {
                if let Some(v) = scope.local_argument(&key) {
                    return Ok(Some((d, v.clone())));
                }
            }
        }
    }
    if safe {
        Ok(None)
    } else {
        Err(ContextError::NameNotFound { kind: NameKind::Argument, name: arg_name.to_string() })
    }
}

pub fn contains_argument<C: ScopeChain>(chain: &C, start_depth: u32, arg_name: &str) -> bool {
    get_argument(chain, start_depth, arg_name, true).ok().flatten().is_some()
}

/// Defines into the *receiver* (callee) scope's arguments table, per the
/// resolution of the `defineFunctionArguments` Open Question in §9.
pub fn define_argument<C: ScopeChain>(chain: &mut C, callee_depth: u32, arg_name: &str, value: RuntimeValue) -> Result<(), ContextError> {
    let function_call_id = chain
        .scope_at(callee_depth)
        .and_then(|s| s.function_call_id().map(|s| s.to_string()))
        .ok_or_else(|| ContextError::NameNotFound { kind: NameKind::Argument, name: arg_name.to_string() })?;
    let key = canonical_argument_key(&function_call_id, arg_name);
    if let Some(scope) = chain.scope_at_mut(callee_depth) {
        scope.local_set_argument(&key, value);
    }
    Ok(())
}

pub fn get_loop_variable<C: ScopeChain>(
    chain: &C,
    start_depth: u32,
    var_name: &str,
    safe: bool,
) -> Result<Option<(u32, RuntimeValue)>, ContextError> {
    for d in ancestor_depths(chain, start_depth) {
        if let Some(scope) = chain.scope_at(d) {
            if let Some(label) = scope.loop_label() {
                let key = canonical_loop_variable_key(label, var_name);
                if let Some(v) = scope.local_loop_variable(&key) {
                    return Ok(Some((d, v.clone())));
                }
            }
        }
    }
    if safe {
        Ok(None)
    } else {
        Err(ContextError::NameNotFound { kind: NameKind::LoopVariable, name: var_name.to_string() })
    }
}

pub fn contains_loop_variable<C: ScopeChain>(chain: &C, start_depth: u32, var_name: &str) -> bool {
    get_loop_variable(chain, start_depth, var_name, true).ok().flatten().is_some()
}

pub fn define_loop_variable<C: ScopeChain>(chain: &mut C, start_depth: u32, var_name: &str, value: RuntimeValue) -> Result<(), ContextError> {
    let loop_label = chain.scope_at(start_depth).and_then(|s| s.loop_label().map(|s| s.to_string()));
    let key = match loop_label {
        Some(label) => canonical_loop_variable_key(&label, var_name),
        None => var_name.to_string(),
    };
    let already_local = chain.scope_at(start_depth).map(|s| s.local_loop_variable(&key).is_some()).unwrap_or(false);
    if already_local {
        return Err(ContextError::Redeclaration { kind: NameKind::LoopVariable, name: var_name.to_string() });
    }
    if let Some(scope) = chain.scope_at_mut(start_depth) {
        scope.local_set_loop_variable(&key, value);
    }
    Ok(())
}

/// Remove if present; fail only if absent and not lenient. Resolves the
/// `removeLoopVariable` Open Question in §9 in the direction SPEC_FULL.md
/// calls for.
pub fn remove_loop_variable<C: ScopeChain>(chain: &mut C, start_depth: u32, var_name: &str, lenient: bool) -> Result<(), ContextError> {
    let loop_label = chain.scope_at(start_depth).and_then(|s| s.loop_label().map(|s| s.to_string()));
    let key = match loop_label {
        Some(label) => canonical_loop_variable_key(&label, var_name),
        None => var_name.to_string(),
    };
    let removed = chain.scope_at_mut(start_depth).map(|s| s.local_remove_loop_variable(&key)).unwrap_or(false);
    if removed || lenient {
        Ok(())
    } else {
        Err(ContextError::NameNotFound { kind: NameKind::LoopVariable, name: var_name.to_string() })
    }
}

/// Nearest non-null `loop_label` walking from `start_depth` upward.
pub fn get_loop_label<C: ScopeChain>(chain: &C, start_depth: u32) -> Option<String> {
    ancestor_depths(chain, start_depth)
        .into_iter()
        .find_map(|d| chain.scope_at(d).and_then(|s| s.loop_label().map(|s| s.to_string())))
}

/// The VARIABLE_GETTER: resolves a bare identifier in the fixed order
/// loop variable -> argument -> parameter -> ordinary variable. First hit
/// with a non-null value wins; a kind with no binding at all falls through
/// to the next kind, even if a later kind is shadowed by an earlier one at a
/// shallower scope (tie-break is "first non-null value in this order").
pub fn resolve_variable<C: ScopeChain>(chain: &C, start_depth: u32, name: &str) -> Option<RuntimeValue> {
    if let Ok(Some((_, v))) = get_loop_variable(chain, start_depth, name, true) {
        return Some(v);
    }
    if let Ok(Some((_, v))) = get_argument(chain, start_depth, name, true) {
        return Some(v);
    }
    if let Ok(Some((_, p))) = get_parameter(chain, start_depth, name, true) {
        if let Some(v) = p.value {
            return Some(v);
        }
    }
    if let Ok(Some((_, v))) = get_variable(chain, start_depth, name, true) {
        return v.value;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    /// Minimal scope chain for unit-testing resolution in isolation from the
    /// full registry.
    struct FakeChain(Map<u32, Scope>);

    impl ScopeChain for FakeChain {
        fn scope_at(&self, depth: u32) -> Option<&Scope> {
            self.0.get(&depth)
        }
        fn scope_at_mut(&mut self, depth: u32) -> Option<&mut Scope> {
            self.0.get_mut(&depth)
        }
    }

    fn two_level_chain() -> FakeChain {
        let mut m = Map::new();
        m.insert(0, Scope::new_root(0));
        m.insert(1, Scope::new_function_call(1, 0, "1-f-abc".into(), "f".into()));
        FakeChain(m)
    }

    #[test]
    fn shadowing_across_scopes() {
        let mut chain = two_level_chain();
        define_variable(&mut chain, 0, "x", DeclaredVariable::new(Some(RuntimeValue::new("1", None)), None), false).unwrap();
        define_variable(&mut chain, 1, "x", DeclaredVariable::new(Some(RuntimeValue::new("2", None)), None), false).unwrap();

        assert_eq!(resolve_variable(&chain, 1, "x").unwrap().raw, "2");
        assert_eq!(resolve_variable(&chain, 0, "x").unwrap().raw, "1");
    }

    #[test]
    fn define_twice_without_lenient_errors() {
        let mut chain = two_level_chain();
        define_variable(&mut chain, 0, "x", DeclaredVariable::default(), false).unwrap();
        let err = define_variable(&mut chain, 0, "x", DeclaredVariable::default(), false).unwrap_err();
        assert!(matches!(err, ContextError::Redeclaration { kind: NameKind::Variable, .. }));
    }

    #[test]
    fn define_twice_lenient_is_silently_ignored() {
        let mut chain = two_level_chain();
        define_variable(&mut chain, 0, "x", DeclaredVariable::new(Some(RuntimeValue::new("1", None)), None), false).unwrap();
        define_variable(&mut chain, 0, "x", DeclaredVariable::new(Some(RuntimeValue::new("2", None)), None), true).unwrap();
        assert_eq!(resolve_variable(&chain, 0, "x").unwrap().raw, "1");
    }

    #[test]
    fn set_updates_nearest_ancestor_binding() {
        let mut chain = two_level_chain();
        define_variable(&mut chain, 0, "x", DeclaredVariable::new(Some(RuntimeValue::new("1", None)), None), false).unwrap();
        set_variable(&mut chain, 1, "x", DeclaredVariable::new(Some(RuntimeValue::new("9", None)), None));
        assert_eq!(resolve_variable(&chain, 1, "x").unwrap().raw, "9");
        assert_eq!(resolve_variable(&chain, 0, "x").unwrap().raw, "9");
    }

    #[test]
    fn set_with_no_existing_binding_creates_local() {
        let mut chain = two_level_chain();
        set_variable(&mut chain, 1, "y", DeclaredVariable::new(Some(RuntimeValue::new("5", None)), None));
        assert!(chain.scope_at(1).unwrap().local_variable("y").is_some());
        assert!(chain.scope_at(0).unwrap().local_variable("y").is_none());
    }

    #[test]
    fn get_unsafe_on_missing_name_errors() {
        let chain = two_level_chain();
        let err = get_variable(&chain, 1, "missing", false).unwrap_err();
        assert!(matches!(err, ContextError::NameNotFound { kind: NameKind::Variable, .. }));
    }

    #[test]
    fn parameter_canonical_key_uses_function_name() {
        let mut chain = two_level_chain();
        define_parameter(&mut chain, 1, "n", DeclaredParameter::new(Some(RuntimeValue::new("3", None)), None), false).unwrap();
        assert!(chain.scope_at(1).unwrap().local_parameter("f-n").is_some());
    }

    #[test]
    fn parameter_without_active_function_passes_through_unchanged() {
        let mut chain = two_level_chain();
        define_parameter(&mut chain, 0, "n", DeclaredParameter::new(Some(RuntimeValue::new("3", None)), None), false).unwrap();
        assert!(chain.scope_at(0).unwrap().local_parameter("n").is_some());
    }

    #[test]
    fn variable_getter_prefers_loop_over_argument_over_parameter_over_variable() {
        let mut chain = two_level_chain();
        define_variable(&mut chain, 1, "n", DeclaredVariable::new(Some(RuntimeValue::new("var", None)), None), false).unwrap();
        define_parameter(&mut chain, 1, "n", DeclaredParameter::new(Some(RuntimeValue::new("param", None)), None), false).unwrap();
        assert_eq!(resolve_variable(&chain, 1, "n").unwrap().raw, "param");

        define_argument(&mut chain, 1, "n", RuntimeValue::new("arg", None)).unwrap();
        assert_eq!(resolve_variable(&chain, 1, "n").unwrap().raw, "arg");
    }

    #[test]
    fn remove_loop_variable_present_succeeds() {
        let mut m = Map::new();
        m.insert(0, Scope::new_root(0));
        m.insert(1, Scope::new_loop_iteration(1, 0, "outer".into()));
        let mut chain = FakeChain(m);

        define_loop_variable(&mut chain, 1, "i", RuntimeValue::new("0", None)).unwrap();
        remove_loop_variable(&mut chain, 1, "i", false).unwrap();
        assert!(!contains_loop_variable(&chain, 1, "i"));
    }

    #[test]
    fn remove_loop_variable_absent_not_lenient_errors() {
        let mut m = Map::new();
        m.insert(0, Scope::new_root(0));
        m.insert(1, Scope::new_loop_iteration(1, 0, "outer".into()));
        let mut chain = FakeChain(m);
        let err = remove_loop_variable(&mut chain, 1, "missing", false).unwrap_err();
        assert!(matches!(err, ContextError::NameNotFound { kind: NameKind::LoopVariable, .. }));
    }

    #[test]
    fn remove_loop_variable_absent_lenient_is_ok() {
        let mut m = Map::new();
        m.insert(0, Scope::new_root(0));
        m.insert(1, Scope::new_loop_iteration(1, 0, "outer".into()));
        let mut chain = FakeChain(m);
        remove_loop_variable(&mut chain, 1, "missing", true).unwrap();
    }

    #[test]
    fn get_loop_label_walks_to_root() {
        let chain = two_level_chain();
        assert_eq!(get_loop_label(&chain, 1), None);
    }

    #[test]
    fn clearing_parsing_assignment_clears_declaration() {
        let mut scope = Scope::new_root(0);
        scope.set_parsing_assignment(true);
        scope.set_declaration_of_assignment(Some((DeclaredVariable::default(), true)));
        assert!(scope.declaration_of_assignment().is_some());

        scope.set_parsing_assignment(false);
        assert!(scope.declaration_of_assignment().is_none());
    }
}
