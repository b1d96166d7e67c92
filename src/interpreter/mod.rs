//! Execution context
//!
//! `Interpreter` is the single owning value the REDESIGN FLAGS call for: one
//! scope arena, one call stack, one loop stack, one bootstrap coordinator,
//! replacing a scattering of process-global statics. The evaluator (external
//! to this crate) drives it by entering/exiting scopes and resolving names
//! through it as execution proceeds.

pub mod call_stack;
pub mod declarations;
pub mod errors;
pub mod loop_stack;
pub mod parse_node;
pub mod parse_tree;
pub mod registry;
pub mod scope;
pub mod signals;
pub mod util;

use std::collections::HashMap;

use crate::config::BootstrapConfig;
use crate::host::bootstrap::BootstrapCoordinator;
use crate::host::source::ClassSource;
use crate::interpreter::call_stack::CallStack;
use crate::interpreter::declarations::{
    BuiltinFunctionDescriptor, DeclaredFunction, DeclaredParameter, DeclaredVariable, FunctionLookup, HostMethodDescriptor, RuntimeValue,
};
use crate::interpreter::errors::ContextError;
use crate::interpreter::loop_stack::{current_loop_label, LoopStack};
use crate::interpreter::parse_node::NodeId;
use crate::interpreter::registry::ScopeRegistry;
use crate::interpreter::scope;
use crate::interpreter::scope::ScopeChain;
use crate::interpreter::util::new_function_call_id;

/// Process-wide (in practice, per-`Interpreter`) table of names implemented
/// directly by this runtime rather than by user code or host reflection.
fn default_builtins() -> HashMap<String, Vec<BuiltinFunctionDescriptor>> {
    let mut table = HashMap::new();
    table.insert("print".to_string(), vec![BuiltinFunctionDescriptor { name: "print".to_string(), arity: None }]);
    table.insert("len".to_string(), vec![BuiltinFunctionDescriptor { name: "len".to_string(), arity: Some(1) }]);
    table.insert("type_of".to_string(), vec![BuiltinFunctionDescriptor { name: "type_of".to_string(), arity: Some(1) }]);
    table
}

pub struct Interpreter {
    registry: ScopeRegistry,
    call_stack: CallStack,
    loop_stack: LoopStack,
    current_depth: u32,
    config: BootstrapConfig,
    bootstrap: BootstrapCoordinator,
    builtins: HashMap<String, Vec<BuiltinFunctionDescriptor>>,
}

impl Interpreter {
    pub fn new(config: BootstrapConfig) -> Result<Self, ContextError> {
        let mut registry = ScopeRegistry::new();
        registry.register_root(config.inside_repl)?;
        Ok(Self {
            registry,
            call_stack: CallStack::new(),
            loop_stack: LoopStack::new(),
            current_depth: 0,
            config,
            bootstrap: BootstrapCoordinator::new(),
            builtins: default_builtins(),
        })
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Begin a fresh REPL interaction: creates a new root scope, legal only
    /// because `INSIDE_REPL` relaxes the single-root invariant.
    pub fn begin_repl_root(&mut self) -> Result<(), ContextError> {
        self.registry.register_root(true)?;
        self.current_depth = 0;
        Ok(())
    }

    // ---- call stack / function-call scopes ----

    pub fn enter_function_call(&mut self, function: DeclaredFunction, arguments: HashMap<String, RuntimeValue>) -> Result<u32, ContextError> {
        let function_call_id = new_function_call_id(self.current_depth, &function.name);
        let depth = self.registry.register_function_call(self.current_depth, function_call_id.clone(), function.name.clone())?;

        for param_name in &function.parameters {
            let value = arguments.get(param_name).cloned();
            scope::define_parameter(&mut self.registry, depth, param_name, DeclaredParameter::new(value, None), true)?;
        }
        for (name, value) in &arguments {
            scope::define_argument(&mut self.registry, depth, name, value.clone())?;
        }

        self.call_stack.push_call(function, arguments);
        self.current_depth = depth;
        Ok(depth)
    }

    /// Pops the call frame and the scope it occupied, recording
    /// `return_value` on the popped frame and merging the scope's
    /// parse-tree execution annotation into its parent.
    pub fn exit_function_call(&mut self, return_value: Option<RuntimeValue>) -> Result<call_stack::CallFrame, ContextError> {
        let depth = self.current_depth;
        let parent_depth = self.registry.get_context_by_depth(depth).and_then(|s| s.parent_depth()).unwrap_or(0);

        let top = self.call_stack.pop_call()?;
        let mut frame = top;
        frame.return_value = return_value;

        self.registry.deregister_context(depth);
        self.current_depth = parent_depth;
        Ok(frame)
    }

    // ---- loop stack / loop-iteration scopes ----

    pub fn enter_loop_iteration(&mut self, source_label: Option<&str>, node: NodeId) -> Result<u32, ContextError> {
        let label = current_loop_label(source_label, self.current_depth);
        self.loop_stack.push_loop(label.clone(), node);
        let depth = self.registry.register_loop_iteration(self.current_depth, label)?;
        self.current_depth = depth;
        Ok(depth)
    }

    pub fn exit_loop_iteration(&mut self) -> Result<loop_stack::LoopFrame, ContextError> {
        let depth = self.current_depth;
        let parent_depth = self.registry.get_context_by_depth(depth).and_then(|s| s.parent_depth()).unwrap_or(0);

        let frame = self.loop_stack.pop_loop()?;
        self.registry.deregister_context(depth);
        self.current_depth = parent_depth;
        Ok(frame)
    }

    // ---- name resolution ----

    pub fn resolve_variable(&self, name: &str) -> Option<RuntimeValue> {
        scope::resolve_variable(&self.registry, self.current_depth, name)
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        scope::contains_variable(&self.registry, self.current_depth, name)
    }

    pub fn get_variable(&self, name: &str, safe: bool) -> Result<Option<(u32, DeclaredVariable)>, ContextError> {
        scope::get_variable(&self.registry, self.current_depth, name, safe)
    }

    pub fn define_variable(&mut self, name: &str, value: DeclaredVariable, lenient: bool) -> Result<(), ContextError> {
        scope::define_variable(&mut self.registry, self.current_depth, name, value, lenient)
    }

    pub fn set_variable(&mut self, name: &str, value: DeclaredVariable) {
        scope::set_variable(&mut self.registry, self.current_depth, name, value)
    }

    pub fn define_function(&mut self, function: DeclaredFunction, lenient: bool) -> Result<(), ContextError> {
        scope::define_function(&mut self.registry, self.current_depth, function, lenient)
    }

    pub fn contains_parameter(&self, name: &str) -> bool {
        scope::contains_parameter(&self.registry, self.current_depth, name)
    }

    pub fn get_parameter(&self, name: &str, safe: bool) -> Result<Option<(u32, DeclaredParameter)>, ContextError> {
        scope::get_parameter(&self.registry, self.current_depth, name, safe)
    }

    pub fn contains_argument(&self, name: &str) -> bool {
        scope::contains_argument(&self.registry, self.current_depth, name)
    }

    pub fn get_argument(&self, name: &str, safe: bool) -> Result<Option<(u32, RuntimeValue)>, ContextError> {
        scope::get_argument(&self.registry, self.current_depth, name, safe)
    }

    /// Defines an argument on the scope currently executing `function_call_id`
    /// (ordinarily the scope just entered by [`Self::enter_function_call`]).
    pub fn define_argument(&mut self, name: &str, value: RuntimeValue) -> Result<(), ContextError> {
        scope::define_argument(&mut self.registry, self.current_depth, name, value)
    }

    pub fn contains_loop_variable(&self, name: &str) -> bool {
        scope::contains_loop_variable(&self.registry, self.current_depth, name)
    }

    pub fn get_loop_variable(&self, name: &str, safe: bool) -> Result<Option<(u32, RuntimeValue)>, ContextError> {
        scope::get_loop_variable(&self.registry, self.current_depth, name, safe)
    }

    pub fn define_loop_variable(&mut self, name: &str, value: RuntimeValue) -> Result<(), ContextError> {
        scope::define_loop_variable(&mut self.registry, self.current_depth, name, value)
    }

    /// Remove if present; errors with `NameNotFound` only when absent and not
    /// `lenient` (§9 Open Question resolution; see DESIGN.md).
    pub fn remove_loop_variable(&mut self, name: &str, lenient: bool) -> Result<(), ContextError> {
        scope::remove_loop_variable(&mut self.registry, self.current_depth, name, lenient)
    }

    /// Nearest non-null `loopLabel` walking from the current scope upward.
    pub fn get_loop_label(&self) -> Option<String> {
        scope::get_loop_label(&self.registry, self.current_depth)
    }

    // ---- parse-tree execution annotation (current scope) ----

    pub fn mark_executed(&mut self, node: NodeId) {
        if let Some(scope) = self.registry.scope_at_mut(self.current_depth) {
            scope.parse_tree_execution_mut().mark_executed(node);
        }
    }

    pub fn is_executed(&self, node: NodeId) -> bool {
        self.registry.scope_at(self.current_depth).map(|s| s.parse_tree_execution().is_executed(node)).unwrap_or(false)
    }

    /// True if any scope at depth >= the current scope's depth has any
    /// descendant of `node` of `node_type` marked executed.
    pub fn has_any_executed_child_or_sub_child_of_type(&self, node: &dyn crate::interpreter::parse_node::ParseNode, node_type: crate::interpreter::parse_node::NodeType) -> bool {
        let maps = self.registry.execution_maps_from(self.current_depth);
        crate::interpreter::parse_tree::has_any_executed_child_or_sub_child_of_type(node, node_type, &maps)
    }

    // ---- transient per-scope flags (current scope) ----

    pub fn parsing_function_call_id(&self) -> bool {
        self.registry.scope_at(self.current_depth).map(|s| s.parsing_function_call_id()).unwrap_or(false)
    }

    pub fn set_parsing_function_call_id(&mut self, value: bool) {
        if let Some(scope) = self.registry.scope_at_mut(self.current_depth) {
            scope.set_parsing_function_call_id(value);
        }
    }

    pub fn parsing_assignment(&self) -> bool {
        self.registry.scope_at(self.current_depth).map(|s| s.parsing_assignment()).unwrap_or(false)
    }

    /// Clearing `parsing_assignment` also clears `declaration_of_assignment`.
    pub fn set_parsing_assignment(&mut self, value: bool) {
        if let Some(scope) = self.registry.scope_at_mut(self.current_depth) {
            scope.set_parsing_assignment(value);
        }
    }

    pub fn creating_object(&self) -> bool {
        self.registry.scope_at(self.current_depth).map(|s| s.creating_object()).unwrap_or(false)
    }

    pub fn set_creating_object(&mut self, value: bool) {
        if let Some(scope) = self.registry.scope_at_mut(self.current_depth) {
            scope.set_creating_object(value);
        }
    }

    pub fn declaration_of_assignment(&self) -> Option<(DeclaredVariable, bool)> {
        self.registry.scope_at(self.current_depth).and_then(|s| s.declaration_of_assignment().cloned())
    }

    pub fn set_declaration_of_assignment(&mut self, value: Option<(DeclaredVariable, bool)>) {
        if let Some(scope) = self.registry.scope_at_mut(self.current_depth) {
            scope.set_declaration_of_assignment(value);
        }
    }

    // ---- call stack / loop stack introspection ----

    /// Replaces the top call frame's fn/args, recording an in-flight return
    /// value without popping the frame (used when a `return` signal needs to
    /// be threaded through enclosing blocks before the call actually exits).
    pub fn update_call(&mut self, function: DeclaredFunction, arguments: HashMap<String, RuntimeValue>, return_value: RuntimeValue) -> Result<(), ContextError> {
        self.call_stack.update_call(function, arguments, return_value)
    }

    pub fn loop_contains_label(&self, label: &str) -> bool {
        self.loop_stack.loop_contains_label(label)
    }

    /// Loop labels currently on the stack, innermost (top) first.
    pub fn get_loop_labels(&self) -> Vec<String> {
        self.loop_stack.get_loop_labels()
    }

    /// Resolves a callable name: a user function defined in the current
    /// scope chain takes precedence; a qualified `Receiver.method` call is
    /// looked up in the host tables once bootstrap has completed; otherwise
    /// the built-in function table is consulted.
    pub async fn resolve_function(&self, name: &str) -> Option<FunctionLookup> {
        if let Some((_, func)) = scope::get_user_function(&self.registry, self.current_depth, name) {
            return Some(FunctionLookup::User(func));
        }

        if name.contains('.') {
            let reflective = self.bootstrap.lookup_jvm_function(name).await;
            if !reflective.is_empty() {
                let descriptors = reflective
                    .into_iter()
                    .map(|d| HostMethodDescriptor {
                        qualified_call: d.qualified_call,
                        declaring_class: d.declaring_class,
                        method_name: d.method_name,
                        is_static: d.is_static,
                    })
                    .collect();
                return Some(FunctionLookup::Host(descriptors));
            }
            let builtin = self.bootstrap.lookup_host_builtin_function(name).await;
            if !builtin.is_empty() {
                let descriptors = builtin.into_iter().map(|d| BuiltinFunctionDescriptor { name: d.name, arity: None }).collect();
                return Some(FunctionLookup::Builtin(descriptors));
            }
            return None;
        }

        self.builtins.get(name).cloned().map(FunctionLookup::Builtin)
    }

    pub async fn bootstrap(
        &self,
        async_mode: bool,
        source: std::sync::Arc<dyn ClassSource>,
        classpath: &str,
        working_dir: &std::path::Path,
    ) -> Result<(), ContextError> {
        self.bootstrap.bootstrap(&self.config, async_mode, source, classpath, working_dir).await
    }

    pub async fn get_java_type(&self, qualified_name: &str) -> String {
        self.bootstrap.get_java_type(qualified_name).await
    }

    pub async fn get_completions(&self) -> Vec<String> {
        let builtin_names: Vec<String> = self.builtins.keys().cloned().collect();
        self.bootstrap.get_completions(&builtin_names).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(BootstrapConfig::default()).unwrap()
    }

    #[test]
    fn root_scope_exists_after_construction() {
        let interp = interpreter();
        assert_eq!(interp.current_depth(), 0);
    }

    #[test]
    fn define_and_resolve_root_variable() {
        let mut interp = interpreter();
        interp.define_variable("x", DeclaredVariable::new(Some(RuntimeValue::new("1", None)), None), false).unwrap();
        assert_eq!(interp.resolve_variable("x").unwrap().raw, "1");
    }

    #[test]
    fn function_call_scope_resolves_parameters_and_arguments_then_unwinds() {
        let mut interp = interpreter();
        interp.define_variable("n", DeclaredVariable::new(Some(RuntimeValue::new("outer", None)), None), false).unwrap();

        let func = DeclaredFunction::new("f", vec!["n".to_string()], NodeId(1));
        let mut arguments = HashMap::new();
        arguments.insert("n".to_string(), RuntimeValue::new("inner", None));

        interp.enter_function_call(func, arguments).unwrap();
        assert_eq!(interp.resolve_variable("n").unwrap().raw, "inner");

        let frame = interp.exit_function_call(Some(RuntimeValue::new("result", None))).unwrap();
        assert_eq!(frame.return_value.unwrap().raw, "result");
        assert_eq!(interp.current_depth(), 0);
        assert_eq!(interp.resolve_variable("n").unwrap().raw, "outer");
    }

    #[test]
    fn loop_iteration_scope_unwinds_to_parent_depth() {
        let mut interp = interpreter();
        interp.enter_loop_iteration(Some("outer"), NodeId(2)).unwrap();
        assert_eq!(interp.current_depth(), 1);

        let frame = interp.exit_loop_iteration().unwrap();
        assert_eq!(frame.label, "outer");
        assert_eq!(interp.current_depth(), 0);
    }

    #[test]
    fn labelled_nested_loops_report_labels_innermost_first() {
        let mut interp = interpreter();
        interp.enter_loop_iteration(Some("outer"), NodeId(1)).unwrap();
        interp.enter_loop_iteration(Some("inner"), NodeId(2)).unwrap();

        assert_eq!(interp.get_loop_labels(), vec!["inner".to_string(), "outer".to_string()]);
        assert!(interp.loop_contains_label("outer"));
        assert_eq!(interp.get_loop_label().as_deref(), Some("inner"));

        interp.exit_loop_iteration().unwrap();
        interp.exit_loop_iteration().unwrap();
        assert!(interp.get_loop_labels().is_empty());
    }

    #[test]
    fn loop_variable_defined_in_iteration_is_visible_then_removable() {
        let mut interp = interpreter();
        interp.enter_loop_iteration(Some("outer"), NodeId(1)).unwrap();
        interp.define_loop_variable("i", RuntimeValue::new("0", None)).unwrap();

        assert!(interp.contains_loop_variable("i"));
        assert_eq!(interp.resolve_variable("i").unwrap().raw, "0");

        interp.remove_loop_variable("i", false).unwrap();
        assert!(!interp.contains_loop_variable("i"));
    }

    #[test]
    fn remove_loop_variable_absent_and_not_lenient_errors() {
        let mut interp = interpreter();
        interp.enter_loop_iteration(Some("outer"), NodeId(1)).unwrap();
        let err = interp.remove_loop_variable("missing", false).unwrap_err();
        assert!(matches!(err, ContextError::NameNotFound { kind: crate::interpreter::errors::NameKind::LoopVariable, .. }));
    }

    #[test]
    fn parse_tree_execution_merges_into_parent_on_function_exit() {
        let mut interp = interpreter();
        let func = DeclaredFunction::new("f", vec![], NodeId(1));
        interp.enter_function_call(func, HashMap::new()).unwrap();
        interp.mark_executed(NodeId(42));
        assert!(interp.is_executed(NodeId(42)));

        interp.exit_function_call(None).unwrap();
        assert!(interp.is_executed(NodeId(42)));
    }

    #[test]
    fn clearing_parsing_assignment_clears_declaration_through_interpreter() {
        let mut interp = interpreter();
        interp.set_parsing_assignment(true);
        interp.set_declaration_of_assignment(Some((DeclaredVariable::default(), true)));
        assert!(interp.declaration_of_assignment().is_some());

        interp.set_parsing_assignment(false);
        assert!(interp.declaration_of_assignment().is_none());
    }

    #[test]
    fn update_call_on_empty_stack_is_empty_stack_pop() {
        let mut interp = interpreter();
        let func = DeclaredFunction::new("f", vec![], NodeId(1));
        let err = interp.update_call(func, HashMap::new(), RuntimeValue::new("9", None)).unwrap_err();
        assert!(matches!(err, ContextError::EmptyStackPop));
    }

    #[test]
    fn update_call_on_active_call_succeeds() {
        let mut interp = interpreter();
        let func = DeclaredFunction::new("f", vec![], NodeId(1));
        interp.enter_function_call(func.clone(), HashMap::new()).unwrap();
        interp.update_call(func, HashMap::new(), RuntimeValue::new("9", None)).unwrap();
        let frame = interp.exit_function_call(Some(RuntimeValue::new("9", None))).unwrap();
        assert_eq!(frame.return_value.unwrap().raw, "9");
    }

    #[tokio::test]
    async fn resolve_function_finds_builtin_by_plain_name() {
        let interp = interpreter();
        let lookup = interp.resolve_function("print").await.unwrap();
        assert!(matches!(lookup, FunctionLookup::Builtin(_)));
    }

    #[tokio::test]
    async fn resolve_function_prefers_user_function_over_builtin() {
        let mut interp = interpreter();
        interp.define_function(DeclaredFunction::new("print", vec![], NodeId(3)), false).unwrap();
        let lookup = interp.resolve_function("print").await.unwrap();
        assert!(matches!(lookup, FunctionLookup::User(_)));
    }

    #[tokio::test]
    async fn resolve_function_with_unknown_qualified_call_is_none() {
        let interp = interpreter();
        interp.bootstrap.default_bootstrap(&BootstrapConfig::default()).await;
        assert!(interp.resolve_function("pkg.Unknown.method").await.is_none());
    }

    #[tokio::test]
    async fn get_java_type_falls_back_before_bootstrap_when_default_bootstrapped() {
        let interp = interpreter();
        interp.bootstrap.default_bootstrap(&BootstrapConfig::default()).await;
        assert_eq!(interp.get_java_type("pkg.Foo").await, "java.lang.Object");
    }
}
