//! Passive records for declared names.
//!
//! These are value objects: the scope node owns the tables that map names to
//! them, but the records themselves carry no behavior.

/// A runtime value held by a variable or parameter. Left abstract (a string
/// form plus an optional type tag) since the concrete value representation
/// belongs to the evaluator, which is out of scope here.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeValue {
    pub raw: String,
    pub type_name: Option<String>,
}

impl RuntimeValue {
    pub fn new(raw: impl Into<String>, type_name: Option<String>) -> Self {
        Self { raw: raw.into(), type_name }
    }
}

/// A declared ordinary variable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclaredVariable {
    pub value: Option<RuntimeValue>,
    pub type_name: Option<String>,
}

impl DeclaredVariable {
    pub fn new(value: Option<RuntimeValue>, type_name: Option<String>) -> Self {
        Self { value, type_name }
    }
}

/// A declared function parameter (the formal, not the call-site argument).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclaredParameter {
    pub value: Option<RuntimeValue>,
    pub type_name: Option<String>,
}

impl DeclaredParameter {
    pub fn new(value: Option<RuntimeValue>, type_name: Option<String>) -> Self {
        Self { value, type_name }
    }
}

/// A user-defined function: its formal parameters and a reference to its
/// body in the parse tree (represented here by an opaque node id, since the
/// parse tree itself is external).
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: crate::interpreter::parse_node::NodeId,
}

impl DeclaredFunction {
    pub fn new(name: impl Into<String>, parameters: Vec<String>, body: crate::interpreter::parse_node::NodeId) -> Self {
        Self { name: name.into(), parameters, body }
    }
}

/// A built-in function implemented by the host runtime (not user-defined,
/// not reflective). Occupies the same lookup name-space as user functions.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinFunctionDescriptor {
    pub name: String,
    pub arity: Option<usize>,
}

/// A reflective method discovered on a host (JVM-equivalent) class during
/// classpath scanning, addressed by a qualified `Receiver.method` call.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMethodDescriptor {
    pub qualified_call: String,
    pub declaring_class: String,
    pub method_name: String,
    pub is_static: bool,
}

/// The result of resolving a callable name: either exactly one match, or the
/// full overload list for the evaluator to disambiguate. The "unwrap
/// singleton list" special case from the source is intentionally *not*
/// modeled: callers always get a list (see REDESIGN FLAGS in SPEC_FULL.md).
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionLookup {
    User(DeclaredFunction),
    Builtin(Vec<BuiltinFunctionDescriptor>),
    Host(Vec<HostMethodDescriptor>),
}
