//! Host-class scanning data model
//!
//! `ClassScanningResult` is the assembled output of a classpath scan: the
//! eight fields the algorithm in SPEC_FULL.md §4.3 produces, serializable so
//! it can round-trip through the cache file.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A class as discovered on the classpath: its qualified name and which
/// class loader (represented here by a plain string identifier, since the
/// concrete loader mechanism belongs to the host runtime) provided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHandle {
    pub qualified_name: String,
    pub loader: String,
    pub has_accessible_static_member: bool,
    pub is_instantiable: bool,
}

/// A reflective (host-side) method descriptor, addressed by a qualified
/// `Receiver.method` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectiveMethodDescriptor {
    pub qualified_call: String,
    pub declaring_class: String,
    pub method_name: String,
    pub is_static: bool,
}

/// A built-in method descriptor surfaced alongside reflective ones under the
/// same qualified-call name-space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinMethodDescriptor {
    pub qualified_call: String,
    pub name: String,
}

/// The consolidated output of a full classpath scan (§4.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassScanningResult {
    pub class_names: IndexMap<String, String>,
    pub class_qualifiers: IndexSet<String>,
    pub arabic_class_qualifiers: IndexSet<String>,
    pub classes: IndexMap<String, ClassHandle>,
    pub accessible_classes: IndexMap<String, ClassHandle>,
    pub instantiable_classes: IndexMap<String, ClassHandle>,
    pub jvm_functions: IndexMap<String, Vec<ReflectiveMethodDescriptor>>,
    pub builtin_functions: IndexMap<String, Vec<BuiltinMethodDescriptor>>,
}
