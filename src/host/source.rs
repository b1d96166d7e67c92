//! Classpath source boundary
//!
//! Host-class reflection is an external collaborator (SPEC_FULL.md §1): this
//! crate never inspects a real JVM classpath itself. `ClassSource` is the
//! trait a host runtime implements to supply that data; `FilesystemClassSource`
//! is a test/demo implementation that scans a directory of small JSON
//! class-descriptor stub files, the same way `just-bash`'s `FileSystem` trait
//! decouples the interpreter from a real OS filesystem.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::host::types::{BuiltinMethodDescriptor, ClassHandle, ReflectiveMethodDescriptor};

#[async_trait]
pub trait ClassSource: Send + Sync + 'static {
    /// Enumerate classes on the given search path: (qualified name, loader).
    async fn enumerate(&self, classpath: &str) -> Result<Vec<(String, String)>, String>;

    /// Load the full handle (accessibility/instantiability) for one class.
    async fn load_class(&self, qualified_name: &str, loader: &str) -> Result<ClassHandle, String>;

    /// A localized (Arabic) alias for the class's qualified name, if one
    /// exists. Pure and synchronous: this is metadata lookup, not I/O.
    fn localize(&self, qualified_name: &str) -> Option<String>;

    /// Reflective and built-in method descriptors exposed by the class.
    async fn extract_methods(&self, class: &ClassHandle) -> Result<(Vec<ReflectiveMethodDescriptor>, Vec<BuiltinMethodDescriptor>), String>;
}

/// On-disk stub used by `FilesystemClassSource`: one JSON file per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDescriptorStub {
    pub qualified_name: String,
    pub loader: String,
    pub accessible: bool,
    pub instantiable: bool,
    pub arabic_alias: Option<String>,
    pub methods: Vec<String>,
    pub builtin_methods: Vec<String>,
}

/// Scans a directory tree of `*.classdescriptor` JSON stub files.
/// Exists so the loader's pipeline can be exercised end to end in tests and
/// the demo binary without a real host runtime.
pub struct FilesystemClassSource {
    pub root: std::path::PathBuf,
}

impl FilesystemClassSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_stub(path: &std::path::Path) -> Result<ClassDescriptorStub, String> {
        let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ClassSource for FilesystemClassSource {
    async fn enumerate(&self, classpath: &str) -> Result<Vec<(String, String)>, String> {
        let pattern = format!("{}/**/*.classdescriptor", classpath);
        let mut out = Vec::new();
        for entry in glob::glob(&pattern).map_err(|e| e.to_string())? {
            let path = entry.map_err(|e| e.to_string())?;
            let stub = Self::read_stub(&path)?;
            out.push((stub.qualified_name, stub.loader));
        }
        Ok(out)
    }

    async fn load_class(&self, qualified_name: &str, loader: &str) -> Result<ClassHandle, String> {
        let pattern = format!("{}/**/*.classdescriptor", self.root.display());
        for entry in glob::glob(&pattern).map_err(|e| e.to_string())? {
            let path = entry.map_err(|e| e.to_string())?;
            let stub = Self::read_stub(&path)?;
            if stub.qualified_name == qualified_name && stub.loader == loader {
                return Ok(ClassHandle {
                    qualified_name: stub.qualified_name,
                    loader: stub.loader,
                    has_accessible_static_member: stub.accessible,
                    is_instantiable: stub.instantiable,
                });
            }
        }
        Err(format!("class not found: {qualified_name}"))
    }

    fn localize(&self, qualified_name: &str) -> Option<String> {
        let pattern = format!("{}/**/*.classdescriptor", self.root.display());
        for entry in glob::glob(&pattern).ok()? {
            let path = entry.ok()?;
            let stub = Self::read_stub(&path).ok()?;
            if stub.qualified_name == qualified_name {
                if let Some(alias) = stub.arabic_alias {
                    return Some(alias);
                }
            }
        }
        None
    }

    async fn extract_methods(&self, class: &ClassHandle) -> Result<(Vec<ReflectiveMethodDescriptor>, Vec<BuiltinMethodDescriptor>), String> {
        let pattern = format!("{}/**/*.classdescriptor", self.root.display());
        for entry in glob::glob(&pattern).map_err(|e| e.to_string())? {
            let path = entry.map_err(|e| e.to_string())?;
            let stub = Self::read_stub(&path)?;
            if stub.qualified_name == class.qualified_name && stub.loader == class.loader {
                let reflective = stub
                    .methods
                    .into_iter()
                    .map(|m| ReflectiveMethodDescriptor {
                        qualified_call: format!("{}.{}", class.qualified_name, m),
                        declaring_class: class.qualified_name.clone(),
                        method_name: m,
                        is_static: true,
                    })
                    .collect();
                let builtin = stub
                    .builtin_methods
                    .into_iter()
                    .map(|m| BuiltinMethodDescriptor { qualified_call: format!("{}.{}", class.qualified_name, m), name: m })
                    .collect();
                return Ok((reflective, builtin));
            }
        }
        Ok((Vec::new(), Vec::new()))
    }
}

/// A source with no classes, for callers that bootstrap without classpath
/// discovery (`SCAN_CLASSPATH`/`FORCE_CLASSPATH` both unset). Never touched
/// by [`crate::host::bootstrap::BootstrapCoordinator::bootstrap`] in that
/// case, but a concrete value is still needed to satisfy the trait object
/// parameter.
pub struct NullClassSource;

#[async_trait]
impl ClassSource for NullClassSource {
    async fn enumerate(&self, _classpath: &str) -> Result<Vec<(String, String)>, String> {
        Ok(Vec::new())
    }

    async fn load_class(&self, qualified_name: &str, _loader: &str) -> Result<ClassHandle, String> {
        Err(format!("class not found: {qualified_name}"))
    }

    fn localize(&self, _qualified_name: &str) -> Option<String> {
        None
    }

    async fn extract_methods(&self, _class: &ClassHandle) -> Result<(Vec<ReflectiveMethodDescriptor>, Vec<BuiltinMethodDescriptor>), String> {
        Ok((Vec::new(), Vec::new()))
    }
}
