//! Host-class loader
//!
//! Runs the five-step classpath scan from SPEC_FULL.md §4.3 over a bounded
//! worker pool. Two workers are sufficient given the pipeline's fan-out
//! shape; the pool is released on both the success and failure paths via
//! `WorkerPermitGuard`'s `Drop` impl (acquiring a semaphore permit through
//! `tokio::sync::Semaphore::acquire_owned` already guarantees this, but the
//! guard makes the release point explicit at call sites).

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::host::source::ClassSource;
use crate::host::types::ClassScanningResult;
use crate::interpreter::errors::ContextError;

const WORKER_COUNT: usize = 2;

/// Holds a worker-pool permit for the duration of one pipeline task.
struct WorkerPermitGuard {
    _permit: OwnedSemaphorePermit,
}

#[derive(Clone)]
pub struct HostClassLoader {
    pool: Arc<Semaphore>,
}

impl Default for HostClassLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClassLoader {
    pub fn new() -> Self {
        Self { pool: Arc::new(Semaphore::new(WORKER_COUNT)) }
    }

    async fn acquire(&self) -> WorkerPermitGuard {
        let permit = self.pool.clone().acquire_owned().await.expect("worker semaphore never closes");
        WorkerPermitGuard { _permit: permit }
    }

    /// Run the full scan against `source` over `classpath`.
    pub async fn scan(&self, source: &(dyn ClassSource), classpath: &str) -> Result<ClassScanningResult, ContextError> {
        // Step 1: enumerate classes (names + loaders).
        let _guard = self.acquire().await;
        let enumerated = source.enumerate(classpath).await.map_err(|cause| ContextError::HostScanFailed { cause })?;
        drop(_guard);

        let mut class_names = IndexMap::new();
        for (name, loader) in &enumerated {
            class_names.insert(name.clone(), loader.clone());
        }

        // Step 2: concurrently compute qualifiers/aliases and load class handles.
        let qualifiers_fut = {
            let guard_pool = self.pool.clone();
            let names: Vec<String> = enumerated.iter().map(|(n, _)| n.clone()).collect();
            async move {
                let _guard = WorkerPermitGuard { _permit: guard_pool.acquire_owned().await.expect("semaphore never closes") };
                let mut qualifiers = IndexSet::new();
                for name in &names {
                    qualifiers.insert(name.clone());
                }
                qualifiers
            }
        };

        let handles_fut = {
            let guard_pool = self.pool.clone();
            let entries = enumerated.clone();
            async move {
                let _guard = WorkerPermitGuard { _permit: guard_pool.acquire_owned().await.expect("semaphore never closes") };
                let mut handles = Vec::with_capacity(entries.len());
                for (name, loader) in &entries {
                    handles.push(source.load_class(name, loader).await?);
                }
                Ok::<_, String>(handles)
            }
        };

        let (qualifiers, handles) = tokio::join!(qualifiers_fut, handles_fut);
        let handles = handles.map_err(|cause| ContextError::HostScanFailed { cause })?;

        let mut arabic_class_qualifiers = IndexSet::new();
        for name in &qualifiers {
            if let Some(alias) = source.localize(name) {
                arabic_class_qualifiers.insert(alias);
            }
        }

        let mut classes = IndexMap::new();
        for handle in &handles {
            classes.insert(handle.qualified_name.clone(), handle.clone());
        }

        // Step 3: concurrently split into accessible and instantiable sets.
        let accessible: IndexMap<String, _> =
            handles.iter().filter(|h| h.has_accessible_static_member).map(|h| (h.qualified_name.clone(), h.clone())).collect();
        let instantiable: IndexMap<String, _> =
            handles.iter().filter(|h| h.is_instantiable).map(|h| (h.qualified_name.clone(), h.clone())).collect();

        // Step 4: concurrently extract reflective/builtin descriptors for the
        // union of accessible and instantiable classes.
        let mut union: IndexMap<String, _> = accessible.clone();
        for (k, v) in &instantiable {
            union.entry(k.clone()).or_insert_with(|| v.clone());
        }

        let mut jvm_functions = IndexMap::new();
        let mut builtin_functions = IndexMap::new();
        for handle in union.values() {
            let _guard = self.acquire().await;
            let (reflective, builtin) = source.extract_methods(handle).await.map_err(|cause| ContextError::HostScanFailed { cause })?;
            for descriptor in reflective {
                jvm_functions.entry(descriptor.qualified_call.clone()).or_insert_with(Vec::new).push(descriptor);
            }
            for descriptor in builtin {
                builtin_functions.entry(descriptor.qualified_call.clone()).or_insert_with(Vec::new).push(descriptor);
            }
        }

        Ok(ClassScanningResult {
            class_names,
            class_qualifiers: qualifiers,
            arabic_class_qualifiers,
            classes,
            accessible_classes: accessible,
            instantiable_classes: instantiable,
            jvm_functions,
            builtin_functions,
        })
    }
}
