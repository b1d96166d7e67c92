//! Bootstrap coordinator
//!
//! Drives the one-time (or REPL-repeatable) discovery of host-platform
//! classes, caches the result, and exposes the completion signal that
//! `get_java_type`/`get_completions` wait on. Replaces the source's
//! busy-spin with a `tokio::sync::Notify` guarding two `AtomicBool` flags,
//! per SPEC_FULL.md §4.4/§5.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Notify, RwLock};

use crate::config::BootstrapConfig;
use crate::diagnostics::trace;
use crate::host::cache;
use crate::host::loader::HostClassLoader;
use crate::host::source::ClassSource;
use crate::host::types::{BuiltinMethodDescriptor, ClassScanningResult, ReflectiveMethodDescriptor};
use crate::interpreter::errors::ContextError;

#[derive(Default)]
struct BootstrapState {
    bootstrapped: AtomicBool,
    failed: AtomicBool,
    async_bootstrap: AtomicBool,
    notify: Notify,
}

impl BootstrapState {
    fn is_done(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst) || self.failed.load(Ordering::SeqCst)
    }

    fn mark(&self, bootstrapped: bool) {
        if bootstrapped {
            self.bootstrapped.store(true, Ordering::SeqCst);
        } else {
            self.failed.store(true, Ordering::SeqCst);
        }
        self.notify.notify_waiters();
    }

    /// Block until either flag is set. Re-checks after registering interest
    /// to close the classic notify-before-wait race.
    async fn wait_until_done(&self) {
        loop {
            if self.is_done() {
                return;
            }
            let notified = self.notify.notified();
            if self.is_done() {
                return;
            }
            notified.await;
        }
    }
}

/// Owns the host-class scan result and the flags describing whether a scan
/// has completed. One instance lives on the `Interpreter`.
pub struct BootstrapCoordinator {
    state: Arc<BootstrapState>,
    result: Arc<RwLock<Option<ClassScanningResult>>>,
    loader: HostClassLoader,
}

impl Default for BootstrapCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapCoordinator {
    pub fn new() -> Self {
        Self { state: Arc::new(BootstrapState::default()), result: Arc::new(RwLock::new(None)), loader: HostClassLoader::new() }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.state.bootstrapped.load(Ordering::SeqCst)
    }

    pub fn has_failed(&self) -> bool {
        self.state.failed.load(Ordering::SeqCst)
    }

    /// Whether the in-flight (or most recent) bootstrap was requested as
    /// asynchronous (`ASYNC_BOOT_STRAP`, §4.4 step 1).
    pub fn is_async_bootstrap(&self) -> bool {
        self.state.async_bootstrap.load(Ordering::SeqCst)
    }

    /// Installs only the built-in function table; skips classpath discovery
    /// entirely. Used when neither `SCAN_CLASSPATH` nor `FORCE_CLASSPATH` is
    /// set.
    pub async fn default_bootstrap(&self, config: &BootstrapConfig) {
        trace(config, "bootstrap: classpath scan disabled, installing built-ins only");
        *self.result.write().await = Some(ClassScanningResult::default());
        self.state.mark(true);
    }

    /// Runs the full bootstrap: consult the cache unless `FORCE_CLASSPATH` is
    /// set, otherwise scan via `source` and persist the result.
    ///
    /// `async_mode` mirrors the source's `bootstrap(async)` parameter (§4.4):
    /// when `true` and a scan is actually required (no usable cache), the
    /// scan is spawned on a background `tokio` task and this call returns
    /// immediately, leaving `BOOT_STRAPPED`/`BOOT_STRAP_FAILED` false until
    /// the task finishes; `get_java_type`/qualified-call function resolution
    /// block on that completion per §5. When `false`, the scan runs inline
    /// and has completed by the time this call returns.
    pub async fn bootstrap(
        &self,
        config: &BootstrapConfig,
        async_mode: bool,
        source: Arc<dyn ClassSource>,
        classpath: &str,
        working_dir: &Path,
    ) -> Result<(), ContextError> {
        self.state.async_bootstrap.store(async_mode, Ordering::SeqCst);

        if !config.scan_classpath && !config.force_classpath {
            self.default_bootstrap(config).await;
            return Ok(());
        }

        let cached = if config.force_classpath { None } else { cache::read(working_dir)? };

        if let Some(result) = cached {
            trace(config, "bootstrap: using cached classpath scan");
            *self.result.write().await = Some(result);
            self.state.mark(true);
            return Ok(());
        }

        if async_mode {
            trace(config, "bootstrap: scanning classpath asynchronously");
            let loader = self.loader.clone();
            let state = self.state.clone();
            let result_slot = self.result.clone();
            let classpath = classpath.to_string();
            let working_dir = working_dir.to_path_buf();
            let config = *config;
            tokio::spawn(async move {
                match loader.scan(source.as_ref(), &classpath).await {
                    Ok(scanned) => {
                        if let Err(err) = cache::write(&working_dir, &scanned) {
                            trace(&config, &format!("bootstrap: cache persist failed: {err}"));
                        }
                        *result_slot.write().await = Some(scanned);
                        state.mark(true);
                    }
                    Err(_) => {
                        state.mark(false);
                    }
                }
            });
            return Ok(());
        }

        trace(config, "bootstrap: scanning classpath");
        match self.loader.scan(source.as_ref(), classpath).await {
            Ok(result) => {
                cache::write(working_dir, &result)?;
                *self.result.write().await = Some(result);
                self.state.mark(true);
                Ok(())
            }
            Err(err) => {
                self.state.mark(false);
                Err(err)
            }
        }
    }

    /// Waits for bootstrap completion, then looks up a qualified class name.
    /// Falls back to a generic top-type name when the class is unknown or
    /// bootstrap failed, mirroring "blocks until either flag is set, then
    /// returns" from the source.
    pub async fn get_java_type(&self, qualified_name: &str) -> String {
        self.state.wait_until_done().await;
        let guard = self.result.read().await;
        let found = guard.as_ref().and_then(|r| {
            r.instantiable_classes
                .get(qualified_name)
                .or_else(|| r.accessible_classes.get(qualified_name))
                .or_else(|| r.classes.get(qualified_name))
        });
        match found {
            Some(handle) => handle.qualified_name.clone(),
            None => "java.lang.Object".to_string(),
        }
    }

    /// Reflective method descriptors registered under `qualified_call`
    /// (e.g. `"pkg.Foo.bar"`). Blocks until bootstrap completes (§5: readers
    /// must wait in function resolution for qualified-call names, exactly as
    /// `get_java_type` does), then empty if the call is unknown.
    pub async fn lookup_jvm_function(&self, qualified_call: &str) -> Vec<ReflectiveMethodDescriptor> {
        self.state.wait_until_done().await;
        let guard = self.result.read().await;
        guard.as_ref().and_then(|r| r.jvm_functions.get(qualified_call)).cloned().unwrap_or_default()
    }

    /// Host-exposed builtin method descriptors registered under
    /// `qualified_call`. Blocks until bootstrap completes, same as
    /// [`Self::lookup_jvm_function`].
    pub async fn lookup_host_builtin_function(&self, qualified_call: &str) -> Vec<BuiltinMethodDescriptor> {
        self.state.wait_until_done().await;
        let guard = self.result.read().await;
        guard.as_ref().and_then(|r| r.builtin_functions.get(qualified_call)).cloned().unwrap_or_default()
    }

    /// Known names for interactive completion: the interpreter's built-in
    /// function names (always present) plus, once a classpath scan has
    /// completed, host-reflected/builtin qualified calls and instantiable
    /// class names (§4.4: "any still-null tables are skipped").
    pub async fn get_completions(&self, builtin_function_names: &[String]) -> Vec<String> {
        let mut names: Vec<String> = builtin_function_names.to_vec();
        if self.is_bootstrapped() {
            let guard = self.result.read().await;
            if let Some(result) = guard.as_ref() {
                names.extend(result.instantiable_classes.keys().cloned());
                names.extend(result.jvm_functions.keys().cloned());
                names.extend(result.builtin_functions.keys().cloned());
            }
        }
        names.sort();
        names.dedup();
        names
    }
}

pub fn default_cache_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
