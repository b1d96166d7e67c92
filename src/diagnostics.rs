//! Verbose tracing
//!
//! A thin stand-in for the source's xtrace-style debug output: when `DEBUG`
//! or `INSIDE_INIT` is set, write a line-oriented message to stderr. No
//! external logging framework, matching the teacher crate's own choice not
//! to pull one in for this kind of internal tracing.

use crate::config::BootstrapConfig;

pub fn trace(config: &BootstrapConfig, message: impl AsRef<str>) {
    if config.debug || config.inside_init {
        eprintln!("[naftah-context] {}", message.as_ref());
    }
}
