//! Host-platform class discovery
//!
//! Everything needed to lazily discover, scan, and cache host (JVM-like)
//! classes and methods, behind the [`source::ClassSource`] trait boundary
//! that keeps this crate free of any real reflection dependency.

pub mod bootstrap;
pub mod cache;
pub mod loader;
pub mod source;
pub mod types;
