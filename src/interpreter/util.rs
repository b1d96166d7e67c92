//! Small ID-generation helpers shared by call and loop scope setup.
//!
//! The source language mints opaque uuids for function-call ids and
//! synthesized loop labels; this crate has no `uuid` dependency in its
//! corpus, so it generates an equivalently unique, non-reversible suffix
//! from `rand` (already a dependency, used by the teacher crate for
//! `$RANDOM`).

use rand::Rng;

/// A short random hex suffix, unique enough for a single process's lifetime
/// (128 bits of entropy) to stand in for a uuid.
pub fn new_unique_suffix() -> String {
    let mut rng = rand::thread_rng();
    let hi: u64 = rng.gen();
    let lo: u64 = rng.gen();
    format!("{hi:016x}{lo:016x}")
}

/// `<depth>-<functionName>-<uuid>`.
pub fn new_function_call_id(depth: u32, function_name: &str) -> String {
    format!("{depth}-{function_name}-{}", new_unique_suffix())
}
