//! Scope registry
//!
//! The process-wide index of scope nodes keyed by depth. Per SPEC_FULL.md
//! §3 (REDESIGN FLAGS), this is an arena owned by a single [`Interpreter`]
//! value rather than free-standing nodes behind global statics: at most one
//! scope exists at any given depth, exactly as the source's invariant
//! requires, but enforced by an owned `HashMap<u32, Scope>` instead of a
//! process-global table.

use std::collections::HashMap;

use crate::interpreter::errors::ContextError;
use crate::interpreter::parse_tree::ParseTreeExecutionMap;
use crate::interpreter::scope::{Scope, ScopeChain};

#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: HashMap<u32, Scope>,
}

impl ScopeChain for ScopeRegistry {
    fn scope_at(&self, depth: u32) -> Option<&Scope> {
        self.scopes.get(&depth)
    }

    fn scope_at_mut(&mut self, depth: u32) -> Option<&mut Scope> {
        self.scopes.get_mut(&depth)
    }
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get_context_by_depth(&self, depth: u32) -> Option<&Scope> {
        self.scopes.get(&depth)
    }

    /// Register a root scope. Outside REPL mode this is only legal when the
    /// registry is empty; in REPL mode a fresh root may be created any time
    /// (relaxing the invariant, per §3/§6).
    pub fn register_root(&mut self, inside_repl: bool) -> Result<u32, ContextError> {
        if !self.scopes.is_empty() && !inside_repl {
            return Err(ContextError::IllegalScopeCreation);
        }
        let depth = 0;
        self.scopes.insert(depth, Scope::new_root(depth));
        Ok(depth)
    }

    pub fn register_function_call(&mut self, parent_depth: u32, function_call_id: String, function_name: String) -> Result<u32, ContextError> {
        if self.scopes.is_empty() {
            return Err(ContextError::IllegalScopeCreation);
        }
        let depth = parent_depth + 1;
        self.scopes.insert(depth, Scope::new_function_call(depth, parent_depth, function_call_id, function_name));
        Ok(depth)
    }

    pub fn register_loop_iteration(&mut self, parent_depth: u32, loop_label: String) -> Result<u32, ContextError> {
        if self.scopes.is_empty() {
            return Err(ContextError::IllegalScopeCreation);
        }
        let depth = parent_depth + 1;
        self.scopes.insert(depth, Scope::new_loop_iteration(depth, parent_depth, loop_label));
        Ok(depth)
    }

    /// Remove and return the scope at `depth`, merging its parse-tree
    /// execution map into its parent's (if both have one).
    pub fn deregister_context(&mut self, depth: u32) -> Option<Scope> {
        let removed = self.scopes.remove(&depth)?;
        if let Some(parent_depth) = removed.parent_depth() {
            if let Some(parent) = self.scopes.get_mut(&parent_depth) {
                let child_map: ParseTreeExecutionMap = removed.parse_tree_execution().clone();
                parent.parse_tree_execution_mut().merge_from(&child_map);
            }
        }
        Some(removed)
    }

    /// All scopes at depth >= `from_depth`'s execution maps, nearest-first,
    /// for `has_any_executed_child_or_sub_child_of_type`.
    pub fn execution_maps_from(&self, from_depth: u32) -> Vec<&ParseTreeExecutionMap> {
        let mut depths: Vec<u32> = self.scopes.keys().copied().filter(|d| *d >= from_depth).collect();
        depths.sort_unstable();
        depths.iter().map(|d| self.scopes[d].parse_tree_execution()).collect()
    }
}
