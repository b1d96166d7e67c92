//! Parse-tree execution annotation
//!
//! A per-scope map from parse-tree node identity to "already executed",
//! lazily allocated, that merges into the parent scope's map on
//! deregistration (child entries overwrite parent entries).

use std::collections::HashMap;

use crate::interpreter::parse_node::{NodeId, NodeType, ParseNode};

#[derive(Debug, Clone, Default)]
pub struct ParseTreeExecutionMap {
    executed: Option<HashMap<NodeId, bool>>,
}

impl ParseTreeExecutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_executed(&mut self, node: NodeId) {
        self.executed.get_or_insert_with(HashMap::new).insert(node, true);
    }

    pub fn is_executed(&self, node: NodeId) -> bool {
        self.executed.as_ref().and_then(|m| m.get(&node)).copied().unwrap_or(false)
    }

    /// Merge `other`'s entries into `self`, with `other`'s entries winning on
    /// conflict (used when deregistering a child scope into its parent).
    pub fn merge_from(&mut self, other: &ParseTreeExecutionMap) {
        if let Some(other_map) = &other.executed {
            let mine = self.executed.get_or_insert_with(HashMap::new);
            for (node, flag) in other_map {
                mine.insert(*node, *flag);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.executed.as_ref().map(|m| m.is_empty()).unwrap_or(true)
    }
}

/// `has_any_executed_child_or_sub_child_of_type`: true if any scope at depth
/// `>= from_depth` has any descendant of `node` of `node_type` marked
/// executed. `maps` is the ordered (by depth, ascending) set of execution
/// maps to consult — the caller (the scope registry) is responsible for
/// selecting "this scope and everything at or below its depth".
pub fn has_any_executed_child_or_sub_child_of_type(
    node: &dyn ParseNode,
    node_type: NodeType,
    maps: &[&ParseTreeExecutionMap],
) -> bool {
    let descendants = node.descendants_of_type(node_type);
    if descendants.is_empty() {
        return false;
    }
    maps.iter().any(|map| descendants.iter().any(|id| map.is_executed(*id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_and_check() {
        let mut map = ParseTreeExecutionMap::new();
        let n = NodeId(1);
        assert!(!map.is_executed(n));
        map.mark_executed(n);
        assert!(map.is_executed(n));
    }

    #[test]
    fn merge_overwrites_with_child_entries() {
        let mut parent = ParseTreeExecutionMap::new();
        parent.mark_executed(NodeId(1));

        let mut child = ParseTreeExecutionMap::new();
        child.mark_executed(NodeId(2));

        parent.merge_from(&child);
        assert!(parent.is_executed(NodeId(1)));
        assert!(parent.is_executed(NodeId(2)));
    }

    #[test]
    fn merge_into_empty_parent_leaves_child_flags_visible() {
        let mut parent = ParseTreeExecutionMap::new();
        let mut child = ParseTreeExecutionMap::new();
        child.mark_executed(NodeId(5));

        assert!(!parent.is_executed(NodeId(5)));
        parent.merge_from(&child);
        assert!(parent.is_executed(NodeId(5)));
    }
}
