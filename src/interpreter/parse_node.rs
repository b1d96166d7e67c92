//! Parse-tree boundary
//!
//! The grammar and generated parse tree are external collaborators (out of
//! scope per SPEC_FULL.md §1). This module defines the minimal surface the
//! execution context needs from a parse-tree node: a stable identity, a type
//! tag for `has_any_executed_child_or_sub_child_of_type`, and the ability to
//! walk its descendants.

/// Opaque, stable identity for a parse-tree node. The parser is responsible
/// for handing out identities that stay valid for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A node type tag, used only to filter descendants in
/// `has_any_executed_child_or_sub_child_of_type`. Left as a plain string so
/// any concrete grammar's node-kind enum can be described without this crate
/// depending on it.
pub type NodeType = &'static str;

/// The subset of parse-tree node behavior the execution context relies on.
pub trait ParseNode {
    fn node_id(&self) -> NodeId;
    fn node_type(&self) -> NodeType;
    fn children(&self) -> Vec<&dyn ParseNode>;

    /// True if `self` or any transitive descendant has the given type.
    fn descendants_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants_of_type(node_type, &mut out);
        out
    }

    fn collect_descendants_of_type(&self, node_type: NodeType, out: &mut Vec<NodeId>) {
        if self.node_type() == node_type {
            out.push(self.node_id());
        }
        for child in self.children() {
            child.collect_descendants_of_type(node_type, out);
        }
    }
}
