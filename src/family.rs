//! A decision's place among its parent's children.
//!
//! Strategies are stored on the parent, one row per child, so locking a
//! decision means finding its row: the target's index among its siblings.

use crate::endpoint::SolverEndpoint;
use crate::error::{NodelockError, NodelockResult};
use crate::node_id::NodeAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub node: NodeAddress,
    pub parent: NodeAddress,
    /// Every child of `parent`, in solver order. Row basis of the strategy.
    pub siblings: Vec<NodeAddress>,
    pub target_index: usize,
    pub children: Vec<NodeAddress>,
}

/// Asks the solver for the parent's children and the node's own children.
/// Never cached: the tree may have changed since the last call.
pub fn resolve_family<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    node: &NodeAddress,
) -> NodelockResult<Family> {
    let parent = node
        .parent()
        .ok_or_else(|| NodelockError::InvalidNodeId(format!("{} has no parent decision", node)))?;

    let children = endpoint.children_of(node)?;
    let siblings = endpoint.children_of(&parent)?;

    let target_index = siblings
        .iter()
        .position(|s| s == node)
        .ok_or_else(|| NodelockError::UnknownDecisionNode {
            node: node.to_string(),
            parent: parent.to_string(),
            siblings: siblings.iter().map(|s| s.to_string()).collect(),
        })?;

    log::debug!(
        "{} is child {} of {} ({} siblings, {} children)",
        node,
        target_index,
        parent,
        siblings.len(),
        children.len()
    );

    Ok(Family {
        node: node.clone(),
        parent,
        siblings,
        target_index,
        children,
    })
}

/// Column titles for a family: the last decision of each sibling, then of
/// each child.
pub fn column_titles(family: &Family) -> (Vec<String>, Vec<String>) {
    let label = |n: &NodeAddress| n.last_decision().to_string();
    (
        family.siblings.iter().map(label).collect(),
        family.children.iter().map(label).collect(),
    )
}
