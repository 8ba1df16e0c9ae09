//! Reparenting with cycle rejection

use super::{NodeId, NodeKind, PartTree};

/// Result of a move request
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MoveOutcome {
    /// Effective target after redirecting mesh targets to their parent
    pub target: Option<NodeId>,
    /// Nodes that were moved, in request order
    pub moved: Vec<NodeId>,
    /// Nodes refused because the move would detach the root or form a cycle
    pub rejected: Vec<NodeId>,
}

impl PartTree {
    /// A mesh cannot hold children; dropping onto it means its parent
    pub fn resolve_drop_target(&self, target: &str) -> Option<NodeId> {
        let node = self.get(target)?;
        match node.kind {
            NodeKind::Mesh => node.parent.clone(),
            NodeKind::Assembly | NodeKind::ModelRoot => Some(node.id.clone()),
        }
    }

    /// Whether `id` may become a child of the resolved container `target`
    pub fn can_move(&self, id: &str, target: &str) -> bool {
        match self.get(id) {
            Some(node) if node.kind == NodeKind::ModelRoot => false,
            Some(_) => !self.is_self_or_ancestor(id, target),
            None => false,
        }
    }

    /// Move every node of `ids` to the end of `target`'s children.
    /// `level` and `expanded` are left for the next rebuild.
    pub fn move_nodes(&mut self, ids: &[NodeId], target: &str) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        let Some(target) = self.resolve_drop_target(target) else {
            tracing::debug!("move: unknown target '{target}'");
            return outcome;
        };

        for id in ids {
            if !self.contains(id) {
                tracing::debug!("move: unknown node '{id}'");
                continue;
            }
            if !self.can_move(id, &target) {
                tracing::warn!("Rejected move of '{id}' into '{target}'");
                outcome.rejected.push(id.clone());
                continue;
            }

            let old_parent = self.get(id).and_then(|n| n.parent.clone());
            if let Some(p) = old_parent {
                if let Some(parent) = self.get_mut(&p) {
                    parent.children.retain(|c| c != id);
                }
            }
            if let Some(t) = self.get_mut(&target) {
                t.children.push(id.clone());
            }
            if let Some(n) = self.get_mut(id) {
                n.parent = Some(target.clone());
            }
            outcome.moved.push(id.clone());
        }

        outcome.target = Some(target);
        outcome
    }
}
