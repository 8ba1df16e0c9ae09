//! Drag-and-drop reparenting

use super::tree::{MoveOutcome, NodeId, MODEL_ROOT_ID};
use super::OutlinerState;
use crate::scene_graph::SceneGraph;

/// Node currently being dragged in the tree panel
#[derive(Default, Debug, Clone)]
pub struct DragState {
    dragged: Option<NodeId>,
}

impl DragState {
    pub fn start(&mut self, id: impl Into<NodeId>) {
        self.dragged = Some(id.into());
    }

    /// Drag ended without a drop (or after one)
    pub fn end(&mut self) {
        self.dragged = None;
    }

    /// Take the dragged id, leaving no drag in progress
    pub fn take(&mut self) -> Option<NodeId> {
        self.dragged.take()
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }
}

impl OutlinerState {
    /// Reparent nodes in the tree and in the scene graph
    pub fn move_nodes(&mut self, scene: &mut dyn SceneGraph, ids: &[NodeId], target: &str) -> MoveOutcome {
        let outcome = self.tree.move_nodes(ids, target);
        let Some(target) = outcome.target.as_deref() else {
            return outcome;
        };

        let new_parent = if target == MODEL_ROOT_ID {
            None
        } else {
            self.tree.get(target).and_then(|n| n.element)
        };
        for id in &outcome.moved {
            if let Some(element) = self.tree.get(id).and_then(|n| n.element) {
                scene.reparent(element, new_parent);
            }
        }

        if !outcome.moved.is_empty() {
            tracing::info!("Moved {} node(s) into '{target}'", outcome.moved.len());
            self.refresh_bounds(scene);
            self.reapply_search();
            self.bump_version();
        }
        outcome
    }

    /// Finish a drag on `target` at time `now`. The whole selection moves when
    /// the dragged node is part of it; otherwise only the dragged node.
    /// The camera is refitted once anything moved.
    pub fn drop_on(&mut self, scene: &mut dyn SceneGraph, target: &str, now: f64) -> Option<MoveOutcome> {
        let dragged = self.drag.take()?;
        let ids = if self.selection.is_selected(&dragged) {
            self.selection.all().to_vec()
        } else {
            vec![dragged]
        };
        let outcome = self.move_nodes(scene, &ids, target);
        if !outcome.moved.is_empty() {
            self.fit_camera(scene, now);
        }
        Some(outcome)
    }
}
