//! Non-destructive selection highlight and pristine material snapshots

use std::collections::{HashMap, HashSet};

use super::settings::HighlightSettings;
use super::tree::{Node, NodeId, NodeKind, PartTree};
use crate::scene_graph::{Material, MaterialManager, SceneGraph};

/// Materials recorded right before a node was highlighted
#[derive(Default)]
pub struct HighlightState {
    records: HashMap<NodeId, Vec<Material>>,
    /// Nodes that already own private material copies. Survives deselection.
    duplicated: HashSet<NodeId>,
}

impl HighlightState {
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Recorded pre-highlight materials
    pub fn recorded(&self, id: &str) -> Option<&[Material]> {
        self.records.get(id).map(|m| m.as_slice())
    }

    /// Highlight a node: record its materials, give it private copies on the
    /// first highlight, blend toward the highlight color and draw it on top
    /// of occluders. A node that already has a record is left alone.
    pub fn apply(&mut self, scene: &mut dyn SceneGraph, node: &Node, settings: &HighlightSettings) {
        if self.records.contains_key(&node.id) {
            return;
        }
        let Some(element) = node.element else {
            return;
        };
        let original = scene.materials(element);
        if original.is_empty() {
            return;
        }

        if self.duplicated.insert(node.id.clone()) {
            scene.duplicate_materials(element);
        }
        let highlighted = original
            .iter()
            .map(|m| Material {
                color: settings.blend(m.color),
                depth_test: false,
                depth_write: false,
                ..*m
            })
            .collect();
        scene.set_materials(element, highlighted);
        self.records.insert(node.id.clone(), original);
    }

    /// Undo the highlight. A color applied through the material manager wins
    /// over the recorded original color. The record is dropped here only.
    pub fn revert(&mut self, scene: &mut dyn SceneGraph, colors: &dyn MaterialManager, node: &Node) {
        let Some(recorded) = self.records.remove(&node.id) else {
            return;
        };
        let Some(element) = node.element else {
            return;
        };
        let restored = match colors.applied_color(&node.id) {
            Some(color) => recorded.into_iter().map(|m| Material { color, ..m }).collect(),
            None => recorded,
        };
        scene.set_materials(element, restored);
    }

    /// Drop a record without touching the scene (the renderable is gone)
    pub fn forget(&mut self, id: &str) {
        self.records.remove(id);
        self.duplicated.remove(id);
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.duplicated.clear();
    }
}

/// Pristine materials of every mesh node, captured once per id
#[derive(Default)]
pub struct MaterialSnapshots {
    snapshots: HashMap<NodeId, Vec<Material>>,
}

impl MaterialSnapshots {
    /// Snapshot meshes that have no snapshot yet. Returns how many were taken.
    pub fn capture(&mut self, tree: &PartTree, scene: &dyn SceneGraph) -> usize {
        let mut taken = 0;
        for node in tree.nodes.values() {
            if node.kind != NodeKind::Mesh || self.snapshots.contains_key(&node.id) {
                continue;
            }
            if let Some(element) = node.element {
                self.snapshots.insert(node.id.clone(), scene.materials(element));
                taken += 1;
            }
        }
        taken
    }

    pub fn get(&self, id: &str) -> Option<&[Material]> {
        self.snapshots.get(id).map(|m| m.as_slice())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
