use super::changes::TreeChanges;
use super::tree::{NodeId, NodeKind, PartTree};
use super::OutlinerState;
use crate::scene_graph::{MaterialManager, SceneGraph};

/// Node selection state (ordered, last = range anchor)
#[derive(Default, Debug, Clone)]
pub struct SelectionState {
    /// Selected node IDs (in order of selection)
    selected: Vec<NodeId>,
}

impl SelectionState {
    /// All selected nodes
    pub fn all(&self) -> &[NodeId] {
        &self.selected
    }

    /// Most recently selected node
    pub fn anchor(&self) -> Option<&str> {
        self.selected.last().map(|s| s.as_str())
    }

    /// Check if a node is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Number of selected nodes
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Append unless already present. Returns true if appended.
    pub fn push(&mut self, id: impl Into<NodeId>) -> bool {
        let id = id.into();
        if self.is_selected(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Returns true if the id was selected
    pub fn remove(&mut self, id: &str) -> bool {
        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop ids missing from `tree`, returning them
    pub fn prune(&mut self, tree: &PartTree) -> Vec<NodeId> {
        let (kept, removed) = std::mem::take(&mut self.selected)
            .into_iter()
            .partition(|id| tree.contains(id));
        self.selected = kept;
        removed
    }

    /// Empty the selection, returning what was selected
    pub fn take_all(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.selected)
    }
}

impl OutlinerState {
    /// Select a node. Non-additive replaces the selection; additive toggles.
    /// `reveal` expands every ancestor of the node.
    pub fn select(
        &mut self,
        scene: &mut dyn SceneGraph,
        colors: &dyn MaterialManager,
        id: &str,
        additive: bool,
        reveal: bool,
    ) -> TreeChanges {
        if !self.tree.contains(id) {
            tracing::debug!("select: unknown node '{id}'");
            return TreeChanges::default();
        }

        let mut changes = TreeChanges::default();
        if additive && self.selection.is_selected(id) {
            self.selection.remove(id);
            self.unhighlight(scene, colors, id);
            changes.selection = true;
            return changes;
        }
        if !additive {
            changes.merge(self.clear_selection(scene, colors));
        }

        self.selection.push(id);
        self.highlight_node(scene, id);
        changes.selection = true;

        if reveal {
            let opened = self.tree.reveal(id);
            if !opened.is_empty() {
                changes.expanded.extend(opened.into_iter().map(|a| (a, true)));
                changes.merge(self.reapply_search());
            }
        }
        changes
    }

    /// Select every visible node between the anchor and `to` (inclusive) in
    /// pre-order, walking from the anchor. Replaces the selection.
    pub fn select_range(
        &mut self,
        scene: &mut dyn SceneGraph,
        colors: &dyn MaterialManager,
        to: &str,
    ) -> TreeChanges {
        if !self.tree.contains(to) {
            tracing::debug!("select_range: unknown node '{to}'");
            return TreeChanges::default();
        }
        let Some(anchor) = self.selection.anchor().map(str::to_string) else {
            return self.select(scene, colors, to, false, false);
        };

        let order = self.tree.preorder();
        let from_pos = order.iter().position(|i| *i == anchor);
        let to_pos = order.iter().position(|i| i == to);
        let (Some(a), Some(b)) = (from_pos, to_pos) else {
            return self.select(scene, colors, to, false, false);
        };

        let span: Vec<NodeId> = if a <= b {
            order[a..=b].to_vec()
        } else {
            order[b..=a].iter().rev().cloned().collect()
        };
        let picked: Vec<NodeId> = span
            .into_iter()
            .filter(|i| self.tree.get(i).is_some_and(|n| n.visible))
            .collect();

        let mut changes = self.clear_selection(scene, colors);
        for id in picked {
            self.selection.push(id.clone());
            self.highlight_node(scene, &id);
        }
        changes.selection = true;
        changes
    }

    /// Deselect everything, reverting every highlight
    pub fn clear_selection(
        &mut self,
        scene: &mut dyn SceneGraph,
        colors: &dyn MaterialManager,
    ) -> TreeChanges {
        let previous = self.selection.take_all();
        for id in &previous {
            self.unhighlight(scene, colors, id);
        }
        TreeChanges {
            selection: !previous.is_empty(),
            ..Default::default()
        }
    }

    /// Replace the selection with every effectively visible mesh
    pub fn select_all_visible(
        &mut self,
        scene: &mut dyn SceneGraph,
        colors: &dyn MaterialManager,
    ) -> TreeChanges {
        let targets: Vec<NodeId> = self
            .tree
            .preorder()
            .into_iter()
            .filter(|id| {
                self.tree.get(id).is_some_and(|n| n.kind == NodeKind::Mesh)
                    && self.tree.is_effectively_visible(id)
            })
            .collect();

        let mut changes = self.clear_selection(scene, colors);
        for id in targets {
            self.selection.push(id.clone());
            self.highlight_node(scene, &id);
            changes.selection = true;
        }
        changes
    }

    fn highlight_node(&mut self, scene: &mut dyn SceneGraph, id: &str) {
        if let Some(node) = self.tree.get(id) {
            self.highlight.apply(scene, node, &self.settings.highlight);
        }
    }

    fn unhighlight(&mut self, scene: &mut dyn SceneGraph, colors: &dyn MaterialManager, id: &str) {
        match self.tree.get(id) {
            Some(node) => self.highlight.revert(scene, colors, node),
            None => self.highlight.forget(id),
        }
    }
}
