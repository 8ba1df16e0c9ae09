//! Visibility controller
//!
//! Model operations flip `visible` flags on the [`PartTree`] and describe the
//! flips in a [`TreeChanges`]. The outliner wrappers push the flips into the
//! scene graph and refresh the cached centroid/overlay.

use std::collections::HashSet;

use super::changes::TreeChanges;
use super::tree::{NodeId, PartTree};
use super::OutlinerState;
use crate::scene_graph::SceneGraph;

impl PartTree {
    fn set_visible_into(&mut self, id: &str, visible: bool, changes: &mut TreeChanges) {
        if let Some(node) = self.get_mut(id) {
            if node.visible != visible {
                node.visible = visible;
                changes.visibility.push((node.id.clone(), visible));
            }
        }
    }

    /// Flip one node. With `bulk` on a container, node and every descendant
    /// get the negation of the node's current flag.
    pub fn toggle_visibility(&mut self, id: &str, bulk: bool) -> TreeChanges {
        let mut changes = TreeChanges::default();
        let Some(node) = self.get(id) else {
            tracing::debug!("toggle_visibility: unknown node '{id}'");
            return changes;
        };
        let target = !node.visible;

        if bulk && node.kind.is_container() {
            let mut ids = vec![id.to_string()];
            ids.extend(self.descendants(id));
            for i in ids {
                self.set_visible_into(&i, target, &mut changes);
            }
        } else {
            self.set_visible_into(id, target, &mut changes);
        }
        changes
    }

    /// Set exactly the given nodes, non-recursively
    pub fn set_visible_many(&mut self, ids: &[NodeId], visible: bool) -> TreeChanges {
        let mut changes = TreeChanges::default();
        for id in ids {
            self.set_visible_into(id, visible, &mut changes);
        }
        changes
    }

    /// Show the selected nodes, their ancestors and the subtrees of selected
    /// containers. Hide everything else.
    pub fn isolate(&mut self, selected: &[NodeId]) -> TreeChanges {
        let mut shown: HashSet<NodeId> = HashSet::new();
        for id in selected {
            let Some(node) = self.get(id) else {
                continue;
            };
            shown.insert(id.clone());
            shown.extend(self.ancestors(id));
            if node.kind.is_container() {
                shown.extend(self.descendants(id));
            }
        }
        if shown.is_empty() {
            return TreeChanges::default();
        }
        self.apply_shown(&shown)
    }

    /// Hide the selected nodes and show the rest, then re-show every ancestor
    /// of a shown node
    pub fn invert(&mut self, selected: &[NodeId]) -> TreeChanges {
        let selected: HashSet<&str> = selected
            .iter()
            .map(|s| s.as_str())
            .filter(|s| self.contains(s))
            .collect();
        if selected.is_empty() {
            return TreeChanges::default();
        }

        let mut shown: HashSet<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !selected.contains(id.as_str()))
            .cloned()
            .collect();
        let ancestors: Vec<NodeId> = shown.iter().flat_map(|id| self.ancestors(id)).collect();
        shown.extend(ancestors);
        self.apply_shown(&shown)
    }

    /// Every node visible
    pub fn show_all(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        for id in self.preorder() {
            self.set_visible_into(&id, true, &mut changes);
        }
        changes
    }

    fn apply_shown(&mut self, shown: &HashSet<NodeId>) -> TreeChanges {
        let mut changes = TreeChanges::default();
        for id in self.preorder() {
            let visible = shown.contains(&id);
            self.set_visible_into(&id, visible, &mut changes);
        }
        changes
    }
}

impl OutlinerState {
    pub fn toggle_visibility(&mut self, scene: &mut dyn SceneGraph, id: &str, bulk: bool) -> TreeChanges {
        let changes = self.tree.toggle_visibility(id, bulk);
        self.apply_visibility(scene, &changes);
        changes
    }

    pub fn hide_selected(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let changes = self.tree.set_visible_many(self.selection.all(), false);
        self.apply_visibility(scene, &changes);
        changes
    }

    pub fn show_selected(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let changes = self.tree.set_visible_many(self.selection.all(), true);
        self.apply_visibility(scene, &changes);
        changes
    }

    pub fn isolate_selected(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let changes = self.tree.isolate(self.selection.all());
        self.apply_visibility(scene, &changes);
        changes
    }

    pub fn invert_selected_visibility(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let changes = self.tree.invert(self.selection.all());
        self.apply_visibility(scene, &changes);
        changes
    }

    pub fn show_all(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let changes = self.tree.show_all();
        self.apply_visibility(scene, &changes);
        changes
    }

    /// Push visibility flips into the scene graph and refresh bounds
    pub fn apply_visibility(&mut self, scene: &mut dyn SceneGraph, changes: &TreeChanges) {
        if changes.visibility.is_empty() {
            return;
        }
        for (id, visible) in &changes.visibility {
            if let Some(element) = self.tree.get(id).and_then(|n| n.element) {
                scene.set_visible(element, *visible);
            }
        }
        self.refresh_bounds(scene);
        self.bump_version();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tree::test_support::sample;
    use crate::state::tree::NodeKind;

    fn visible_set(t: &PartTree) -> Vec<String> {
        t.preorder()
            .into_iter()
            .filter(|id| t.get(id).unwrap().visible)
            .collect()
    }

    #[test]
    fn test_single_toggle_only_touches_node() {
        let mut t = sample();
        let c = t.toggle_visibility("AssemblyA", false);
        assert_eq!(c.visibility, vec![("AssemblyA".to_string(), false)]);
        assert!(t.get("Mesh1").unwrap().visible);
        assert!(!t.is_effectively_visible("Mesh1"));
    }

    #[test]
    fn test_bulk_toggle_sets_subtree_to_negation() {
        let mut t = sample();
        t.toggle_visibility("Mesh1", false);
        // AssemblyA is visible, so bulk hides node + all descendants
        t.toggle_visibility("AssemblyA", true);
        assert!(!t.get("AssemblyA").unwrap().visible);
        assert!(!t.get("Mesh1").unwrap().visible);
        assert!(!t.get("Mesh2").unwrap().visible);

        t.toggle_visibility("AssemblyA", true);
        assert!(t.get("Mesh1").unwrap().visible);
        assert!(t.get("Mesh2").unwrap().visible);
    }

    #[test]
    fn test_bulk_on_mesh_is_single_toggle() {
        let mut t = sample();
        let c = t.toggle_visibility("Mesh3", true);
        assert_eq!(c.visibility, vec![("Mesh3".to_string(), false)]);
    }

    #[test]
    fn test_toggle_parity() {
        for n in 0..6 {
            let mut t = sample();
            for _ in 0..n {
                t.toggle_visibility("Mesh2", false);
            }
            assert_eq!(t.get("Mesh2").unwrap().visible, n % 2 == 0);
        }
    }

    #[test]
    fn test_unknown_id_noop() {
        let mut t = sample();
        assert!(t.toggle_visibility("ghost", true).is_empty());
    }

    #[test]
    fn test_hide_show_non_recursive() {
        let mut t = sample();
        t.set_visible_many(&["AssemblyA".to_string()], false);
        assert!(t.get("Mesh1").unwrap().visible);
        let again = t.set_visible_many(&["AssemblyA".to_string()], false);
        assert!(again.is_empty());
    }

    #[test]
    fn test_isolate_single_mesh() {
        let mut t = sample();
        t.isolate(&["Mesh1".to_string()]);
        assert_eq!(visible_set(&t), vec!["Root", "AssemblyA", "Mesh1"]);
        // Idempotent
        assert!(t.isolate(&["Mesh1".to_string()]).is_empty());
    }

    #[test]
    fn test_isolate_assembly_shows_subtree() {
        let mut t = sample();
        t.toggle_visibility("Mesh2", false);
        t.isolate(&["AssemblyA".to_string()]);
        assert_eq!(visible_set(&t), vec!["Root", "AssemblyA", "Mesh1", "Mesh2"]);
    }

    #[test]
    fn test_isolate_empty_selection_noop() {
        let mut t = sample();
        assert!(t.isolate(&[]).is_empty());
        assert_eq!(visible_set(&t).len(), 5);
    }

    #[test]
    fn test_invert_reshows_ancestors() {
        let mut t = sample();
        t.invert(&["AssemblyA".to_string(), "Mesh3".to_string()]);
        // Mesh1/Mesh2 stay shown, so their parent AssemblyA is re-shown
        assert_eq!(visible_set(&t), vec!["Root", "AssemblyA", "Mesh1", "Mesh2"]);
    }

    #[test]
    fn test_invert_leaf() {
        let mut t = sample();
        t.invert(&["Mesh1".to_string()]);
        assert_eq!(visible_set(&t), vec!["Root", "AssemblyA", "Mesh2", "Mesh3"]);
    }

    #[test]
    fn test_show_all() {
        let mut t = sample();
        t.isolate(&["Mesh3".to_string()]);
        let c = t.show_all();
        assert_eq!(c.visibility.len(), 3);
        assert_eq!(visible_set(&t).len(), 5);
        assert_eq!(t.count_kind(NodeKind::Mesh), 3);
    }
}
