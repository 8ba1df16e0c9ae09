pub mod changes;
pub mod drag;
pub mod highlight;
pub mod selection;
pub mod settings;
pub mod tree;
pub mod visibility;

use glam::Vec3;
use serde::Serialize;

use crate::scene_graph::{Geometry, Material, SceneGraph};
use crate::viewport::bounds::{union_all, Aabb};
use crate::viewport::camera::CameraFit;
use changes::TreeChanges;
pub use drag::DragState;
pub use highlight::{HighlightState, MaterialSnapshots};
pub use selection::SelectionState;
pub use settings::Settings;
use tree::{build_tree, NodeKind, PartTree};

/// Aggregate numbers about the loaded scene
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneStats {
    pub nodes: usize,
    pub meshes: usize,
    pub assemblies: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Distinct pristine materials across mesh nodes
    pub materials: usize,
}

/// All tree UI state for one loaded scene
pub struct OutlinerState {
    pub tree: PartTree,
    pub selection: SelectionState,
    /// Pre-highlight materials of selected nodes
    pub highlight: HighlightState,
    /// Pristine materials captured at build time
    pub snapshots: MaterialSnapshots,
    pub drag: DragState,
    pub settings: Settings,
    pub camera: CameraFit,
    search_query: String,
    /// Center of visible geometry
    centroid: Option<Vec3>,
    /// Cached bounds of visible geometry while the overlay is on
    overlay: Option<Aabb>,
    overlay_enabled: bool,
    /// Bumped on every state change (for redraw caching)
    version: u64,
}

impl Default for OutlinerState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl OutlinerState {
    pub fn new(settings: Settings) -> Self {
        Self {
            tree: PartTree::empty(),
            selection: SelectionState::default(),
            highlight: HighlightState::default(),
            snapshots: MaterialSnapshots::default(),
            drag: DragState::default(),
            camera: CameraFit::new(settings.view.fit_duration_ms),
            overlay_enabled: settings.view.bounds_overlay,
            settings,
            search_query: String::new(),
            centroid: None,
            overlay: None,
            version: 0,
        }
    }

    /// Start over for a freshly loaded scene. Old highlight records belong to
    /// renderables that are gone, so they are dropped without reverting.
    pub fn load(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        self.tree = PartTree::empty();
        self.selection = SelectionState::default();
        self.highlight.clear();
        self.snapshots.clear();
        self.drag = DragState::default();
        self.search_query.clear();
        self.overlay = None;

        let mut changes = self.rebuild(scene);
        if self.settings.view.expand_root_on_load {
            if let Some(root) = self.tree.root_id().map(str::to_string) {
                if self.tree.set_expanded(&root, true) {
                    changes.expanded.push((root, true));
                    changes.merge(self.reapply_search());
                }
            }
        }
        tracing::info!("Loaded scene: {} tree nodes", self.tree.len());
        changes
    }

    /// Rebuild the tree from the scene, carrying expand/visible state by id
    pub fn rebuild(&mut self, scene: &mut dyn SceneGraph) -> TreeChanges {
        let tree = build_tree(scene, Some(&self.tree));
        let mut changes = TreeChanges {
            structure: true,
            ..Default::default()
        };

        // Carried visibility wins over what the scene reports
        for id in tree.preorder() {
            if let Some(node) = tree.get(&id) {
                if let Some(element) = node.element {
                    if scene.visible(element) != node.visible {
                        scene.set_visible(element, node.visible);
                        changes.visibility.push((id.clone(), node.visible));
                    }
                }
            }
        }

        self.tree = tree;
        self.snapshots.capture(&self.tree, scene);

        let removed = self.selection.prune(&self.tree);
        for id in &removed {
            self.highlight.forget(id);
        }
        if !removed.is_empty() {
            tracing::debug!("Pruned {} stale selection entries", removed.len());
            changes.selection = true;
        }

        changes.merge(self.reapply_search());
        self.refresh_bounds(scene);
        self.bump_version();
        tracing::debug!("Rebuilt tree: {} nodes", self.tree.len());
        changes
    }

    /// Set the search query and filter the tree
    pub fn search(&mut self, query: &str) -> TreeChanges {
        self.search_query = query.to_string();
        let changes = self.reapply_search();
        self.bump_version();
        changes
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub(crate) fn reapply_search(&mut self) -> TreeChanges {
        self.tree.apply_search(&self.search_query)
    }

    /// Expand or collapse a node and refresh the filter
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> TreeChanges {
        let mut changes = TreeChanges::default();
        if self.tree.set_expanded(id, expanded) {
            changes.expanded.push((id.to_string(), expanded));
            changes.merge(self.reapply_search());
            self.bump_version();
        }
        changes
    }

    pub fn centroid(&self) -> Option<Vec3> {
        self.centroid
    }

    pub fn overlay(&self) -> Option<&Aabb> {
        self.overlay.as_ref()
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    pub fn set_bounds_overlay(&mut self, scene: &dyn SceneGraph, enabled: bool) {
        self.overlay_enabled = enabled;
        self.refresh_bounds(scene);
        self.bump_version();
    }

    /// Union of world bounds of every effectively visible mesh
    pub fn visible_bounds(&self, scene: &dyn SceneGraph) -> Option<Aabb> {
        union_all(
            self.tree
                .nodes
                .values()
                .filter(|n| n.kind == NodeKind::Mesh && self.tree.is_effectively_visible(&n.id))
                .filter_map(|n| n.element)
                .filter_map(|e| scene.world_bounds(e)),
        )
    }

    /// Recompute centroid and overlay from visible geometry
    pub fn refresh_bounds(&mut self, scene: &dyn SceneGraph) {
        let bounds = self.visible_bounds(scene);
        self.centroid = bounds.map(|b| b.center());
        self.overlay = if self.overlay_enabled { bounds } else { None };
    }

    /// Animate the camera toward visible geometry
    pub fn fit_camera(&mut self, scene: &dyn SceneGraph, now: f64) -> bool {
        match self.visible_bounds(scene) {
            Some(bounds) => {
                self.camera.start(&bounds, now);
                true
            }
            None => false,
        }
    }

    /// Restore the pristine materials captured when the node was first built
    pub fn reset_appearance(&mut self, scene: &mut dyn SceneGraph, id: &str) -> bool {
        let Some(element) = self.tree.get(id).and_then(|n| n.element) else {
            return false;
        };
        let Some(pristine) = self.snapshots.get(id) else {
            return false;
        };
        scene.set_materials(element, pristine.to_vec());
        self.bump_version();
        true
    }

    pub fn stats(&self, scene: &dyn SceneGraph) -> SceneStats {
        let mut stats = SceneStats {
            nodes: self.tree.len(),
            meshes: self.tree.count_kind(NodeKind::Mesh),
            assemblies: self.tree.count_kind(NodeKind::Assembly),
            ..Default::default()
        };
        let mut materials: Vec<Material> = Vec::new();
        for node in self.tree.nodes.values() {
            if node.kind != NodeKind::Mesh {
                continue;
            }
            for m in self.snapshots.get(&node.id).unwrap_or_default() {
                if !materials.contains(m) {
                    materials.push(*m);
                }
            }
            if let Some(Geometry { positions, indices, .. }) = node.element.and_then(|e| scene.geometry(e)) {
                stats.vertices += positions.len();
                stats.triangles += match indices {
                    Some(idx) => idx.len() / 3,
                    None => positions.len() / 3,
                };
            }
        }
        stats.materials = materials.len();
        stats
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assembly, mesh_at, scene_of, triangle_mesh};
    use crate::scene_graph::{Material, MemoryScene};
    use tree::MODEL_ROOT_ID;

    fn scene() -> MemoryScene {
        MemoryScene::from_description(&scene_of(vec![assembly(
            "asm",
            "Asm",
            vec![triangle_mesh("a", "A"), mesh_at("b", "B", [4.0, 0.0, 0.0])],
        )]))
    }

    #[test]
    fn test_load_expands_root() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        assert!(o.tree.get(MODEL_ROOT_ID).unwrap().expanded);
        assert!(!o.tree.is_filter_hidden("asm"));
        assert!(o.tree.is_filter_hidden("a"));
    }

    #[test]
    fn test_centroid_tracks_visibility() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        // a spans 0..1, b spans 4..5 on x
        assert_eq!(o.centroid().unwrap().x, 2.5);
        o.toggle_visibility(&mut s, "b", false);
        assert_eq!(o.centroid().unwrap().x, 0.5);
        o.toggle_visibility(&mut s, "asm", false);
        assert!(o.centroid().is_none());
    }

    #[test]
    fn test_overlay_only_when_enabled() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        assert!(o.overlay().is_none());
        o.set_bounds_overlay(&s, true);
        assert_eq!(o.overlay().unwrap().max.x, 5.0);
        o.toggle_visibility(&mut s, "b", false);
        assert_eq!(o.overlay().unwrap().max.x, 1.0);
        o.set_bounds_overlay(&s, false);
        assert!(o.overlay().is_none());
    }

    #[test]
    fn test_rebuild_carries_visible_and_prunes_selection() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        o.toggle_visibility(&mut s, "a", false);
        o.select(&mut s, &(), "b", false, false);

        // Scene reports visible again; the tree's flag is pushed back
        let a = s.find("a").unwrap();
        s.set_visible(a, true);
        let changes = o.rebuild(&mut s);
        assert!(!o.tree.get("a").unwrap().visible);
        assert!(!s.visible(a));
        assert_eq!(changes.visibility_of("a"), Some(false));
        assert!(o.selection.is_selected("b"));

        o.load(&mut MemoryScene::new());
        assert!(o.tree.is_empty());
        assert!(o.selection.is_empty());
    }

    #[test]
    fn test_search_reapplied_after_expand() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        o.search("");
        assert!(o.tree.is_filter_hidden("a"));
        o.set_expanded("asm", true);
        assert!(!o.tree.is_filter_hidden("a"));
        o.search("B");
        assert!(o.tree.is_filter_hidden("a"));
        assert_eq!(o.search_query(), "B");
    }

    #[test]
    fn test_reset_appearance() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        let el = s.find("a").unwrap();
        let pristine = s.materials(el);
        s.set_materials(
            el,
            vec![Material {
                color: [1.0, 0.0, 0.0],
                ..Material::default()
            }],
        );
        assert!(o.reset_appearance(&mut s, "a"));
        assert_eq!(s.materials(el), pristine);
        assert!(!o.reset_appearance(&mut s, "asm"));
    }

    #[test]
    fn test_stats() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        let stats = o.stats(&s);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.meshes, 2);
        assert_eq!(stats.assemblies, 1);
        assert_eq!(stats.vertices, 6);
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.materials, 1);
    }

    #[test]
    fn test_fit_camera_starts_animation() {
        let mut s = scene();
        let mut o = OutlinerState::default();
        o.load(&mut s);
        assert!(o.fit_camera(&s, 0.0));
        assert!(o.camera.is_animating());
        let pose = o.camera.tick(10.0);
        assert_eq!(pose.target.x, 2.5);

        o.show_all(&mut s);
        o.toggle_visibility(&mut s, MODEL_ROOT_ID, false);
        assert!(!o.fit_camera(&s, 11.0));
    }
}
