//! Headless test harness for programmatic outliner manipulation.
//!
//! Owns an in-memory scene graph, a material manager and the outliner state,
//! and wires them together the way the desktop shell does.

use shared::SceneDescription;

use crate::export::{ExportError, ExportMode, Triangle};
use crate::scene_graph::{AppliedColors, Material, MemoryScene, SceneGraph};
use crate::state::tree::{MoveOutcome, NodeId};
use crate::state::{OutlinerState, SceneStats, Settings};

/// Headless test harness: owns scene graph, applied colors and tree state
pub struct TestHarness {
    pub scene: MemoryScene,
    pub colors: AppliedColors,
    pub outliner: OutlinerState,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            scene: MemoryScene::new(),
            colors: AppliedColors::default(),
            outliner: OutlinerState::new(Settings::default()),
        }
    }

    // ── Scene loading ─────────────────────────────────────────

    /// Load a scene (replaces current)
    pub fn load_scene(&mut self, desc: SceneDescription) {
        self.scene = MemoryScene::from_description(&desc);
        self.colors = AppliedColors::default();
        self.outliner.load(&mut self.scene);
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let desc: SceneDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_scene(desc);
        Ok(())
    }

    /// Add models next to the loaded ones and rebuild the tree
    pub fn import_scene(&mut self, desc: SceneDescription) {
        self.scene.import(&desc);
        self.outliner.rebuild(&mut self.scene);
    }

    /// Rebuild the tree from the scene graph
    pub fn rebuild(&mut self) {
        self.outliner.rebuild(&mut self.scene);
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.load_scene(SceneDescription::default());
    }

    // ── Selection ─────────────────────────────────────────────

    /// Select a node (replaces the selection)
    pub fn select(&mut self, id: &str) {
        self.outliner.select(&mut self.scene, &self.colors, id, false, false);
    }

    /// Ctrl+click: toggle a node in the selection
    pub fn select_additive(&mut self, id: &str) {
        self.outliner.select(&mut self.scene, &self.colors, id, true, false);
    }

    /// Select and expand the path to the node
    pub fn reveal(&mut self, id: &str) {
        self.outliner.select(&mut self.scene, &self.colors, id, false, true);
    }

    /// Shift+click
    pub fn select_range(&mut self, id: &str) {
        self.outliner.select_range(&mut self.scene, &self.colors, id);
    }

    pub fn select_all_visible(&mut self) {
        self.outliner.select_all_visible(&mut self.scene, &self.colors);
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        self.outliner.clear_selection(&mut self.scene, &self.colors);
    }

    /// Selected ids in selection order
    pub fn selected(&self) -> Vec<NodeId> {
        self.outliner.selection.all().to_vec()
    }

    // ── Visibility ────────────────────────────────────────────

    /// Eye-icon click on a single node
    pub fn toggle_visibility(&mut self, id: &str) {
        self.outliner.toggle_visibility(&mut self.scene, id, false);
    }

    /// Alt+click on the eye icon
    pub fn toggle_subtree(&mut self, id: &str) {
        self.outliner.toggle_visibility(&mut self.scene, id, true);
    }

    pub fn hide_selected(&mut self) {
        self.outliner.hide_selected(&mut self.scene);
    }

    pub fn show_selected(&mut self) {
        self.outliner.show_selected(&mut self.scene);
    }

    pub fn isolate(&mut self) {
        self.outliner.isolate_selected(&mut self.scene);
    }

    pub fn invert(&mut self) {
        self.outliner.invert_selected_visibility(&mut self.scene);
    }

    pub fn show_all(&mut self) {
        self.outliner.show_all(&mut self.scene);
    }

    // ── Structure ─────────────────────────────────────────────

    /// Reparent nodes under `target`
    pub fn move_nodes(&mut self, ids: &[&str], target: &str) -> MoveOutcome {
        let ids: Vec<NodeId> = ids.iter().map(|s| s.to_string()).collect();
        self.outliner.move_nodes(&mut self.scene, &ids, target)
    }

    /// Simulate a full drag gesture from `id` onto `target`
    pub fn drag_and_drop(&mut self, id: &str, target: &str) -> Option<MoveOutcome> {
        self.outliner.drag.start(id);
        let outcome = self.outliner.drop_on(&mut self.scene, target, 0.0);
        self.outliner.drag.end();
        outcome
    }

    // ── Tree view ─────────────────────────────────────────────

    pub fn search(&mut self, query: &str) {
        self.outliner.search(query);
    }

    pub fn expand(&mut self, id: &str) {
        self.outliner.set_expanded(id, true);
    }

    pub fn collapse(&mut self, id: &str) {
        self.outliner.set_expanded(id, false);
    }

    /// Ids a tree view would currently render, in display order
    pub fn shown_ids(&self) -> Vec<NodeId> {
        let tree = &self.outliner.tree;
        tree.preorder()
            .into_iter()
            .filter(|id| !tree.is_filter_hidden(id))
            .collect()
    }

    // ── Materials ─────────────────────────────────────────────

    /// Apply a persistent user color (material editor)
    pub fn apply_color(&mut self, id: &str, color: [f32; 3]) {
        self.colors.apply(id, color);
        if let Some(element) = self.scene.find(id) {
            let materials = self
                .scene
                .materials(element)
                .into_iter()
                .map(|m| Material { color, ..m })
                .collect();
            self.scene.set_materials(element, materials);
        }
    }

    /// Current materials of a node's renderable
    pub fn materials_of(&self, id: &str) -> Vec<Material> {
        self.scene
            .find(id)
            .map(|e| self.scene.materials(e))
            .unwrap_or_default()
    }

    // ── Export + inspection ───────────────────────────────────

    /// Export the selection, collecting every stream
    pub fn export(&self, mode: ExportMode) -> Result<Vec<(String, Vec<Triangle>)>, ExportError> {
        let streams = self.outliner.export_selected(&self.scene, mode)?;
        Ok(streams
            .into_iter()
            .map(|s| (s.label.clone(), s.collect()))
            .collect())
    }

    /// Number of tree nodes (including the model root)
    pub fn node_count(&self) -> usize {
        self.outliner.tree.len()
    }

    /// Node's own visible flag
    pub fn is_visible(&self, id: &str) -> bool {
        self.outliner.tree.get(id).is_some_and(|n| n.visible)
    }

    /// Whether the renderer would draw the element (ancestors included)
    pub fn is_rendered(&self, id: &str) -> bool {
        self.scene.find(id).is_some_and(|e| self.scene.is_rendered(e))
    }

    pub fn children_of(&self, id: &str) -> Vec<NodeId> {
        self.outliner
            .tree
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, id: &str) -> Option<NodeId> {
        self.outliner.tree.get(id).and_then(|n| n.parent.clone())
    }

    pub fn stats(&self) -> SceneStats {
        self.outliner.stats(&self.scene)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{car_scene, sample_scene, triangle_mesh, scene_of};
    use crate::state::tree::MODEL_ROOT_ID;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.node_count(), 0);
        assert!(h.selected().is_empty());
    }

    #[test]
    fn test_load_scene() {
        let mut h = TestHarness::new();
        h.load_scene(car_scene());
        assert_eq!(h.node_count(), 6);
        assert_eq!(h.children_of(MODEL_ROOT_ID), vec!["chassis"]);
        assert_eq!(h.shown_ids(), vec![MODEL_ROOT_ID, "chassis"]);
    }

    #[test]
    fn test_load_scene_json_error() {
        let mut h = TestHarness::new();
        let err = h.load_scene_json("{not json").unwrap_err();
        assert!(err.contains("JSON parse error"));
    }

    #[test]
    fn test_import_keeps_state() {
        let mut h = TestHarness::new();
        h.load_scene(sample_scene());
        h.expand("AssemblyA");
        h.toggle_visibility("Mesh1");
        h.select("Mesh3");

        h.import_scene(scene_of(vec![triangle_mesh("extra", "Extra")]));
        assert_eq!(h.children_of(MODEL_ROOT_ID), vec!["AssemblyA", "Mesh3", "extra"]);
        assert!(h.outliner.tree.get("AssemblyA").unwrap().expanded);
        assert!(!h.is_visible("Mesh1"));
        assert_eq!(h.selected(), vec!["Mesh3"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut h = TestHarness::new();
        h.load_scene(sample_scene());
        h.select("Mesh1");
        h.clear();
        assert_eq!(h.node_count(), 0);
        assert!(h.selected().is_empty());
    }

    #[test]
    fn test_hide_show_rendering() {
        let mut h = TestHarness::new();
        h.load_scene(sample_scene());
        h.toggle_visibility("AssemblyA");
        assert!(h.is_visible("Mesh1"));
        assert!(!h.is_rendered("Mesh1"));
        h.toggle_visibility("AssemblyA");
        assert!(h.is_rendered("Mesh1"));
    }

    #[test]
    fn test_drag_and_drop() {
        let mut h = TestHarness::new();
        h.load_scene(sample_scene());
        let out = h.drag_and_drop("Mesh3", "Mesh1").unwrap();
        assert_eq!(out.moved, vec!["Mesh3"]);
        assert_eq!(h.parent_of("Mesh3").as_deref(), Some("AssemblyA"));
        assert!(!h.outliner.drag.is_dragging());
    }

    #[test]
    fn test_export_selection() {
        let mut h = TestHarness::new();
        h.load_scene(sample_scene());
        h.select("AssemblyA");
        let streams = h.export(ExportMode::Combine).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].0, "AssemblyA");
        assert_eq!(streams[0].1.len(), 2);
    }
}
