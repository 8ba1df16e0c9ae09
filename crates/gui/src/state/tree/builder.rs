//! Hierarchy builder: derive a fresh [`PartTree`] from the scene graph

use super::{Node, NodeId, NodeKind, PartTree, MODEL_ROOT_ID, MODEL_ROOT_NAME, UNNAMED_PART};
use crate::scene_graph::{ElementRef, SceneGraph};

/// Build the tree from every scene root under one synthetic model root.
///
/// `expanded` and `visible` of nodes whose id also exists in `previous` are
/// carried over. A scene without any qualifying element yields an empty tree.
pub fn build_tree(scene: &dyn SceneGraph, previous: Option<&PartTree>) -> PartTree {
    let mut builder = Builder {
        scene,
        previous,
        tree: PartTree::empty(),
    };

    let root = Node {
        id: MODEL_ROOT_ID.to_string(),
        name: MODEL_ROOT_NAME.to_string(),
        kind: NodeKind::ModelRoot,
        level: 0,
        parent: None,
        children: Vec::new(),
        visible: previous
            .and_then(|p| p.get(MODEL_ROOT_ID))
            .map(|n| n.visible)
            .unwrap_or(true),
        expanded: false,
        element: None,
    };
    builder.tree.nodes.insert(root.id.clone(), root);
    builder.tree.root = Some(MODEL_ROOT_ID.to_string());

    for element in scene.roots() {
        builder.visit(element, MODEL_ROOT_ID);
    }

    let mut tree = builder.tree;
    let root_has_children = tree.root().is_some_and(|r| r.has_children());
    if !root_has_children {
        tracing::debug!("Scene has no qualifying elements, tree is empty");
        return PartTree::empty();
    }

    // Restore expand state; leaves stay collapsed
    let expanded = previous.map(|p| p.expanded_state()).unwrap_or_default();
    for node in tree.nodes.values_mut() {
        node.expanded = node.has_children() && expanded.get(&node.id).copied().unwrap_or(false);
    }

    tracing::debug!("Built part tree with {} nodes", tree.len());
    tree
}

struct Builder<'a> {
    scene: &'a dyn SceneGraph,
    previous: Option<&'a PartTree>,
    tree: PartTree,
}

impl Builder<'_> {
    /// Traverse `element`, attaching it (or, if elided, its children) to `parent`
    fn visit(&mut self, element: ElementRef, parent: &str) {
        if !self.qualifies(element) {
            for child in self.scene.children(element) {
                self.visit(child, parent);
            }
            return;
        }

        let id: NodeId = self.scene.element_id(element);
        if self.tree.nodes.contains_key(&id) {
            tracing::warn!("Duplicate element id '{id}' in scene graph, skipping subtree");
            return;
        }

        let level = self.tree.nodes.get(parent).map(|p| p.level + 1).unwrap_or(1);
        let kind = if self.scene.is_mesh(element) {
            NodeKind::Mesh
        } else {
            NodeKind::Assembly
        };
        let visible = match self.previous.and_then(|p| p.get(&id)) {
            Some(prev) => prev.visible,
            None => self.scene.visible(element),
        };

        self.tree.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                name: display_name(self.scene, element),
                kind,
                level,
                parent: Some(parent.to_string()),
                children: Vec::new(),
                visible,
                expanded: false,
                element: Some(element),
            },
        );
        if let Some(p) = self.tree.nodes.get_mut(parent) {
            p.children.push(id.clone());
        }

        for child in self.scene.children(element) {
            self.visit(child, &id);
        }
    }

    /// Mesh, tagged assembly, or non-mesh container with at least one child.
    /// (An element with a mesh descendant always has children.)
    fn qualifies(&self, element: ElementRef) -> bool {
        self.scene.is_mesh(element)
            || self.scene.is_assembly_marker(element)
            || !self.scene.children(element).is_empty()
    }
}

/// Semantic name, then raw name, then "Unnamed Part". Kept verbatim.
fn display_name(scene: &dyn SceneGraph, element: ElementRef) -> String {
    scene
        .semantic_name(element)
        .filter(|n| !n.is_empty())
        .or_else(|| scene.raw_name(element).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| UNNAMED_PART.to_string())
}
