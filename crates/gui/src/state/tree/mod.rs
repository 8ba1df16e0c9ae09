//! Part tree (node model)
//!
//! Flat id → node map. Children are owned forward edges (ordered id lists),
//! parents are id back-references used for O(1) ancestor walks.

mod builder;
mod reparent;
mod search;

pub use builder::build_tree;
pub use reparent::MoveOutcome;

use std::collections::{HashMap, HashSet};

use crate::scene_graph::ElementRef;

/// Node identifier (stable id from the scene graph)
pub type NodeId = String;

/// Reserved id of the synthetic root
pub const MODEL_ROOT_ID: &str = "__model_root__";
/// Display name of the synthetic root
pub const MODEL_ROOT_NAME: &str = "Model";
/// Name used when an element has neither a semantic nor a raw name
pub const UNNAMED_PART: &str = "Unnamed Part";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Owns renderable triangulated geometry
    Mesh,
    /// Non-mesh container
    Assembly,
    /// Synthetic root aggregating everything loaded
    ModelRoot,
}

impl NodeKind {
    /// Whether the node can receive children by reparenting
    pub fn is_container(&self) -> bool {
        match self {
            NodeKind::Mesh => false,
            NodeKind::Assembly | NodeKind::ModelRoot => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Mesh => "part",
            NodeKind::Assembly | NodeKind::ModelRoot => "assembly",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Depth from the model root (root = 0). Refreshed by rebuilds only.
    pub level: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub visible: bool,
    /// Stored expand flag, see [`Node::is_expanded`]
    pub expanded: bool,
    /// Handle into the scene graph, None for the model root
    pub element: Option<ElementRef>,
}

impl Node {
    /// Expanded only counts for nodes that actually have children
    pub fn is_expanded(&self) -> bool {
        self.expanded && !self.children.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The derived part/assembly tree
#[derive(Default, Clone, Debug)]
pub struct PartTree {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) root: Option<NodeId>,
    /// Nodes suppressed by the search filter (distinct from `visible`)
    pub(crate) filter_hidden: HashSet<NodeId>,
}

impl PartTree {
    /// An empty tree ("no model loaded")
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref().and_then(|r| self.nodes.get(r))
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.nodes.get(id).and_then(|n| n.parent.clone());
        while let Some(p) = cur {
            // A corrupted chain must not loop forever
            if out.contains(&p) {
                break;
            }
            cur = self.nodes.get(&p).and_then(|n| n.parent.clone());
            out.push(p);
        }
        out
    }

    /// Distance from the top of the tree, following current parent links
    pub fn depth(&self, id: &str) -> usize {
        self.ancestors(id).len()
    }

    /// True if `ancestor` is `id` or lies on its ancestor chain
    pub fn is_self_or_ancestor(&self, ancestor: &str, id: &str) -> bool {
        id == ancestor || self.ancestors(id).iter().any(|a| a == ancestor)
    }

    /// All descendants in pre-order, excluding `id` itself
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(id) {
            for child in &node.children {
                self.preorder_into(child, &mut out);
            }
        }
        out
    }

    /// Whole tree in parent-before-children order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if let Some(root) = &self.root {
            self.preorder_into(root, &mut out);
        }
        out
    }

    fn preorder_into(&self, id: &str, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push(node.id.clone());
        for child in &node.children {
            self.preorder_into(child, out);
        }
    }

    /// Own flag ANDed with every ancestor's flag
    pub fn is_effectively_visible(&self, id: &str) -> bool {
        match self.nodes.get(id) {
            Some(node) => {
                node.visible
                    && self
                        .ancestors(id)
                        .iter()
                        .all(|a| self.nodes.get(a).is_some_and(|n| n.visible))
            }
            None => false,
        }
    }

    /// Suppressed by the current search/collapse filter
    pub fn is_filter_hidden(&self, id: &str) -> bool {
        self.filter_hidden.contains(id)
    }

    /// Set the expand flag. Leaves cannot be expanded. Returns true if the
    /// stored flag changed.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.expanded != expanded && (!expanded || node.has_children()) => {
                node.expanded = expanded;
                true
            }
            _ => false,
        }
    }

    /// Expand every ancestor of `id` (nothing is collapsed). Returns the ids
    /// whose flag changed.
    pub fn reveal(&mut self, id: &str) -> Vec<NodeId> {
        let mut changed = Vec::new();
        for ancestor in self.ancestors(id) {
            if self.set_expanded(&ancestor, true) {
                changed.push(ancestor);
            }
        }
        changed
    }

    /// Mesh nodes of a subtree (the node itself if it is a mesh), pre-order
    pub fn meshes_under(&self, id: &str) -> Vec<NodeId> {
        let mut ids = vec![id.to_string()];
        ids.extend(self.descendants(id));
        ids.into_iter()
            .filter(|i| self.nodes.get(i).is_some_and(|n| n.kind == NodeKind::Mesh))
            .collect()
    }

    /// `id → expanded` for every node, used to carry state across rebuilds
    pub fn expanded_state(&self) -> HashMap<NodeId, bool> {
        self.nodes
            .iter()
            .map(|(id, n)| (id.clone(), n.expanded))
            .collect()
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }
}
