//! Collaborator interface to the scene graph / rendering library.
//!
//! The outliner never owns renderables. It reads structure and state through
//! [`SceneGraph`] and pushes visibility, materials and reparent requests back
//! through the same trait.

mod memory;

pub use memory::MemoryScene;

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::viewport::bounds::Aabb;

/// Opaque handle to an element of the external scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u64);

/// Per-slot material state of a renderable
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// RGB in 0..1
    pub color: [f32; 3],
    pub opacity: f32,
    pub depth_test: bool,
    pub depth_write: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [0.7, 0.7, 0.72],
            opacity: 1.0,
            depth_test: true,
            depth_write: true,
        }
    }
}

/// Triangulated geometry in the element's local space
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub indices: Option<Vec<u32>>,
}

pub trait SceneGraph {
    /// Roots of all currently loaded models, in load order
    fn roots(&self) -> Vec<ElementRef>;
    fn children(&self, element: ElementRef) -> Vec<ElementRef>;
    fn element_id(&self, element: ElementRef) -> String;
    fn semantic_name(&self, element: ElementRef) -> Option<String>;
    fn raw_name(&self, element: ElementRef) -> Option<String>;
    fn is_mesh(&self, element: ElementRef) -> bool;
    /// Explicit "this is an assembly" tag, honored even when empty
    fn is_assembly_marker(&self, element: ElementRef) -> bool;

    fn visible(&self, element: ElementRef) -> bool;
    fn set_visible(&mut self, element: ElementRef, visible: bool);

    fn materials(&self, element: ElementRef) -> Vec<Material>;
    fn set_materials(&mut self, element: ElementRef, materials: Vec<Material>);
    /// Give the element private copies of its materials so later edits do not
    /// leak into other elements sharing them
    fn duplicate_materials(&mut self, element: ElementRef);

    /// World-space bounds of the element's subtree
    fn world_bounds(&self, element: ElementRef) -> Option<Aabb>;
    fn world_transform(&self, element: ElementRef) -> Mat4;
    fn geometry(&self, element: ElementRef) -> Option<Geometry>;

    /// Detach and attach under `new_parent` (`None` = scene root)
    fn reparent(&mut self, element: ElementRef, new_parent: Option<ElementRef>);
}

/// Source of user-applied persistent colors (material editor)
pub trait MaterialManager {
    fn applied_color(&self, id: &str) -> Option<[f32; 3]>;
}

/// No material manager attached
impl MaterialManager for () {
    fn applied_color(&self, _id: &str) -> Option<[f32; 3]> {
        None
    }
}

/// Applied colors keyed by node id
#[derive(Default, Debug, Clone)]
pub struct AppliedColors {
    colors: HashMap<String, [f32; 3]>,
}

impl AppliedColors {
    pub fn apply(&mut self, id: impl Into<String>, color: [f32; 3]) {
        self.colors.insert(id.into(), color);
    }
}

impl MaterialManager for AppliedColors {
    fn applied_color(&self, id: &str) -> Option<[f32; 3]> {
        self.colors.get(id).copied()
    }
}
