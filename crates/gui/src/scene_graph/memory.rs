//! In-memory scene graph built from a [`shared::SceneDescription`].
//!
//! Used by the desktop shell, the headless harness and tests. Materials live in
//! a shared pool referenced by index, so two meshes can share one material and
//! `duplicate_materials` has an observable effect.

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{SceneDescription, SceneElement, Transform};

use super::{ElementRef, Geometry, Material, SceneGraph};
use crate::viewport::bounds::{union_all, Aabb};

struct ElementData {
    id: String,
    name: Option<String>,
    semantic_name: Option<String>,
    assembly: bool,
    visible: bool,
    local: Mat4,
    mesh: Option<MeshData>,
    parent: Option<usize>,
    children: Vec<usize>,
}

struct MeshData {
    geometry: Geometry,
    /// Indices into `MemoryScene::materials`
    slots: Vec<usize>,
}

/// Scene graph stored in plain vectors
#[derive(Default)]
pub struct MemoryScene {
    elements: Vec<ElementData>,
    roots: Vec<usize>,
    materials: Vec<Material>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a description (replaces nothing, starts empty)
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Self::new();
        scene.import(desc);
        scene
    }

    /// Append the models of `desc` after the already loaded ones
    pub fn import(&mut self, desc: &SceneDescription) {
        let offset = self.materials.len();
        self.materials.extend(desc.materials.iter().map(|m| Material {
            color: m.color,
            opacity: m.opacity,
            ..Material::default()
        }));
        for model in &desc.models {
            let idx = self.add_element(model, None, offset);
            self.roots.push(idx);
        }
        tracing::debug!(
            "Imported {} model(s), scene now has {} elements",
            desc.models.len(),
            self.elements.len()
        );
    }

    fn add_element(&mut self, el: &SceneElement, parent: Option<usize>, mat_offset: usize) -> usize {
        let mesh = el.mesh.as_ref().map(|m| {
            let mut slots: Vec<usize> = m
                .materials
                .iter()
                .map(|i| i + mat_offset)
                .filter(|i| *i < self.materials.len())
                .collect();
            if slots.is_empty() {
                self.materials.push(Material::default());
                slots.push(self.materials.len() - 1);
            }
            MeshData {
                geometry: Geometry {
                    positions: m.geometry.positions.iter().map(|p| Vec3::from_array(*p)).collect(),
                    normals: m
                        .geometry
                        .normals
                        .as_ref()
                        .map(|ns| ns.iter().map(|n| Vec3::from_array(*n)).collect()),
                    indices: m.geometry.indices.clone(),
                },
                slots,
            }
        });

        let idx = self.elements.len();
        self.elements.push(ElementData {
            id: el
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: el.name.clone(),
            semantic_name: el.semantic_name.clone(),
            assembly: el.assembly,
            visible: el.visible,
            local: local_matrix(&el.transform),
            mesh,
            parent,
            children: Vec::new(),
        });

        for child in &el.children {
            let child_idx = self.add_element(child, Some(idx), mat_offset);
            self.elements[idx].children.push(child_idx);
        }
        idx
    }

    /// Look up an element by id
    pub fn find(&self, id: &str) -> Option<ElementRef> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .map(|i| ElementRef(i as u64))
    }

    pub fn parent_of(&self, element: ElementRef) -> Option<ElementRef> {
        self.get(element)?.parent.map(|p| ElementRef(p as u64))
    }

    /// Material pool indices used by a mesh element
    pub fn material_slots(&self, element: ElementRef) -> Vec<usize> {
        self.get(element)
            .and_then(|e| e.mesh.as_ref())
            .map(|m| m.slots.clone())
            .unwrap_or_default()
    }

    /// Visibility after ANDing with every ancestor (what the renderer draws)
    pub fn is_rendered(&self, element: ElementRef) -> bool {
        let mut cur = Some(element.0 as usize);
        while let Some(i) = cur {
            match self.elements.get(i) {
                Some(e) if e.visible => cur = e.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Size of the material pool, private copies included
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn get(&self, element: ElementRef) -> Option<&ElementData> {
        self.elements.get(element.0 as usize)
    }

    fn get_mut(&mut self, element: ElementRef) -> Option<&mut ElementData> {
        self.elements.get_mut(element.0 as usize)
    }

    fn is_descendant_or_self(&self, candidate: usize, ancestor: usize) -> bool {
        let mut cur = Some(candidate);
        while let Some(i) = cur {
            if i == ancestor {
                return true;
            }
            cur = self.elements.get(i).and_then(|e| e.parent);
        }
        false
    }

    fn collect_mesh_bounds(&self, idx: usize, out: &mut Vec<Aabb>) {
        let Some(el) = self.elements.get(idx) else {
            return;
        };
        if let Some(mesh) = &el.mesh {
            let world = self.world_transform(ElementRef(idx as u64));
            if let Some(b) = Aabb::from_points(
                mesh.geometry
                    .positions
                    .iter()
                    .map(|p| world.transform_point3(*p)),
            ) {
                out.push(b);
            }
        }
        for &child in &el.children {
            self.collect_mesh_bounds(child, out);
        }
    }
}

fn local_matrix(t: &Transform) -> Mat4 {
    let rot = Quat::from_euler(
        EulerRot::XYZ,
        (t.rotation[0] as f32).to_radians(),
        (t.rotation[1] as f32).to_radians(),
        (t.rotation[2] as f32).to_radians(),
    );
    Mat4::from_scale_rotation_translation(
        Vec3::new(t.scale[0] as f32, t.scale[1] as f32, t.scale[2] as f32),
        rot,
        Vec3::new(t.position[0] as f32, t.position[1] as f32, t.position[2] as f32),
    )
}

impl SceneGraph for MemoryScene {
    fn roots(&self) -> Vec<ElementRef> {
        self.roots.iter().map(|&i| ElementRef(i as u64)).collect()
    }

    fn children(&self, element: ElementRef) -> Vec<ElementRef> {
        self.get(element)
            .map(|e| e.children.iter().map(|&i| ElementRef(i as u64)).collect())
            .unwrap_or_default()
    }

    fn element_id(&self, element: ElementRef) -> String {
        self.get(element).map(|e| e.id.clone()).unwrap_or_default()
    }

    fn semantic_name(&self, element: ElementRef) -> Option<String> {
        self.get(element)?.semantic_name.clone()
    }

    fn raw_name(&self, element: ElementRef) -> Option<String> {
        self.get(element)?.name.clone()
    }

    fn is_mesh(&self, element: ElementRef) -> bool {
        self.get(element).is_some_and(|e| e.mesh.is_some())
    }

    fn is_assembly_marker(&self, element: ElementRef) -> bool {
        self.get(element).is_some_and(|e| e.assembly)
    }

    fn visible(&self, element: ElementRef) -> bool {
        self.get(element).is_some_and(|e| e.visible)
    }

    fn set_visible(&mut self, element: ElementRef, visible: bool) {
        if let Some(e) = self.get_mut(element) {
            e.visible = visible;
        }
    }

    fn materials(&self, element: ElementRef) -> Vec<Material> {
        self.material_slots(element)
            .into_iter()
            .filter_map(|i| self.materials.get(i).copied())
            .collect()
    }

    fn set_materials(&mut self, element: ElementRef, materials: Vec<Material>) {
        for (slot, material) in self.material_slots(element).into_iter().zip(materials) {
            if let Some(m) = self.materials.get_mut(slot) {
                *m = material;
            }
        }
    }

    fn duplicate_materials(&mut self, element: ElementRef) {
        let slots = self.material_slots(element);
        let mut new_slots = Vec::with_capacity(slots.len());
        for slot in slots {
            let copy = self.materials.get(slot).copied().unwrap_or_default();
            self.materials.push(copy);
            new_slots.push(self.materials.len() - 1);
        }
        if let Some(mesh) = self.get_mut(element).and_then(|e| e.mesh.as_mut()) {
            mesh.slots = new_slots;
        }
    }

    fn world_bounds(&self, element: ElementRef) -> Option<Aabb> {
        let mut boxes = Vec::new();
        self.collect_mesh_bounds(element.0 as usize, &mut boxes);
        union_all(boxes)
    }

    fn world_transform(&self, element: ElementRef) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(element.0 as usize);
        while let Some(i) = cur {
            match self.elements.get(i) {
                Some(e) => {
                    m = e.local * m;
                    cur = e.parent;
                }
                None => break,
            }
        }
        m
    }

    fn geometry(&self, element: ElementRef) -> Option<Geometry> {
        let mesh = self.get(element)?.mesh.as_ref()?;
        if mesh.geometry.positions.is_empty() {
            return None;
        }
        Some(mesh.geometry.clone())
    }

    fn reparent(&mut self, element: ElementRef, new_parent: Option<ElementRef>) {
        let idx = element.0 as usize;
        if idx >= self.elements.len() {
            return;
        }
        if let Some(p) = new_parent {
            let p = p.0 as usize;
            if p >= self.elements.len() || self.is_descendant_or_self(p, idx) {
                tracing::warn!("Ignoring reparent of element {idx} under its own subtree");
                return;
            }
        }

        // Keep the world transform, like attaching in a typical renderer
        let world = self.world_transform(element);
        let parent_world = new_parent
            .map(|p| self.world_transform(p))
            .unwrap_or(Mat4::IDENTITY);

        match self.elements[idx].parent {
            Some(old) => self.elements[old].children.retain(|&c| c != idx),
            None => self.roots.retain(|&r| r != idx),
        }
        match new_parent {
            Some(p) => self.elements[p.0 as usize].children.push(idx),
            None => self.roots.push(idx),
        }
        let el = &mut self.elements[idx];
        el.parent = new_parent.map(|p| p.0 as usize);
        el.local = parent_world.inverse() * world;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assembly, mesh_at, scene_of, triangle_mesh};

    fn sample() -> MemoryScene {
        MemoryScene::from_description(&scene_of(vec![assembly(
            "asm",
            "Assembly",
            vec![triangle_mesh("m1", "Mesh1"), mesh_at("m2", "Mesh2", [5.0, 0.0, 0.0])],
        )]))
    }

    #[test]
    fn test_structure() {
        let s = sample();
        assert_eq!(s.roots().len(), 1);
        let asm = s.find("asm").unwrap();
        assert_eq!(s.children(asm).len(), 2);
        assert!(s.is_mesh(s.find("m1").unwrap()));
        assert!(!s.is_mesh(asm));
    }

    #[test]
    fn test_world_bounds_include_translation() {
        let s = sample();
        let b = s.world_bounds(s.find("asm").unwrap()).unwrap();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max.x, 6.0);
    }

    #[test]
    fn test_is_rendered_follows_ancestors() {
        let mut s = sample();
        let asm = s.find("asm").unwrap();
        let m1 = s.find("m1").unwrap();
        assert!(s.is_rendered(m1));
        s.set_visible(asm, false);
        assert!(s.visible(m1));
        assert!(!s.is_rendered(m1));
    }

    #[test]
    fn test_duplicate_materials_detaches_slot() {
        let mut s = sample();
        let m1 = s.find("m1").unwrap();
        let before = s.material_slots(m1);
        s.duplicate_materials(m1);
        let after = s.material_slots(m1);
        assert_eq!(before.len(), after.len());
        assert_ne!(before, after);
        assert_eq!(s.materials(m1)[0], Material::default());
    }

    #[test]
    fn test_reparent_preserves_world_transform() {
        let mut s = sample();
        let m2 = s.find("m2").unwrap();
        let before = s.world_transform(m2);
        s.reparent(m2, None);
        assert_eq!(s.roots().len(), 2);
        assert!(s.parent_of(m2).is_none());
        let after = s.world_transform(m2);
        assert!(before.abs_diff_eq(after, 1e-5));
    }

    #[test]
    fn test_reparent_into_own_subtree_ignored() {
        let mut s = sample();
        let asm = s.find("asm").unwrap();
        let m1 = s.find("m1").unwrap();
        s.reparent(asm, Some(m1));
        assert!(s.parent_of(asm).is_none());
        assert_eq!(s.roots(), vec![asm]);
    }

    #[test]
    fn test_import_shifts_material_indices() {
        let red = shared::MaterialDesc {
            color: [1.0, 0.0, 0.0],
            ..Default::default()
        };
        let blue = shared::MaterialDesc {
            color: [0.0, 0.0, 1.0],
            ..Default::default()
        };
        let with_material = |id: &str, desc: shared::MaterialDesc| {
            let mut el = triangle_mesh(id, id);
            if let Some(mesh) = el.mesh.as_mut() {
                mesh.materials = vec![0];
            }
            let mut scene = scene_of(vec![el]);
            scene.materials = vec![desc];
            scene
        };

        let mut s = MemoryScene::from_description(&with_material("a", red));
        s.import(&with_material("b", blue));
        assert_eq!(s.material_count(), 2);
        let b = s.find("b").unwrap();
        assert_eq!(s.material_slots(b), vec![1]);
        assert_eq!(s.materials(b)[0].color, [0.0, 0.0, 1.0]);
        assert_eq!(s.materials(s.find("a").unwrap())[0].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_ids_get_uuid() {
        let mut el = triangle_mesh("x", "X");
        el.id = None;
        let s = MemoryScene::from_description(&scene_of(vec![el]));
        let id = s.element_id(s.roots()[0]);
        assert_eq!(id.len(), 36);
    }
}
