//! Geometry export: world-space triangle streams for selected nodes.
//!
//! Encoding into a concrete file format happens downstream; this module only
//! validates geometry and yields triangles lazily, one stream per output file.

use std::collections::HashSet;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene_graph::{Geometry, SceneGraph};
use crate::state::tree::{Node, NodeId, NodeKind, PartTree};
use crate::state::OutlinerState;

/// Label of a combined stream built from several roots
const COMBINED_LABEL: &str = "assembly";

/// One world-space triangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normal: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// One stream with every selected mesh
    Combine,
    /// One stream per selected root
    Separate,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("node '{0}' has no position buffer")]
    MissingGeometry(NodeId),
    #[error("node '{id}' has malformed geometry: {count} {what} is not a multiple of 3")]
    MalformedGeometry {
        id: NodeId,
        what: &'static str,
        count: usize,
    },
    #[error("node '{id}' references vertex {index}, but only {vertices} exist")]
    IndexOutOfRange {
        id: NodeId,
        index: u32,
        vertices: usize,
    },
}

/// Lazy, finite sequence of triangles with an output label
pub struct TriangleStream {
    pub label: String,
    triangles: Box<dyn Iterator<Item = Triangle>>,
}

impl Iterator for TriangleStream {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        self.triangles.next()
    }
}

impl std::fmt::Debug for TriangleStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleStream").field("label", &self.label).finish()
    }
}

/// Triangles of one mesh, transformed on the fly
struct MeshTriangles {
    geometry: Geometry,
    world: Mat4,
    next: usize,
    count: usize,
}

impl MeshTriangles {
    fn new(geometry: Geometry, world: Mat4) -> Self {
        let count = match &geometry.indices {
            Some(indices) => indices.len() / 3,
            None => geometry.positions.len() / 3,
        };
        Self {
            geometry,
            world,
            next: 0,
            count,
        }
    }

    fn vertex_index(&self, corner: usize) -> usize {
        match &self.geometry.indices {
            Some(indices) => indices[corner] as usize,
            None => corner,
        }
    }
}

impl Iterator for MeshTriangles {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        if self.next >= self.count {
            return None;
        }
        let base = self.next * 3;
        self.next += 1;

        let idx = [
            self.vertex_index(base),
            self.vertex_index(base + 1),
            self.vertex_index(base + 2),
        ];
        let [a, b, c] = idx.map(|i| self.world.transform_point3(self.geometry.positions[i]));

        // Stored normals are handed on as they are
        let normal = match &self.geometry.normals {
            Some(normals) => normals[idx[0]],
            None => (c - b).cross(a - b).normalize_or_zero(),
        };
        Some(Triangle {
            vertices: [a, b, c],
            normal,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

/// Check buffers before any stream is handed out
fn validate(id: &str, geometry: &Geometry) -> Result<(), ExportError> {
    let vertices = geometry.positions.len();
    if vertices == 0 {
        return Err(ExportError::MissingGeometry(id.to_string()));
    }
    match &geometry.indices {
        Some(indices) => {
            if indices.len() % 3 != 0 {
                return Err(ExportError::MalformedGeometry {
                    id: id.to_string(),
                    what: "indices",
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(ExportError::IndexOutOfRange {
                    id: id.to_string(),
                    index,
                    vertices,
                });
            }
        }
        None => {
            if vertices % 3 != 0 {
                return Err(ExportError::MalformedGeometry {
                    id: id.to_string(),
                    what: "positions",
                    count: vertices,
                });
            }
        }
    }
    Ok(())
}

/// Node name, or its kind label when the name is empty
fn stream_label(node: &Node) -> String {
    if node.name.is_empty() {
        node.kind.label().to_string()
    } else {
        node.name.clone()
    }
}

fn mesh_triangles(
    tree: &PartTree,
    scene: &dyn SceneGraph,
    mesh_id: &str,
) -> Result<MeshTriangles, ExportError> {
    let element = tree
        .get(mesh_id)
        .and_then(|n| n.element)
        .ok_or_else(|| ExportError::MissingGeometry(mesh_id.to_string()))?;
    let mut geometry = scene
        .geometry(element)
        .ok_or_else(|| ExportError::MissingGeometry(mesh_id.to_string()))?;
    validate(mesh_id, &geometry)?;
    if geometry
        .normals
        .as_ref()
        .is_some_and(|n| n.len() != geometry.positions.len())
    {
        tracing::debug!("Ignoring mismatched normal buffer of '{mesh_id}'");
        geometry.normals = None;
    }
    Ok(MeshTriangles::new(geometry, scene.world_transform(element)))
}

fn stream_of(
    label: String,
    tree: &PartTree,
    scene: &dyn SceneGraph,
    meshes: &[NodeId],
) -> Result<TriangleStream, ExportError> {
    let parts = meshes
        .iter()
        .map(|id| mesh_triangles(tree, scene, id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TriangleStream {
        label,
        triangles: Box::new(parts.into_iter().flatten()),
    })
}

/// Turn the given roots into triangle streams.
///
/// Each root contributes itself if it is a mesh, or every mesh below it.
/// Unknown roots are skipped; no roots gives no streams.
pub fn export_triangles(
    tree: &PartTree,
    scene: &dyn SceneGraph,
    roots: &[NodeId],
    mode: ExportMode,
) -> Result<Vec<TriangleStream>, ExportError> {
    let roots: Vec<&Node> = roots.iter().filter_map(|id| tree.get(id)).collect();
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    match mode {
        ExportMode::Combine => {
            let mut seen = HashSet::new();
            let meshes: Vec<NodeId> = roots
                .iter()
                .flat_map(|r| tree.meshes_under(&r.id))
                .filter(|id| seen.insert(id.clone()))
                .collect();
            let label = match roots.as_slice() {
                [single] => stream_label(single),
                _ => COMBINED_LABEL.to_string(),
            };
            tracing::info!("Exporting {} mesh(es) as one stream '{label}'", meshes.len());
            Ok(vec![stream_of(label, tree, scene, &meshes)?])
        }
        ExportMode::Separate => {
            let streams = roots
                .iter()
                .map(|r| stream_of(stream_label(r), tree, scene, &tree.meshes_under(&r.id)))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!("Exporting {} separate stream(s)", streams.len());
            Ok(streams)
        }
    }
}

impl OutlinerState {
    /// Export the current selection
    pub fn export_selected(
        &self,
        scene: &dyn SceneGraph,
        mode: ExportMode,
    ) -> Result<Vec<TriangleStream>, ExportError> {
        export_triangles(&self.tree, scene, self.selection.all(), mode)
    }
}

/// Whether a node would contribute anything to an export
pub fn is_exportable(tree: &PartTree, id: &str) -> bool {
    tree.get(id).is_some_and(|n| match n.kind {
        NodeKind::Mesh => true,
        NodeKind::Assembly | NodeKind::ModelRoot => !tree.meshes_under(id).is_empty(),
    })
}
