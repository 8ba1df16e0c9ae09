//! Factory functions for creating test data.
//!
//! Provides helpers to construct `SceneElement` trees and `SceneDescription`
//! documents used in tests and by the agent command interface.

use shared::*;

// ── Element factories ───────────────────────────────────────────

/// Positions of the unit right triangle in the XY plane
const UNIT_TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Mesh element with one non-indexed triangle at the origin.
pub fn triangle_mesh(id: &str, name: &str) -> SceneElement {
    SceneElement {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        mesh: Some(MeshDesc {
            geometry: GeometryDesc {
                positions: UNIT_TRIANGLE.to_vec(),
                normals: None,
                indices: None,
            },
            materials: vec![],
        }),
        ..Default::default()
    }
}

/// Triangle mesh translated to `pos`.
pub fn mesh_at(id: &str, name: &str, pos: [f64; 3]) -> SceneElement {
    SceneElement {
        transform: Transform::translation(pos[0], pos[1], pos[2]),
        ..triangle_mesh(id, name)
    }
}

/// Unit square in the XY plane as two indexed triangles.
pub fn indexed_quad(id: &str, name: &str) -> SceneElement {
    SceneElement {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        mesh: Some(MeshDesc {
            geometry: GeometryDesc {
                positions: vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [0.0, 1.0, 0.0],
                ],
                normals: None,
                indices: Some(vec![0, 1, 2, 0, 2, 3]),
            },
            materials: vec![],
        }),
        ..Default::default()
    }
}

/// Container explicitly tagged as an assembly.
pub fn assembly(id: &str, name: &str, children: Vec<SceneElement>) -> SceneElement {
    SceneElement {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        assembly: true,
        children,
        ..Default::default()
    }
}

/// Plain grouping node without the assembly tag.
pub fn group(id: &str, name: &str, children: Vec<SceneElement>) -> SceneElement {
    SceneElement {
        assembly: false,
        ..assembly(id, name, children)
    }
}

// ── SceneDescription factories ──────────────────────────────────

/// Wrap models into a SceneDescription.
pub fn scene_of(models: Vec<SceneElement>) -> SceneDescription {
    SceneDescription {
        version: 1,
        materials: vec![],
        models,
    }
}

/// Empty scene.
pub fn empty_scene() -> SceneDescription {
    scene_of(vec![])
}

/// AssemblyA → {Mesh1, Mesh2}, plus Mesh3 at the top level.
pub fn sample_scene() -> SceneDescription {
    scene_of(vec![
        assembly(
            "AssemblyA",
            "AssemblyA",
            vec![triangle_mesh("Mesh1", "Mesh1"), mesh_at("Mesh2", "Mesh2", [2.0, 0.0, 0.0])],
        ),
        mesh_at("Mesh3", "Mesh3", [0.0, 0.0, 3.0]),
    ])
}

/// Chassis → {WheelFL, WheelFR, Engine → Block}.
pub fn car_scene() -> SceneDescription {
    scene_of(vec![assembly(
        "chassis",
        "Chassis",
        vec![
            mesh_at("wheel_fl", "WheelFL", [-1.0, 0.0, 1.0]),
            mesh_at("wheel_fr", "WheelFR", [1.0, 0.0, 1.0]),
            assembly("engine", "Engine", vec![indexed_quad("block", "Block")]),
        ],
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_mesh_factory() {
        let el = triangle_mesh("m", "Mesh");
        assert_eq!(el.id.as_deref(), Some("m"));
        assert!(el.is_mesh());
        assert!(el.visible);
        assert!(el.transform.is_identity());
        assert_eq!(el.mesh.unwrap().geometry.triangle_count(), 1);
    }

    #[test]
    fn test_mesh_at_factory() {
        let el = mesh_at("m", "Mesh", [1.0, 2.0, 3.0]);
        assert_eq!(el.transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(el.name.as_deref(), Some("Mesh"));
    }

    #[test]
    fn test_group_is_not_tagged() {
        assert!(assembly("a", "A", vec![]).assembly);
        assert!(!group("g", "G", vec![]).assembly);
    }

    #[test]
    fn test_scene_factories() {
        assert!(empty_scene().is_empty());
        assert_eq!(sample_scene().element_count(), 4);
        assert_eq!(car_scene().element_count(), 5);
        assert_eq!(indexed_quad("q", "Q").mesh.unwrap().geometry.triangle_count(), 2);
    }
}
