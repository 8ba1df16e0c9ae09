//! Integration tests for geometry export through the harness.

use partview_lib::export::{ExportError, ExportMode};
use partview_lib::fixtures::{assembly, car_scene, indexed_quad, mesh_at, scene_of};
use partview_lib::harness::TestHarness;
use shared::{GeometryDesc, MeshDesc, SceneElement, Transform};

fn approx(a: glam::Vec3, b: glam::Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn test_export_applies_world_transform() {
    let mut h = TestHarness::new();
    h.load_scene(scene_of(vec![SceneElement {
        transform: Transform::translation(0.0, 0.0, 5.0),
        ..assembly("asm", "Asm", vec![mesh_at("m", "M", [1.0, 0.0, 0.0])])
    }]));
    h.select("m");

    let streams = h.export(ExportMode::Combine).unwrap();
    let tri = streams[0].1[0];
    assert!(approx(tri.vertices[0], glam::Vec3::new(1.0, 0.0, 5.0)));
    assert!(approx(tri.vertices[1], glam::Vec3::new(2.0, 0.0, 5.0)));
    assert!(approx(tri.vertices[2], glam::Vec3::new(1.0, 1.0, 5.0)));
}

#[test]
fn test_export_after_move_keeps_world_position() {
    let mut h = TestHarness::new();
    h.load_scene(scene_of(vec![
        SceneElement {
            transform: Transform::translation(10.0, 0.0, 0.0),
            ..assembly("far", "Far", vec![mesh_at("m", "M", [1.0, 0.0, 0.0])])
        },
        assembly("near", "Near", vec![]),
    ]));
    h.move_nodes(&["m"], "near");
    assert_eq!(h.parent_of("m").as_deref(), Some("near"));

    h.select("m");
    let streams = h.export(ExportMode::Combine).unwrap();
    assert!(approx(streams[0].1[0].vertices[0], glam::Vec3::new(11.0, 0.0, 0.0)));
}

#[test]
fn test_export_overlapping_selection_combines_once() {
    let mut h = TestHarness::new();
    h.load_scene(car_scene());
    h.select("chassis");
    h.select_additive("block");

    let combined = h.export(ExportMode::Combine).unwrap();
    assert_eq!(combined.len(), 1);
    // 2 wheels + quad, block counted once
    assert_eq!(combined[0].1.len(), 4);

    let separate = h.export(ExportMode::Separate).unwrap();
    let labels: Vec<&str> = separate.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["Chassis", "Block"]);
    assert_eq!(separate[0].1.len(), 4);
    assert_eq!(separate[1].1.len(), 2);
}

#[test]
fn test_export_face_normals() {
    let mut h = TestHarness::new();
    h.load_scene(scene_of(vec![indexed_quad("q", "Quad")]));
    h.select("q");
    let streams = h.export(ExportMode::Combine).unwrap();
    for tri in &streams[0].1 {
        assert!(approx(tri.normal, glam::Vec3::Z));
    }
}

#[test]
fn test_export_malformed_geometry_fails_before_streaming() {
    let mut h = TestHarness::new();
    let broken = SceneElement {
        id: Some("broken".into()),
        name: Some("Broken".into()),
        mesh: Some(MeshDesc {
            geometry: GeometryDesc {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normals: None,
                indices: Some(vec![0, 1, 7]),
            },
            materials: vec![],
        }),
        ..Default::default()
    };
    h.load_scene(scene_of(vec![indexed_quad("ok", "Ok"), broken]));
    h.select("ok");
    h.select_additive("broken");

    let err = h.export(ExportMode::Combine).unwrap_err();
    assert!(matches!(err, ExportError::IndexOutOfRange { index: 7, .. }));
}

#[test]
fn test_export_nothing_selected() {
    let mut h = TestHarness::new();
    h.load_scene(car_scene());
    assert!(h.export(ExportMode::Separate).unwrap().is_empty());
}
