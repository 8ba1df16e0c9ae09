//! Integration tests for TestHarness.
//!
//! Drives the headless outliner the way the desktop shell does: load a scene,
//! click around the tree, and check both the tree model and the scene graph.

use partview_lib::fixtures::{assembly, car_scene, mesh_at, sample_scene, scene_of, triangle_mesh};
use partview_lib::harness::TestHarness;
use partview_lib::state::tree::MODEL_ROOT_ID;
use shared::MaterialDesc;

fn car() -> TestHarness {
    let mut h = TestHarness::new();
    h.load_scene(car_scene());
    h
}

#[test]
fn test_reveal_expands_path() {
    let mut h = car();
    assert_eq!(h.shown_ids(), vec![MODEL_ROOT_ID, "chassis"]);

    h.reveal("block");
    assert_eq!(h.selected(), vec!["block"]);
    assert_eq!(
        h.shown_ids(),
        vec![MODEL_ROOT_ID, "chassis", "wheel_fl", "wheel_fr", "engine", "block"]
    );
}

#[test]
fn test_search_then_clear_keeps_expansion() {
    let mut h = car();
    h.search("WHEEL");
    assert_eq!(h.shown_ids(), vec![MODEL_ROOT_ID, "chassis", "wheel_fl", "wheel_fr"]);

    // Filtering never touches visibility
    assert!(h.is_visible("block"));
    assert!(h.is_rendered("block"));

    h.search("");
    assert_eq!(
        h.shown_ids(),
        vec![MODEL_ROOT_ID, "chassis", "wheel_fl", "wheel_fr", "engine"]
    );
}

#[test]
fn test_search_no_match_hides_everything() {
    let mut h = car();
    h.search("spoiler");
    assert!(h.shown_ids().is_empty());
    // No part name contains a space
    h.search("  ");
    assert!(h.shown_ids().is_empty());
    h.search("");
    assert_eq!(h.shown_ids(), vec![MODEL_ROOT_ID, "chassis"]);
}

#[test]
fn test_isolate_and_show_all() {
    let mut h = car();
    h.select("wheel_fl");
    h.isolate();

    assert!(h.is_rendered("wheel_fl"));
    assert!(!h.is_rendered("wheel_fr"));
    assert!(!h.is_rendered("block"));
    assert!(h.is_visible("chassis"));

    h.show_all();
    for id in ["wheel_fl", "wheel_fr", "engine", "block"] {
        assert!(h.is_rendered(id), "{id} should be rendered");
    }
}

#[test]
fn test_container_toggle_vs_bulk() {
    let mut h = car();
    h.toggle_visibility("engine");
    assert!(!h.is_visible("engine"));
    assert!(h.is_visible("block"));
    assert!(!h.is_rendered("block"));

    h.toggle_visibility("engine");
    h.toggle_subtree("engine");
    assert!(!h.is_visible("engine"));
    assert!(!h.is_visible("block"));

    h.toggle_subtree("engine");
    assert!(h.is_visible("block"));
    assert!(h.is_rendered("block"));
}

#[test]
fn test_highlight_roundtrip_through_selection() {
    let mut h = car();
    let original = h.materials_of("wheel_fl");
    let neighbour = h.materials_of("wheel_fr");

    h.select("wheel_fl");
    let lit = h.materials_of("wheel_fl");
    assert_ne!(lit, original);
    assert!(lit.iter().all(|m| !m.depth_test && !m.depth_write));

    assert_eq!(h.materials_of("wheel_fr"), neighbour);

    h.clear_selection();
    assert_eq!(h.materials_of("wheel_fl"), original);
}

#[test]
fn test_applied_color_survives_deselect() {
    let mut h = car();
    h.select("wheel_fl");
    h.apply_color("wheel_fl", [1.0, 0.0, 0.0]);
    h.clear_selection();

    let restored = h.materials_of("wheel_fl");
    assert!(!restored.is_empty());
    assert!(restored.iter().all(|m| m.color == [1.0, 0.0, 0.0]));
}

#[test]
fn test_move_rejects_cycle_and_keeps_tree() {
    let mut h = car();
    let out = h.move_nodes(&["chassis"], "engine");
    assert!(out.moved.is_empty());
    assert_eq!(out.rejected, vec!["chassis"]);
    assert_eq!(h.parent_of("chassis").as_deref(), Some(MODEL_ROOT_ID));
    assert_eq!(h.parent_of("engine").as_deref(), Some("chassis"));
}

#[test]
fn test_move_to_root_then_rebuild() {
    let mut h = car();
    let out = h.move_nodes(&["block"], MODEL_ROOT_ID);
    assert_eq!(out.moved, vec!["block"]);
    assert_eq!(h.parent_of("block").as_deref(), Some(MODEL_ROOT_ID));
    assert!(h.children_of("engine").is_empty());

    // The scene graph agrees, so a rebuild keeps the new structure
    h.rebuild();
    assert_eq!(h.parent_of("block").as_deref(), Some(MODEL_ROOT_ID));
    assert_eq!(h.children_of(MODEL_ROOT_ID), vec!["chassis", "block"]);
}

#[test]
fn test_drag_selection_moves_together() {
    let mut h = TestHarness::new();
    h.load_scene(scene_of(vec![
        assembly("A", "A", vec![triangle_mesh("m1", "M1"), triangle_mesh("m2", "M2")]),
        assembly("B", "B", vec![]),
    ]));
    h.select("m1");
    h.select_additive("m2");

    let out = h.drag_and_drop("m1", "B").unwrap();
    assert_eq!(out.target.as_deref(), Some("B"));
    assert_eq!(h.children_of("B"), vec!["m1", "m2"]);
    assert!(h.children_of("A").is_empty());
}

#[test]
fn test_drag_refits_camera() {
    let mut h = car();
    assert!(!h.outliner.camera.is_animating());

    let out = h.drag_and_drop("chassis", "block").unwrap();
    assert!(out.moved.is_empty());
    assert!(!h.outliner.camera.is_animating());

    let out = h.drag_and_drop("block", MODEL_ROOT_ID).unwrap();
    assert_eq!(out.moved, vec!["block"]);
    assert!(h.outliner.camera.is_animating());
}

#[test]
fn test_repeated_selection_keeps_material_pool() {
    let mut h = TestHarness::new();
    h.load_scene(sample_scene());
    let mesh = h.scene.find("Mesh1").unwrap();
    let original = h.materials_of("Mesh1");

    h.select("Mesh1");
    h.clear_selection();
    let slots = h.scene.material_slots(mesh);
    let pool = h.scene.material_count();

    for _ in 0..100 {
        h.select("Mesh1");
        h.clear_selection();
    }
    assert_eq!(h.scene.material_slots(mesh), slots);
    assert_eq!(h.scene.material_count(), pool);
    assert_eq!(h.materials_of("Mesh1"), original);
}

#[test]
fn test_range_select_in_display_order() {
    let mut h = TestHarness::new();
    h.load_scene(sample_scene());
    h.expand("AssemblyA");

    h.select("Mesh1");
    h.select_range("Mesh3");
    assert_eq!(h.selected(), vec!["Mesh1", "Mesh2", "Mesh3"]);
}

#[test]
fn test_centroid_follows_visibility() {
    let mut h = TestHarness::new();
    h.load_scene(scene_of(vec![
        mesh_at("a", "A", [0.0, 0.0, 0.0]),
        mesh_at("b", "B", [10.0, 0.0, 0.0]),
    ]));
    let both = h.outliner.centroid().unwrap();
    assert!((both.x - 5.5).abs() < 1e-5);

    h.toggle_visibility("b");
    let one = h.outliner.centroid().unwrap();
    assert!((one.x - 0.5).abs() < 1e-5);

    h.toggle_visibility("a");
    assert!(h.outliner.centroid().is_none());
}

#[test]
fn test_stats() {
    let h = car();
    let stats = h.stats();
    assert_eq!(stats.nodes, 6);
    assert_eq!(stats.meshes, 3);
    assert_eq!(stats.assemblies, 2);
    assert_eq!(stats.triangles, 4);
    assert_eq!(stats.materials, 1);
}

#[test]
fn test_stats_count_distinct_materials() {
    let mut desc = scene_of(vec![assembly(
        "asm",
        "Asm",
        vec![triangle_mesh("a", "A"), triangle_mesh("b", "B"), triangle_mesh("c", "C")],
    )]);
    desc.materials = vec![
        MaterialDesc {
            color: [1.0, 0.0, 0.0],
            ..Default::default()
        },
        MaterialDesc {
            color: [0.0, 1.0, 0.0],
            ..Default::default()
        },
    ];
    for (child, slot) in desc.models[0].children.iter_mut().zip([0, 1, 0]) {
        if let Some(mesh) = child.mesh.as_mut() {
            mesh.materials = vec![slot];
        }
    }
    let mut h = TestHarness::new();
    h.load_scene(desc);
    assert_eq!(h.stats().materials, 2);

    // Highlight copies are not counted
    h.select("a");
    h.select_additive("b");
    assert_eq!(h.stats().materials, 2);
}
