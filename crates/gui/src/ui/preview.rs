//! Wireframe preview of visible parts
//!
//! Orthographic projection onto the XY plane, centered on the camera target
//! and scaled by the camera distance.

use egui::{Color32, Pos2, Rect, Stroke, Ui};
use glam::Vec3;

use crate::app::Workspace;
use crate::export::{export_triangles, ExportMode};
use crate::scene_graph::SceneGraph;
use crate::state::tree::NodeKind;
use crate::viewport::bounds::Aabb;
use crate::viewport::camera::CameraPose;

pub fn show(ui: &mut Ui, ws: &Workspace) {
    let rect = ui.available_rect_before_wrap();
    let painter = ui.painter_at(rect);
    let pose = ws.outliner.camera.pose();
    let to_screen = |p: Vec3| project(p, &pose, rect);

    let tree = &ws.outliner.tree;
    let mut plain = Vec::new();
    let mut highlighted = Vec::new();
    for id in tree.preorder() {
        let Some(node) = tree.get(&id) else { continue };
        if node.kind != NodeKind::Mesh || !tree.is_effectively_visible(&id) {
            continue;
        }
        if ws.outliner.highlight.is_highlighted(&id) {
            highlighted.push(node);
        } else {
            plain.push(node);
        }
    }

    // Highlighted parts last so they stay on top
    for (nodes, width) in [(plain, 1.0), (highlighted, 1.6)] {
        for node in nodes {
            let color = node
                .element
                .and_then(|e| ws.scene.materials(e).first().copied())
                .map(|m| to_color32(m.color, m.opacity))
                .unwrap_or(Color32::LIGHT_GRAY);
            let stroke = Stroke::new(width, color);

            let streams = match export_triangles(
                tree,
                &ws.scene,
                std::slice::from_ref(&node.id),
                ExportMode::Combine,
            ) {
                Ok(s) => s,
                Err(e) => {
                    tracing::debug!("Preview skipped '{}': {e}", node.id);
                    continue;
                }
            };
            for tri in streams.into_iter().flatten() {
                let [a, b, c] = tri.vertices.map(to_screen);
                painter.line_segment([a, b], stroke);
                painter.line_segment([b, c], stroke);
                painter.line_segment([c, a], stroke);
            }
        }
    }

    if let Some(bounds) = ws.outliner.overlay() {
        draw_bounds(&painter, bounds, &pose, rect);
    }

    if tree.is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Start with --scene <file.json>",
            egui::FontId::proportional(14.0),
            Color32::from_gray(120),
        );
    }
}

fn project(p: Vec3, pose: &CameraPose, rect: Rect) -> Pos2 {
    let scale = rect.height().min(rect.width()) / pose.distance.max(f32::EPSILON);
    let d = p - pose.target;
    Pos2::new(rect.center().x + d.x * scale, rect.center().y - d.y * scale)
}

fn draw_bounds(painter: &egui::Painter, bounds: &Aabb, pose: &CameraPose, rect: Rect) {
    let a = project(bounds.min, pose, rect);
    let b = project(bounds.max, pose, rect);
    painter.rect_stroke(
        Rect::from_two_pos(a, b),
        0.0,
        Stroke::new(1.0, Color32::from_rgb(255, 200, 100)),
        egui::StrokeKind::Middle,
    );
}

fn to_color32(rgb: [f32; 3], opacity: f32) -> Color32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(c(rgb[0]), c(rgb[1]), c(rgb[2]), c(opacity))
}
