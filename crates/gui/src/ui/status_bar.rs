use egui::Ui;

use crate::app::Workspace;

pub fn show(ui: &mut Ui, ws: &Workspace) {
    ui.horizontal(|ui| {
        let stats = ws.outliner.stats(&ws.scene);
        ui.weak(format!(
            "Parts: {}  Assemblies: {}  Triangles: {}  Materials: {}",
            stats.meshes, stats.assemblies, stats.triangles, stats.materials
        ));

        ui.separator();

        let sel = ws.outliner.selection.count();
        if sel > 0 {
            ui.label(format!("Selected: {sel}"));
        } else {
            ui.weak("Ready");
        }

        if let Some(c) = ws.outliner.centroid() {
            ui.separator();
            ui.weak(format!("Center: ({:.2}, {:.2}, {:.2})", c.x, c.y, c.z));
        }

        if let Some(status) = &ws.status {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 200, 100), status);
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak("Partview v0.1");
        });
    });
}
