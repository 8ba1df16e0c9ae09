//! Toolbar actions and UI

use egui::Ui;

use crate::app::Workspace;
use crate::export::ExportMode;

pub fn show(ui: &mut Ui, ws: &mut Workspace) {
    let has_selection = !ws.outliner.selection.is_empty();
    let has_tree = !ws.outliner.tree.is_empty();

    ui.horizontal(|ui| {
        let Workspace {
            scene,
            colors,
            outliner,
            now,
            ..
        } = &mut *ws;

        // ── Visibility ───────────────────────────────────────
        if ui
            .add_enabled(has_selection, egui::Button::new("Hide"))
            .on_hover_text("Hide selected (H)")
            .clicked()
        {
            outliner.hide_selected(scene);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Show"))
            .on_hover_text("Show selected (Shift+H)")
            .clicked()
        {
            outliner.show_selected(scene);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Isolate"))
            .on_hover_text("Hide everything except the selection (I)")
            .clicked()
        {
            outliner.isolate_selected(scene);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Invert"))
            .on_hover_text("Flip visibility of the selection")
            .clicked()
        {
            outliner.invert_selected_visibility(scene);
        }
        if ui.add_enabled(has_tree, egui::Button::new("Show all")).clicked() {
            outliner.show_all(scene);
        }

        ui.separator();

        // ── Selection ────────────────────────────────────────
        if ui
            .add_enabled(has_tree, egui::Button::new("Select visible"))
            .on_hover_text("Select every visible part (Ctrl+A)")
            .clicked()
        {
            outliner.select_all_visible(scene, colors);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Clear"))
            .on_hover_text("Clear selection (Esc)")
            .clicked()
        {
            outliner.clear_selection(scene, colors);
        }

        ui.separator();

        // ── View ─────────────────────────────────────────────
        if ui
            .add_enabled(has_tree, egui::Button::new("Fit"))
            .on_hover_text("Frame visible geometry (F)")
            .clicked()
        {
            outliner.fit_camera(scene, *now);
        }
        let mut overlay = outliner.overlay_enabled();
        if ui.checkbox(&mut overlay, "Bounds").changed() {
            outliner.set_bounds_overlay(scene, overlay);
            outliner.settings.view.bounds_overlay = overlay;
        }
    });

    ui.horizontal(|ui| {
        // ── Export ───────────────────────────────────────────
        if ui
            .add_enabled(has_selection, egui::Button::new("Export combined"))
            .on_hover_text("One triangle stream for the whole selection")
            .clicked()
        {
            ws.export_selected(ExportMode::Combine);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Export separate"))
            .on_hover_text("One triangle stream per selected node")
            .clicked()
        {
            ws.export_selected(ExportMode::Separate);
        }
    });
}
