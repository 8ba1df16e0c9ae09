//! Keyboard shortcut handling

use eframe::egui;

use super::Workspace;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, ws: &mut Workspace) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, hide, show, isolate, select_all, fit) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::H) && !i.modifiers.shift,
            i.key_pressed(egui::Key::H) && i.modifiers.shift,
            i.key_pressed(egui::Key::I) && !i.modifiers.command,
            i.modifiers.command && i.key_pressed(egui::Key::A),
            i.key_pressed(egui::Key::F) && !i.modifiers.command,
        )
    });

    let Workspace {
        scene,
        colors,
        outliner,
        now,
        ..
    } = ws;

    // Escape: cancel drag, then deselect
    if escape {
        if outliner.drag.is_dragging() {
            outliner.drag.end();
        } else {
            outliner.clear_selection(scene, colors);
        }
    }
    // H hides the selection, Shift+H shows it
    if hide {
        outliner.hide_selected(scene);
    }
    if show {
        outliner.show_selected(scene);
    }
    // I: isolate
    if isolate {
        outliner.isolate_selected(scene);
    }
    // Ctrl+A
    if select_all {
        outliner.select_all_visible(scene, colors);
    }
    // F: frame visible geometry
    if fit {
        outliner.fit_camera(scene, *now);
    }
}
