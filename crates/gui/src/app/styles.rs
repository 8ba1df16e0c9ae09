//! Application style configuration

use eframe::egui;

/// Dark theme tuned for a dense tree panel
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(3);

    // Tight rows
    style.spacing.item_spacing = egui::vec2(4.0, 2.0);
    style.spacing.button_padding = egui::vec2(6.0, 2.0);
    style.spacing.menu_margin = egui::Margin::same(4);

    style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 34);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(40, 80, 140);

    ctx.set_style(style);
}
