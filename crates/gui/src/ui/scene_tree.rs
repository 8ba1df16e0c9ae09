//! Part tree panel - one row per shown node, indented by level

use egui::Ui;

use crate::app::Workspace;
use crate::export::{is_exportable, ExportMode};
use crate::state::tree::{NodeId, NodeKind, MODEL_ROOT_ID};

const INDENT: f32 = 14.0;

/// Snapshot of one row, taken before any mutation
struct Row {
    id: NodeId,
    name: String,
    kind: NodeKind,
    level: usize,
    has_children: bool,
    expanded: bool,
    visible: bool,
    effectively_visible: bool,
    selected: bool,
}

enum RowAction {
    Expand(bool),
    ToggleVisibility { bulk: bool },
    Select { additive: bool, range: bool },
    Reveal,
    ResetAppearance,
    MoveToRoot,
    Isolate,
    Export(ExportMode),
}

pub fn show(ui: &mut Ui, ws: &mut Workspace) {
    // Header with node count
    ui.horizontal(|ui| {
        ui.heading("Parts");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", ws.outliner.tree.count_kind(NodeKind::Mesh)));
        });
    });

    // Search box
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(&mut ws.search.text)
                .hint_text("Search parts...")
                .desired_width(f32::INFINITY),
        );
        if edit.changed() {
            ws.search.edited(ws.now);
        }
        if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            let query = ws.search.flush();
            ws.outliner.search(&query);
        }
    });
    ui.separator();

    if ws.outliner.tree.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak("No scene loaded");
        });
        return;
    }

    let rows = collect_rows(ws);
    let mut actions: Vec<(NodeId, RowAction)> = Vec::new();
    let mut hover_target: Option<NodeId> = None;
    let dragging = ws.outliner.drag.dragged().map(str::to_string);

    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for row in &rows {
                let resp = ui
                    .horizontal(|ui| {
                        ui.add_space(row.level as f32 * INDENT);

                        // Expand arrow
                        if row.has_children {
                            let arrow = if row.expanded { "⏷" } else { "⏵" };
                            if ui.small_button(arrow).clicked() {
                                actions.push((row.id.clone(), RowAction::Expand(!row.expanded)));
                            }
                        } else {
                            ui.add_space(18.0);
                        }

                        // Eye button, Alt applies to the whole subtree
                        let eye = if row.visible { "👁" } else { "·" };
                        if ui
                            .small_button(eye)
                            .on_hover_text("Toggle visibility (Alt: whole subtree)")
                            .clicked()
                        {
                            let bulk = ui.input(|i| i.modifiers.alt);
                            actions.push((row.id.clone(), RowAction::ToggleVisibility { bulk }));
                        }

                        let color = if !row.effectively_visible {
                            egui::Color32::from_rgb(100, 100, 100)
                        } else if row.selected {
                            egui::Color32::from_rgb(100, 200, 255)
                        } else {
                            egui::Color32::from_rgb(200, 200, 200)
                        };
                        let icon = match row.kind {
                            NodeKind::Mesh => "▣",
                            NodeKind::Assembly => "📁",
                            NodeKind::ModelRoot => "🗀",
                        };
                        ui.add(egui::SelectableLabel::new(
                            row.selected,
                            egui::RichText::new(format!("{icon} {}", row.name)).color(color),
                        ))
                        .interact(egui::Sense::click_and_drag())
                    })
                    .inner;

                if resp.clicked() {
                    let (range, additive) = ui.input(|i| (i.modifiers.shift, i.modifiers.command));
                    actions.push((row.id.clone(), RowAction::Select { additive, range }));
                }
                if resp.drag_started() {
                    ws.outliner.drag.start(row.id.clone());
                }

                // Drop target highlight
                if let Some(dragged) = &dragging {
                    if dragged != &row.id && resp.contains_pointer() {
                        hover_target = Some(row.id.clone());
                        ui.painter().rect_stroke(
                            resp.rect.expand(1.0),
                            3.0,
                            egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 200, 255)),
                            egui::StrokeKind::Outside,
                        );
                    }
                }

                resp.context_menu(|ui| {
                    row_menu(ui, ws, row, &mut actions);
                });
            }
        });

    // Finish drag
    if ws.outliner.drag.is_dragging() && ui.input(|i| i.pointer.any_released()) {
        match hover_target {
            Some(target) => {
                if let Some(outcome) = ws.outliner.drop_on(&mut ws.scene, &target, ws.now) {
                    if !outcome.rejected.is_empty() {
                        ws.status = Some(format!(
                            "Cannot move {} node(s) into their own subtree",
                            outcome.rejected.len()
                        ));
                    }
                }
            }
            None => ws.outliner.drag.end(),
        }
    }

    for (id, action) in actions {
        apply(ws, &id, action);
    }
}

fn collect_rows(ws: &Workspace) -> Vec<Row> {
    let tree = &ws.outliner.tree;
    tree.preorder()
        .into_iter()
        .filter(|id| !tree.is_filter_hidden(id))
        .filter_map(|id| {
            let node = tree.get(&id)?;
            Some(Row {
                name: node.name.clone(),
                kind: node.kind,
                // Stored levels lag behind moves until the next rebuild
                level: tree.depth(&id),
                has_children: node.has_children(),
                expanded: node.is_expanded(),
                visible: node.visible,
                effectively_visible: tree.is_effectively_visible(&id),
                selected: ws.outliner.selection.is_selected(&id),
                id,
            })
        })
        .collect()
}

fn row_menu(ui: &mut Ui, ws: &Workspace, row: &Row, actions: &mut Vec<(NodeId, RowAction)>) {
    let mut push = |ui: &mut Ui, action: RowAction| {
        actions.push((row.id.clone(), action));
        ui.close_menu();
    };

    let label = if row.visible { "Hide" } else { "Show" };
    if ui.button(label).clicked() {
        push(ui, RowAction::ToggleVisibility { bulk: false });
    }
    if ui.button("Isolate").clicked() {
        push(ui, RowAction::Isolate);
    }
    if ui.button("Reveal").clicked() {
        push(ui, RowAction::Reveal);
    }

    if row.kind == NodeKind::Mesh {
        ui.separator();
        if ui.button("Reset appearance").clicked() {
            push(ui, RowAction::ResetAppearance);
        }
    }

    if row.kind != NodeKind::ModelRoot {
        let parent = ws.outliner.tree.get(&row.id).and_then(|n| n.parent.clone());
        if parent.as_deref() != Some(MODEL_ROOT_ID) && ui.button("Move to root").clicked() {
            push(ui, RowAction::MoveToRoot);
        }
    }

    if is_exportable(&ws.outliner.tree, &row.id) {
        ui.separator();
        ui.menu_button("Export", |ui| {
            if ui.button("Combined").clicked() {
                push(ui, RowAction::Export(ExportMode::Combine));
            }
            if ui.button("Separate").clicked() {
                push(ui, RowAction::Export(ExportMode::Separate));
            }
        });
    }
}

fn apply(ws: &mut Workspace, id: &str, action: RowAction) {
    if let RowAction::Export(mode) = action {
        if !ws.outliner.selection.is_selected(id) {
            ws.outliner.select(&mut ws.scene, &ws.colors, id, false, false);
        }
        ws.export_selected(mode);
        return;
    }

    let Workspace {
        scene,
        colors,
        outliner,
        now,
        ..
    } = ws;

    match action {
        RowAction::Expand(expanded) => {
            outliner.set_expanded(id, expanded);
        }
        RowAction::ToggleVisibility { bulk } => {
            outliner.toggle_visibility(scene, id, bulk);
        }
        RowAction::Select { range: true, .. } => {
            outliner.select_range(scene, colors, id);
        }
        RowAction::Select { additive, .. } => {
            outliner.select(scene, colors, id, additive, false);
        }
        RowAction::Reveal => {
            outliner.select(scene, colors, id, false, true);
        }
        RowAction::ResetAppearance => {
            if !outliner.reset_appearance(scene, id) {
                tracing::debug!("No material snapshot for '{id}'");
            }
        }
        RowAction::MoveToRoot => {
            let outcome = outliner.move_nodes(scene, &[id.to_string()], MODEL_ROOT_ID);
            if !outcome.moved.is_empty() {
                outliner.fit_camera(scene, *now);
            }
        }
        RowAction::Isolate => {
            if !outliner.selection.is_selected(id) {
                outliner.select(scene, colors, id, false, false);
            }
            outliner.isolate_selected(scene);
        }
        RowAction::Export(_) => {}
    }
}
