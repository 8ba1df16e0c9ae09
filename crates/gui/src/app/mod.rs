//! Main application module

mod keyboard;
mod search;
mod styles;

use eframe::egui;
use shared::SceneDescription;

use crate::export::ExportMode;
use crate::scene_graph::{AppliedColors, MemoryScene};
use crate::state::{OutlinerState, Settings};
use crate::ui::{preview, scene_tree, status_bar, toolbar};
pub use search::SearchDebounce;

/// Everything the panels operate on
pub struct Workspace {
    pub scene: MemoryScene,
    pub colors: AppliedColors,
    pub outliner: OutlinerState,
    pub search: SearchDebounce,
    /// Last user-facing message (export result, errors)
    pub status: Option<String>,
    /// Frame time in seconds, refreshed every update
    pub now: f64,
}

impl Workspace {
    pub fn new(settings: Settings) -> Self {
        Self {
            scene: MemoryScene::new(),
            colors: AppliedColors::default(),
            outliner: OutlinerState::new(settings),
            search: SearchDebounce::default(),
            status: None,
            now: 0.0,
        }
    }

    /// Replace the scene and frame it
    pub fn load(&mut self, desc: &SceneDescription) {
        self.scene = MemoryScene::from_description(desc);
        self.colors = AppliedColors::default();
        self.search = SearchDebounce::default();
        self.outliner.load(&mut self.scene);
        self.outliner.fit_camera(&self.scene, self.now);
        let stats = self.outliner.stats(&self.scene);
        self.status = Some(format!(
            "Loaded {} parts ({} triangles)",
            stats.meshes, stats.triangles
        ));
    }

    /// Export the selection and report what was produced
    pub fn export_selected(&mut self, mode: ExportMode) {
        let result = self.outliner.export_selected(&self.scene, mode);
        self.status = Some(match result {
            Ok(streams) if streams.is_empty() => "Nothing selected to export".to_string(),
            Ok(streams) => {
                let parts: Vec<String> = streams
                    .into_iter()
                    .map(|s| {
                        let label = s.label.clone();
                        format!("{label}: {} triangles", s.count())
                    })
                    .collect();
                format!("Exported {}", parts.join(", "))
            }
            Err(e) => {
                tracing::warn!("Export failed: {e}");
                format!("Export failed: {e}")
            }
        });
    }
}

/// Main application
pub struct PartviewApp {
    ws: Workspace,
    /// Settings snapshot last written to disk
    saved_settings: String,
}

impl PartviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_scene: Option<SceneDescription>) -> Self {
        let settings = Settings::load();
        let saved_settings = serde_json::to_string(&settings).unwrap_or_default();
        styles::configure_styles(&cc.egui_ctx);

        let mut ws = Workspace::new(settings);
        if let Some(desc) = initial_scene {
            ws.load(&desc);
        }

        Self { ws, saved_settings }
    }
}

impl eframe::App for PartviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ws.now = ctx.input(|i| i.time);

        // Persist settings when the toolbar changed them
        let current = serde_json::to_string(&self.ws.outliner.settings).unwrap_or_default();
        if current != self.saved_settings {
            self.ws.outliner.settings.save();
            self.saved_settings = current;
        }

        let debounce = self.ws.outliner.settings.search.debounce_ms;
        if let Some(query) = self.ws.search.poll(self.ws.now, debounce) {
            self.ws.outliner.search(&query);
        }

        keyboard::handle_keyboard(ctx, &mut self.ws);

        self.ws.outliner.camera.tick(self.ws.now);
        if self.ws.outliner.camera.is_animating() || self.ws.search.is_pending() {
            ctx.request_repaint();
        }

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.ws);
            });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.ws);
            });

        // ── Left panel: Part tree ────────────────────────────
        egui::SidePanel::left("scene_tree")
            .default_width(260.0)
            .width_range(160.0..=480.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                scene_tree::show(ui, &mut self.ws);
            });

        // ── Central panel: preview ───────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_rgb(24, 24, 28)))
            .show(ctx, |ui| {
                preview::show(ui, &self.ws);
            });
    }
}
