mod app;
mod ui;

// Re-export library modules so that `crate::state`, `crate::export`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use partview_lib::export;
pub use partview_lib::scene_graph;
pub use partview_lib::state;
pub use partview_lib::viewport;

use app::PartviewApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partview=info,partview_lib=info".into()),
        )
        .init();

    // Parse --scene <path> argument
    let initial_scene = parse_scene_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Partview - Part Outliner")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "partview",
        native_options,
        Box::new(move |cc| Ok(Box::new(PartviewApp::new(cc, initial_scene)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_scene_arg() -> Option<shared::SceneDescription> {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .windows(2)
        .find(|w| w[0] == "--scene")
        .map(|w| w[1].clone())?;

    match std::fs::read_to_string(&path) {
        Ok(json) => match serde_json::from_str::<shared::SceneDescription>(&json) {
            Ok(scene) => {
                tracing::info!("Loaded scene from {path} ({} models)", scene.models.len());
                Some(scene)
            }
            Err(e) => {
                tracing::error!("Failed to parse scene JSON from {path}: {e}");
                None
            }
        },
        Err(e) => {
            tracing::error!("Failed to read scene file {path}: {e}");
            None
        }
    }
}
