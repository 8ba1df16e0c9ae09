// Library crate: exposes testable modules for integration tests and the agent interface.
// GUI-specific modules (app, ui) remain in the binary crate.

pub mod command;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod scene_graph;
pub mod state;

/// Bounds and camera-fit math shared by the outliner and the viewport.
pub mod viewport {
    pub mod bounds;
    pub mod camera;
}
