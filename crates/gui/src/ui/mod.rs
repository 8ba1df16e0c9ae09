pub mod preview;
pub mod scene_tree;
pub mod status_bar;
pub mod toolbar;
