//! JSON command protocol for scripted/agent-driven outliner manipulation.

use serde::{Deserialize, Serialize};
use shared::SceneDescription;

use crate::export::ExportMode;
use crate::harness::TestHarness;

/// A command an agent can execute against the harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Replace the loaded scene.
    LoadScene {
        scene: SceneDescription,
        /// Append to the loaded models instead of replacing them
        #[serde(default)]
        import: bool,
    },
    /// Rebuild the tree from the scene graph.
    Rebuild,
    /// Select a node.
    Select {
        id: String,
        #[serde(default)]
        additive: bool,
        #[serde(default)]
        reveal: bool,
    },
    /// Select from the anchor to a node.
    SelectRange {
        id: String,
    },
    /// Clear selection.
    ClearSelection,
    /// Flip visibility of one node, or of its subtree with `bulk`.
    ToggleVisibility {
        id: String,
        #[serde(default)]
        bulk: bool,
    },
    HideSelected,
    ShowSelected,
    /// Show only the selection (with ancestors and subtrees).
    Isolate,
    /// Hide the selection, show everything else.
    Invert,
    ShowAll,
    /// Reparent nodes under a target.
    Move {
        ids: Vec<String>,
        target: String,
    },
    /// Filter the tree by name.
    Search {
        query: String,
    },
    SetExpanded {
        id: String,
        expanded: bool,
    },
    /// Export the selection as triangle streams.
    Export {
        mode: ExportMode,
    },
    /// Inspect the tree: list all nodes.
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn selection_data(harness: &TestHarness) -> serde_json::Value {
    serde_json::json!({ "selected": harness.selected() })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::LoadScene { scene, import } => {
            if import {
                harness.import_scene(scene);
            } else {
                harness.load_scene(scene);
            }
            CommandResponse::ok_with_data(serde_json::json!({ "node_count": harness.node_count() }))
        }

        AgentCommand::Rebuild => {
            harness.rebuild();
            CommandResponse::ok_with_data(serde_json::json!({ "node_count": harness.node_count() }))
        }

        AgentCommand::Select {
            id,
            additive,
            reveal,
        } => {
            harness
                .outliner
                .select(&mut harness.scene, &harness.colors, &id, additive, reveal);
            CommandResponse::ok_with_data(selection_data(harness))
        }

        AgentCommand::SelectRange { id } => {
            harness.select_range(&id);
            CommandResponse::ok_with_data(selection_data(harness))
        }

        AgentCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::ToggleVisibility { id, bulk } => {
            let changes = harness
                .outliner
                .toggle_visibility(&mut harness.scene, &id, bulk);
            CommandResponse::ok_with_data(serde_json::json!({ "changed": changes.visibility }))
        }

        AgentCommand::HideSelected => {
            harness.hide_selected();
            CommandResponse::ok()
        }

        AgentCommand::ShowSelected => {
            harness.show_selected();
            CommandResponse::ok()
        }

        AgentCommand::Isolate => {
            harness.isolate();
            CommandResponse::ok()
        }

        AgentCommand::Invert => {
            harness.invert();
            CommandResponse::ok()
        }

        AgentCommand::ShowAll => {
            harness.show_all();
            CommandResponse::ok()
        }

        AgentCommand::Move { ids, target } => {
            let outcome = harness
                .outliner
                .move_nodes(&mut harness.scene, &ids, &target);
            CommandResponse::ok_with_data(serde_json::json!({
                "target": outcome.target,
                "moved": outcome.moved,
                "rejected": outcome.rejected,
            }))
        }

        AgentCommand::Search { query } => {
            harness.search(&query);
            CommandResponse::ok_with_data(serde_json::json!({ "shown": harness.shown_ids() }))
        }

        AgentCommand::SetExpanded { id, expanded } => {
            harness.outliner.set_expanded(&id, expanded);
            CommandResponse::ok_with_data(serde_json::json!({ "shown": harness.shown_ids() }))
        }

        AgentCommand::Export { mode } => match harness.export(mode) {
            Ok(streams) => {
                let streams: Vec<serde_json::Value> = streams
                    .iter()
                    .map(|(label, triangles)| {
                        serde_json::json!({
                            "label": label,
                            "triangle_count": triangles.len(),
                        })
                    })
                    .collect();
                CommandResponse::ok_with_data(serde_json::json!({ "streams": streams }))
            }
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Inspect => {
            let tree = &harness.outliner.tree;
            let nodes: Vec<serde_json::Value> = tree
                .preorder()
                .iter()
                .filter_map(|id| tree.get(id))
                .map(|node| {
                    serde_json::json!({
                        "id": node.id,
                        "name": node.name,
                        "kind": node.kind.label(),
                        "level": tree.depth(&node.id),
                        "parent": node.parent,
                        "visible": node.visible,
                        "expanded": node.is_expanded(),
                        "filtered": tree.is_filter_hidden(&node.id),
                        "selected": harness.outliner.selection.is_selected(&node.id),
                    })
                })
                .collect();
            let centroid = harness.outliner.centroid().map(|c| c.to_array());
            CommandResponse::ok_with_data(serde_json::json!({
                "node_count": nodes.len(),
                "nodes": nodes,
                "stats": harness.stats(),
                "centroid": centroid,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
