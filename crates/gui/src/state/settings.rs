//! Application settings

use serde::{Deserialize, Serialize};

/// Selection highlight settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Highlight color RGB
    pub color: [u8; 3],
    /// Share of the highlight color in the blend (0.0 - 1.0)
    pub mix: f32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            color: [0, 220, 255],
            mix: 0.3,
        }
    }
}

impl HighlightSettings {
    /// Blend an original color toward the highlight color
    pub fn blend(&self, original: [f32; 3]) -> [f32; 3] {
        let mix = self.mix.clamp(0.0, 1.0);
        let keep = 1.0 - mix;
        let hl = self.color.map(|c| c as f32 / 255.0);
        [
            original[0] * keep + hl[0] * mix,
            original[1] * keep + hl[1] * mix,
            original[2] * keep + hl[2] * mix,
        ]
    }
}

/// Tree search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Delay between the last keystroke and filtering
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { debounce_ms: 250 }
    }
}

/// View settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Camera fit animation length
    pub fit_duration_ms: u64,
    /// Show the bounding box of visible geometry
    pub bounds_overlay: bool,
    /// Expand the model root after loading a scene
    pub expand_root_on_load: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fit_duration_ms: 500,
            bounds_overlay: false,
            expand_root_on_load: true,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

impl Settings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "partview", "partview")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring invalid settings file {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(dir) = path.parent() {
                if std::fs::create_dir_all(dir).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_70_30() {
        let h = HighlightSettings {
            color: [255, 0, 0],
            mix: 0.3,
        };
        let c = h.blend([0.0, 1.0, 0.0]);
        assert!((c[0] - 0.3).abs() < 1e-6);
        assert!((c[1] - 0.7).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
    }

    #[test]
    fn test_partial_settings_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{"search": {"debounce_ms": 100}}"#).unwrap();
        assert_eq!(s.search.debounce_ms, 100);
        assert_eq!(s.view.fit_duration_ms, 500);
        assert_eq!(s.highlight.color, [0, 220, 255]);
    }
}
