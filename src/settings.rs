//! Bridge Settings
//!
//! Runtime configuration shared by every node that talks to the rule engine.
//! Settings are plain data; they can be built in code or loaded from a JSON
//! document next to the plugin.
//!
//! ```rust,ignore
//! use cga_bridge::Settings;
//!
//! let settings = Settings::from_json_str(r#"{ "cache_root": "/tmp/cga_assets" }"#)?;
//! assert_eq!(settings.uv_set_name, "map1");
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default name of the UV set the encoder writes.
pub const DEFAULT_UV_SET: &str = "map1";
/// Material slot whose first texture names the shading group.
pub const DEFAULT_DIFFUSE_SLOT: &str = "diffuseMap";
/// Script procedure invoked to create a shading group for a texture.
pub const DEFAULT_SHADING_COMMAND: &str = "createShadingGroup";

/// Configuration for encoding, materials and the asset cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory that receives staged assets (textures etc.).
    pub cache_root: PathBuf,
    /// UV set the accumulated texture coordinates are written to.
    pub uv_set_name: String,
    /// When `false` the encoder only builds geometry and never issues
    /// shading commands.
    pub setup_materials: bool,
    /// Material slot used to derive the shading group texture.
    pub diffuse_slot: String,
    /// Script procedure used by [`ScriptCommandExecutor`](crate::host::ScriptCommandExecutor).
    pub shading_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_root: std::env::temp_dir().join("cga_bridge_assets"),
            uv_set_name: DEFAULT_UV_SET.to_string(),
            setup_materials: true,
            diffuse_slot: DEFAULT_DIFFUSE_SLOT.to_string(),
            shading_command: DEFAULT_SHADING_COMMAND.to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    #[must_use]
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = root.into();
        self
    }
}
