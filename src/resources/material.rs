use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::resources::color;

/// URI scheme prefix the engine uses for local files.
pub const FILE_SCHEME: &str = "file:";

/// Reference to a texture as emitted by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub uri: String,
}

impl TextureRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// The URI with a leading `file:` scheme removed.
    ///
    /// Non-file URIs are returned unchanged.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.uri.strip_prefix(FILE_SCHEME).unwrap_or(&self.uri)
    }
}

/// Material attached to a leaf shape.
///
/// Only the texture slots and the base color are read by the encoder; the
/// material is never modified after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
    textures: FxHashMap<String, Vec<TextureRef>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Vec3::ONE,
            textures: FxHashMap::default(),
        }
    }
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Appends a texture reference to `slot`.
    #[must_use]
    pub fn with_texture(mut self, slot: impl Into<String>, uri: impl Into<String>) -> Self {
        self.textures
            .entry(slot.into())
            .or_default()
            .push(TextureRef::new(uri));
        self
    }

    /// All textures bound to `slot`, in engine order.
    #[must_use]
    pub fn textures(&self, slot: &str) -> &[TextureRef] {
        self.textures.get(slot).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn first_texture(&self, slot: &str) -> Option<&TextureRef> {
        self.textures(slot).first()
    }

    /// Base color in `#RRGGBB` notation.
    #[must_use]
    pub fn color_string(&self) -> String {
        color::color_string(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_file_scheme() {
        assert_eq!(TextureRef::new("file:/tmp/a.png").display_name(), "/tmp/a.png");
        assert_eq!(TextureRef::new("memory://x.png").display_name(), "memory://x.png");
    }

    #[test]
    fn test_first_texture() {
        let m = Material::new("wall")
            .with_texture("diffuseMap", "file:/a.png")
            .with_texture("diffuseMap", "file:/b.png");
        assert_eq!(m.first_texture("diffuseMap").unwrap().uri, "file:/a.png");
        assert!(m.first_texture("normalMap").is_none());
        assert!(m.textures("normalMap").is_empty());
    }
}
