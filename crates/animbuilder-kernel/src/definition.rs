//! Sprite definition file format.
//!
//! Sprites are stored as TOML documents with an ordered `[[clips]]` array:
//!
//! ```toml
//! format_version = { major = 1, minor = 0, patch = 0 }
//! name = "hero"
//! sprite_sheet = "sheets/hero.png"
//! default_clip = "idle"
//!
//! [[clips]]
//! name = "idle"
//! fps = 4.0
//! frames = [{ x = 0, y = 0, width = 32, height = 32 }]
//! ```

use crate::clip::ClipDef;
use ahash::AHashSet;
use animbuilder_common::{SchemaVersion, SpriteConstructionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_format_version() -> SchemaVersion {
    SchemaVersion::SPRITE_DEF
}

fn default_scale() -> f32 {
    1.0
}

/// Complete sprite definition as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpriteDef {
    /// Format version the file was written with.
    #[serde(default = "default_format_version")]
    pub format_version: SchemaVersion,
    /// Display name.
    pub name: String,
    /// Path to the sprite sheet image, relative to the definition.
    #[serde(default)]
    pub sprite_sheet: String,
    /// Clip that plays when the sprite is created (first clip if absent).
    #[serde(default)]
    pub default_clip: Option<String>,
    /// Render scale multiplier.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Clips in declaration order.
    #[serde(default)]
    pub clips: Vec<ClipDef>,
}

impl SpriteDef {
    /// Create an empty definition with the current format version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            format_version: SchemaVersion::SPRITE_DEF,
            name: name.into(),
            sprite_sheet: String::new(),
            default_clip: None,
            scale: default_scale(),
            clips: Vec::new(),
        }
    }

    /// Builder-style clip append.
    pub fn with_clip(mut self, clip: ClipDef) -> Self {
        self.clips.push(clip);
        self
    }

    /// Parse a definition from TOML text. `uri` is only used for error reporting.
    pub fn from_toml_str(uri: &str, text: &str) -> Result<Self, SpriteConstructionError> {
        let def: Self = toml::from_str(text).map_err(|e| SpriteConstructionError::Parse {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        def.validate(uri)?;
        Ok(def)
    }

    /// Load and validate a definition from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, SpriteConstructionError> {
        let uri = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|source| SpriteConstructionError::Io { uri: uri.clone(), source })?;
        Self::from_toml_str(&uri, &text)
    }

    /// Check version compatibility and clip invariants.
    pub fn validate(&self, uri: &str) -> Result<(), SpriteConstructionError> {
        if !SchemaVersion::SPRITE_DEF.can_read(&self.format_version) {
            return Err(SpriteConstructionError::IncompatibleVersion {
                uri: uri.to_string(),
                expected: SchemaVersion::SPRITE_DEF.to_string(),
                actual: self.format_version.to_string(),
            });
        }

        let invalid = |reason: String| SpriteConstructionError::Invalid {
            uri: uri.to_string(),
            reason,
        };

        let mut seen = AHashSet::with_capacity(self.clips.len());
        for clip in &self.clips {
            if clip.name.is_empty() {
                return Err(invalid("clip with empty name".to_string()));
            }
            if !seen.insert(clip.name.as_str()) {
                return Err(invalid(format!("duplicate clip '{}'", clip.name)));
            }
            if clip.checked_frame_duration().is_none() {
                return Err(invalid(format!("clip '{}' has unusable fps {}", clip.name, clip.fps)));
            }
        }

        if let Some(default) = &self.default_clip {
            if !seen.contains(default.as_str()) {
                return Err(invalid(format!("default clip '{default}' is not declared")));
            }
        }

        Ok(())
    }
}
