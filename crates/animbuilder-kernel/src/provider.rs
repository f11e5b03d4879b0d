//! Sprite construction from sprite definition files.

use crate::definition::SpriteDef;
use crate::sprite::Sprite;
use animbuilder_common::SpriteConstructionError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Scheme prefix for paths relative to the asset base directory.
pub const LOCAL_SCHEME: &str = "local:///";

/// Something that can turn a sprite location into a [`Sprite`].
pub trait SpriteProvider {
    /// Construct a sprite from `uri`.
    fn construct(&self, uri: &Path) -> Result<Sprite, SpriteConstructionError>;
}

/// Loads TOML sprite definitions relative to a base directory.
#[derive(Debug, Clone)]
pub struct TomlSpriteProvider {
    base_directory: PathBuf,
}

impl TomlSpriteProvider {
    /// Create a provider rooted at `base_directory`.
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    /// Base directory relative locations are resolved against.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Resolve `uri` to a filesystem path.
    ///
    /// `local:///a/b` and relative paths are joined onto the base directory;
    /// absolute paths are used as given.
    pub fn resolve(&self, uri: &Path) -> PathBuf {
        if let Some(local) = uri.to_str().and_then(|s| s.strip_prefix(LOCAL_SCHEME)) {
            return self.base_directory.join(local);
        }
        if uri.is_absolute() {
            uri.to_path_buf()
        } else {
            self.base_directory.join(uri)
        }
    }
}

impl SpriteProvider for TomlSpriteProvider {
    fn construct(&self, uri: &Path) -> Result<Sprite, SpriteConstructionError> {
        let path = self.resolve(uri);
        let def = SpriteDef::load_from_file(&path)?;
        info!(
            sprite = %def.name,
            clips = def.clips.len(),
            "Loaded sprite from {}",
            path.display()
        );
        Ok(Sprite::from_def(def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIME: &str = r#"
        name = "slime"

        [[clips]]
        name = "bounce"
        frames = [
            { x = 0, y = 0, width = 8, height = 8 },
            { x = 8, y = 0, width = 8, height = 8 },
        ]
    "#;

    #[test]
    fn test_resolve() {
        let provider = TomlSpriteProvider::new("/assets");
        assert_eq!(
            provider.resolve(Path::new("local:///ui/cursor.sprite.toml")),
            PathBuf::from("/assets/ui/cursor.sprite.toml")
        );
        assert_eq!(
            provider.resolve(Path::new("npc/slime.toml")),
            PathBuf::from("/assets/npc/slime.toml")
        );
        assert_eq!(provider.resolve(Path::new("/tmp/x.toml")), PathBuf::from("/tmp/x.toml"));
    }

    #[test]
    fn test_construct() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("slime.toml"), SLIME).expect("write");

        let provider = TomlSpriteProvider::new(dir.path());
        let sprite = provider.construct(Path::new("slime.toml")).expect("construct");
        assert_eq!(sprite.name(), "slime");
        assert_eq!(sprite.declared_clip_names(), ["bounce"]);
    }

    #[test]
    fn test_construct_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.toml"), "[[clips]\nname=").expect("write");

        let provider = TomlSpriteProvider::new(dir.path());
        let err = provider.construct(Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, SpriteConstructionError::Parse { .. }));
    }
}
