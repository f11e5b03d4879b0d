//! # Animation Builder Tools
//!
//! Sprite preview tooling built on the kernel's sprite model.
//!
//! This crate provides:
//! - Window layouts, windows and the window manager
//! - Typed observer lists and the query session lifecycle
//! - File input, message box and sprite animation preview queries
//! - The floating toolbar that chains them into the preview pipeline

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod file_query;
pub mod message_box;
pub mod observers;
pub mod query;
pub mod sequencer;
pub mod sprite_preview;
pub mod toolbar;
pub mod window;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::file_query::*;
    pub use crate::message_box::*;
    pub use crate::observers::*;
    pub use crate::query::*;
    pub use crate::sequencer::*;
    pub use crate::sprite_preview::*;
    pub use crate::toolbar::*;
    pub use crate::window::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts_resolve() {
        let factory = LayoutWindowFactory::default();
        for id in [
            layouts::TOOLBAR,
            layouts::FILE_INPUT_QUERY,
            layouts::MESSAGE_BOX,
            layouts::SELECT_SPRITE_ANIMATION,
        ] {
            assert!(factory.create(id).is_ok(), "missing builtin layout {id}");
        }
    }

    #[test]
    fn test_unknown_layout() {
        let factory = LayoutWindowFactory::default();
        assert!(factory.create("inventory").is_err());
    }
}
