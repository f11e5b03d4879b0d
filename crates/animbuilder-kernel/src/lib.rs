//! # Animation Builder Kernel
//!
//! Sprite model used by the preview tools:
//! - Clip definitions and the clip cursor
//! - Playback driver (loop, play-to-end, stop)
//! - Sprite handle with clip switching
//! - TOML sprite definitions and the sprite provider

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clip;
pub mod definition;
pub mod playback;
pub mod provider;
pub mod sprite;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clip::*;
    pub use crate::definition::*;
    pub use crate::playback::*;
    pub use crate::provider::*;
    pub use crate::sprite::*;
}

pub use prelude::*;
