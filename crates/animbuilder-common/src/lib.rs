//! # Animation Builder Common
//!
//! Shared types for the animation builder crates:
//! - Error taxonomy (clip lookup, sprite construction, window construction)
//! - ID types for windows and controls
//! - Version information for file formats
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
