//! ID types for windows and controls.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for window IDs.
static WINDOW_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a window managed by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u64);

impl WindowId {
    /// Creates a new unique window ID.
    #[must_use]
    pub fn new() -> Self {
        Self(WINDOW_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a window ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Index of a control inside its window's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(u16);

impl ControlId {
    /// Creates a control ID from a layout index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the layout index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
