//! Error types for the animation builder.

use thiserror::Error;

/// Top-level error type for builder operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Sprite could not be constructed
    #[error("Sprite error: {0}")]
    Sprite(#[from] SpriteConstructionError),

    /// Window could not be constructed
    #[error("Window error: {0}")]
    Window(#[from] WindowConstructionError),

    /// Tool session errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// A command script line could not be parsed
    #[error("Script error at line {line}: {reason}")]
    Script {
        /// 1-based line number
        line: usize,
        /// Parser message
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A clip name was requested that the sprite does not declare.
///
/// Callers that sourced the name from the sprite itself treat this as a
/// logic defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Sprite '{sprite}' has no animation clip named '{clip}'")]
pub struct UnknownClip {
    /// Name of the sprite that was queried
    pub sprite: String,
    /// Requested clip name
    pub clip: String,
}

/// Errors raised while turning a sprite file into a sprite.
#[derive(Debug, Error)]
pub enum SpriteConstructionError {
    /// Sprite file could not be read
    #[error("Failed to read sprite '{uri}': {source}")]
    Io {
        /// Resolved location of the sprite file
        uri: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Sprite file is not a valid sprite definition
    #[error("Failed to parse sprite '{uri}': {reason}")]
    Parse {
        /// Resolved location of the sprite file
        uri: String,
        /// Parser message
        reason: String,
    },

    /// Sprite file was written by an incompatible format version
    #[error("Sprite '{uri}' has format version {actual}, expected {expected}")]
    IncompatibleVersion {
        /// Resolved location of the sprite file
        uri: String,
        /// Version this build understands
        expected: String,
        /// Version found in the file
        actual: String,
    },

    /// Sprite definition parsed but is semantically invalid
    #[error("Invalid sprite '{uri}': {reason}")]
    Invalid {
        /// Resolved location of the sprite file
        uri: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors raised while building a window from a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowConstructionError {
    /// No layout is registered under the requested id
    #[error("Unknown window layout '{0}'")]
    UnknownLayout(String),

    /// A layout does not declare a control a behavior needs
    #[error("Layout '{layout}' has no control named '{control}'")]
    NoSuchControl {
        /// Layout id
        layout: String,
        /// Missing control name
        control: String,
    },

    /// A control exists but has a different kind than expected
    #[error("Control '{control}' in layout '{layout}' is a {actual}, expected a {expected}")]
    WrongControlKind {
        /// Layout id
        layout: String,
        /// Control name
        control: String,
        /// Expected control kind
        expected: String,
        /// Declared control kind
        actual: String,
    },

    /// Layout source could not be loaded
    #[error("Failed to load window layouts: {0}")]
    LayoutSource(String),
}

/// Errors raised by the toolbar session.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A preview pipeline is already open
    #[error("A preview session is already active")]
    PipelineActive,

    /// The toolbar has been disposed
    #[error("The toolbar has been disposed")]
    Disposed,

    /// An input command arrived while no window could receive it
    #[error("No window is open")]
    NoWindowOpen,

    /// The chosen file could not be turned into a sprite
    #[error(transparent)]
    Sprite(#[from] SpriteConstructionError),

    /// A window for the next stage could not be built
    #[error(transparent)]
    Window(#[from] WindowConstructionError),
}

/// Result type alias for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;
