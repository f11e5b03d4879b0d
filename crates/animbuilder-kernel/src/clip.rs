//! Animation clips and the cursor that reports playback position.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Frames per second used when a clip does not specify one.
pub const DEFAULT_CLIP_FPS: f32 = 8.0;

/// A single frame in a sprite sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteFrame {
    /// X position in the sprite sheet (pixels)
    pub x: u32,
    /// Y position in the sprite sheet (pixels)
    pub y: u32,
    /// Width of the frame (pixels)
    pub width: u32,
    /// Height of the frame (pixels)
    pub height: u32,
}

impl SpriteFrame {
    /// Create a new frame at the given position with the given size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

fn default_fps() -> f32 {
    DEFAULT_CLIP_FPS
}

fn default_looping() -> bool {
    true
}

/// A named, ordered sequence of frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipDef {
    /// Clip name, unique within its sprite.
    pub name: String,
    /// Frames per second.
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Whether the clip loops when it becomes active without an explicit playback state.
    #[serde(default = "default_looping")]
    pub looping: bool,
    /// Frames in playback order.
    #[serde(default)]
    pub frames: Vec<SpriteFrame>,
}

impl ClipDef {
    /// Create a looping clip with the default frame rate.
    pub fn new(name: impl Into<String>, frames: Vec<SpriteFrame>) -> Self {
        Self {
            name: name.into(),
            fps: DEFAULT_CLIP_FPS,
            looping: true,
            frames,
        }
    }

    /// Create a clip of `count` frames laid out as a horizontal strip.
    pub fn strip(name: impl Into<String>, count: u32, width: u32, height: u32) -> Self {
        let frames = (0..count)
            .map(|i| SpriteFrame::new(i * width, 0, width, height))
            .collect();
        Self::new(name, frames)
    }

    /// Builder-style frame rate override.
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Number of frames in the clip.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Time each frame stays on screen, or zero when `fps` has no usable
    /// frame time.
    pub fn frame_duration(&self) -> Duration {
        self.checked_frame_duration().unwrap_or(Duration::ZERO)
    }

    /// Frame time, `None` unless it is a positive `Duration`.
    pub fn checked_frame_duration(&self) -> Option<Duration> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / f64::from(self.fps))
            .ok()
            .filter(|duration| !duration.is_zero())
    }
}

/// Snapshot of the active clip's play position.
///
/// `frame_index` is only meaningful when `frame_count > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipCursor {
    /// Active clip name (empty when the sprite has no clips)
    pub name: String,
    /// Zero-based index of the frame on screen
    pub frame_index: usize,
    /// Total frames in the clip
    pub frame_count: usize,
}

impl ClipCursor {
    /// Whether the clip has no frames to show.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// One-based frame number, or `None` for a frameless clip.
    pub fn current_frame(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.frame_index + 1)
    }

    /// Total frames in the clip.
    pub fn total_frames(&self) -> usize {
        self.frame_count
    }

    /// Label text in the form `name:frame/total`.
    ///
    /// Frameless clips render as `name:-/0`.
    pub fn display(&self) -> String {
        match self.current_frame() {
            Some(frame) => format!("{}:{}/{}", self.name, frame, self.frame_count),
            None => format!("{}:-/0", self.name),
        }
    }
}

impl std::fmt::Display for ClipCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
