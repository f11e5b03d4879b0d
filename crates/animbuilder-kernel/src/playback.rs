//! Frame advancement for the active clip.

use crate::clip::ClipDef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a clip behaves once it runs out of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Wrap back to the first frame (0, 1, 2, 3, 0, 1, ...)
    #[default]
    Loop,
    /// Play forward once, then hold the final frame
    PlayToEnd,
    /// Do not advance at all
    Stop,
}

impl PlaybackState {
    /// Default state for a clip that becomes active without an explicit request.
    pub fn for_clip(clip: &ClipDef) -> Self {
        if clip.looping {
            Self::Loop
        } else {
            Self::PlayToEnd
        }
    }
}

/// Tracks the play position within one clip and advances it with elapsed time.
#[derive(Debug, Clone, Default)]
pub struct PlaybackDriver {
    /// Frame currently on screen.
    frame_index: usize,
    /// Time already spent on the current frame.
    elapsed: Duration,
    /// Active playback policy.
    state: PlaybackState,
}

impl PlaybackDriver {
    /// Create a driver positioned on the first frame.
    #[must_use]
    pub fn new(state: PlaybackState) -> Self {
        Self {
            frame_index: 0,
            elapsed: Duration::ZERO,
            state,
        }
    }

    /// Rewind to the first frame under a new playback state.
    pub fn reset(&mut self, state: PlaybackState) {
        *self = Self::new(state);
    }

    /// Current frame index.
    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a `PlayToEnd` clip is resting on its final frame.
    #[must_use]
    pub fn is_holding(&self, clip: &ClipDef) -> bool {
        self.state == PlaybackState::PlayToEnd
            && clip.frame_count() > 0
            && self.frame_index + 1 >= clip.frame_count()
    }

    /// Advance through `clip` by `delta`.
    ///
    /// Frameless clips and stopped playback never move.
    pub fn advance(&mut self, clip: &ClipDef, delta: Duration) {
        let frame_count = clip.frame_count();
        let frame_duration = clip.frame_duration();
        if frame_count == 0 || frame_duration.is_zero() || self.state == PlaybackState::Stop {
            return;
        }
        if self.is_holding(clip) {
            self.elapsed = Duration::ZERO;
            return;
        }

        let total = self.elapsed.as_nanos() + delta.as_nanos();
        let step = frame_duration.as_nanos();
        let frames_passed = total / step;
        let remainder = total % step;

        match self.state {
            PlaybackState::Loop => {
                let offset = (frames_passed % frame_count as u128) as usize;
                self.frame_index = (self.frame_index + offset) % frame_count;
                self.elapsed = Duration::from_nanos(remainder as u64);
            },
            PlaybackState::PlayToEnd => {
                let last = frame_count - 1;
                let target = (self.frame_index as u128 + frames_passed).min(last as u128) as usize;
                self.frame_index = target;
                self.elapsed = if target == last {
                    Duration::ZERO
                } else {
                    Duration::from_nanos(remainder as u64)
                };
            },
            PlaybackState::Stop => {},
        }
    }
}
