//! Loaded animated sprite with a single active clip.

use crate::clip::{ClipCursor, ClipDef, SpriteFrame};
use crate::definition::SpriteDef;
use crate::playback::{PlaybackDriver, PlaybackState};
use ahash::AHashMap;
use animbuilder_common::UnknownClip;
use std::time::Duration;
use tracing::debug;

/// An animated sprite: ordered clips plus the play position of the active one.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    sprite_sheet: String,
    scale: f32,
    clips: Vec<ClipDef>,
    clip_index: AHashMap<String, usize>,
    active: Option<usize>,
    driver: PlaybackDriver,
}

impl Sprite {
    /// Build a sprite from an already validated definition.
    ///
    /// The sprite starts on `default_clip`, or the first declared clip, in the
    /// clip's own looping mode.
    pub fn from_def(def: SpriteDef) -> Self {
        let clip_index = def
            .clips
            .iter()
            .enumerate()
            .map(|(i, clip)| (clip.name.clone(), i))
            .collect::<AHashMap<_, _>>();

        let active = def
            .default_clip
            .as_ref()
            .and_then(|name| clip_index.get(name).copied())
            .or_else(|| (!def.clips.is_empty()).then_some(0));

        let driver = active
            .map(|i| PlaybackDriver::new(PlaybackState::for_clip(&def.clips[i])))
            .unwrap_or_default();

        Self {
            name: def.name,
            sprite_sheet: def.sprite_sheet,
            scale: def.scale,
            clips: def.clips,
            clip_index,
            active,
            driver,
        }
    }

    /// Sprite display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sprite sheet image path.
    pub fn sprite_sheet(&self) -> &str {
        &self.sprite_sheet
    }

    /// Render scale multiplier.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Clip names in declaration order.
    pub fn declared_clip_names(&self) -> Vec<String> {
        self.clips.iter().map(|clip| clip.name.clone()).collect()
    }

    /// Name of the active clip, if the sprite has any.
    pub fn current_clip_name(&self) -> Option<&str> {
        self.active_clip().map(|clip| clip.name.as_str())
    }

    /// Switch to `name`, rewinding to its first frame.
    pub fn set_active_clip(&mut self, name: &str, state: PlaybackState) -> Result<(), UnknownClip> {
        let index = self.clip_index.get(name).copied().ok_or_else(|| UnknownClip {
            sprite: self.name.clone(),
            clip: name.to_string(),
        })?;

        debug!(sprite = %self.name, clip = name, ?state, "Switching clip");
        self.active = Some(index);
        self.driver.reset(state);
        Ok(())
    }

    /// Advance the active clip by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        if let Some(index) = self.active {
            self.driver.advance(&self.clips[index], delta);
        }
    }

    /// Play position of the active clip.
    pub fn active_clip_cursor(&self) -> ClipCursor {
        match self.active_clip() {
            Some(clip) => ClipCursor {
                name: clip.name.clone(),
                frame_index: self.driver.frame_index(),
                frame_count: clip.frame_count(),
            },
            None => ClipCursor::default(),
        }
    }

    /// Frame to draw, or `None` if the active clip has no frames.
    pub fn current_frame(&self) -> Option<&SpriteFrame> {
        self.active_clip()
            .and_then(|clip| clip.frames.get(self.driver.frame_index()))
    }

    /// Playback state of the active clip.
    pub fn playback_state(&self) -> PlaybackState {
        self.driver.state()
    }

    fn active_clip(&self) -> Option<&ClipDef> {
        self.active.map(|i| &self.clips[i])
    }
}
