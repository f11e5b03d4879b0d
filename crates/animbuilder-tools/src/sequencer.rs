//! Clip selection cycling for the preview window.

use animbuilder_kernel::{PlaybackState, Sprite};

/// Cycles through a snapshot of a sprite's clip names.
///
/// The candidate list is taken once; later changes to the sprite's clips are
/// not reflected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSequencer {
    candidates: Vec<String>,
    current: usize,
}

impl SelectionSequencer {
    /// Sequencer over `candidates`, positioned on the first one.
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            current: 0,
        }
    }

    /// Sequencer over every clip `sprite` declares, positioned on the clip it
    /// is currently playing.
    pub fn from_sprite(sprite: &Sprite) -> Self {
        let candidates = sprite.declared_clip_names();
        let current = sprite
            .current_clip_name()
            .and_then(|name| candidates.iter().position(|c| c == name))
            .unwrap_or(0);
        Self { candidates, current }
    }

    /// Candidate clip names.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Index of the selected candidate.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Selected candidate, `None` if there are none.
    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.current).map(String::as_str)
    }

    /// Name to report on confirm; empty when there are no candidates.
    pub fn selection(&self) -> String {
        self.current().unwrap_or_default().to_string()
    }

    /// Move to the next candidate, wrapping, and play it on `sprite`.
    pub fn next(&mut self, sprite: &mut Sprite) {
        if self.step_forward() {
            self.apply(sprite);
        }
    }

    /// Move to the previous candidate, wrapping, and play it on `sprite`.
    pub fn previous(&mut self, sprite: &mut Sprite) {
        if self.step_back() {
            self.apply(sprite);
        }
    }

    fn step_forward(&mut self) -> bool {
        if self.candidates.is_empty() {
            return false;
        }
        self.current = (self.current + 1) % self.candidates.len();
        true
    }

    fn step_back(&mut self) -> bool {
        if self.candidates.is_empty() {
            return false;
        }
        let len = self.candidates.len();
        self.current = (self.current + len - 1) % len;
        true
    }

    fn apply(&self, sprite: &mut Sprite) {
        let name = &self.candidates[self.current];
        // Candidates are the sprite's own declared names.
        if let Err(e) = sprite.set_active_clip(name, PlaybackState::PlayToEnd) {
            unreachable!("sequencer selected a clip its sprite does not declare: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animbuilder_kernel::{ClipDef, SpriteDef};
    use proptest::prelude::*;

    fn sprite_with(names: &[String]) -> Sprite {
        let def = names
            .iter()
            .fold(SpriteDef::new("test"), |def, name| def.with_clip(ClipDef::strip(name.clone(), 4, 8, 8)));
        Sprite::from_def(def)
    }

    fn hero() -> Sprite {
        sprite_with(&["idle".into(), "walk".into(), "attack".into()])
    }

    #[test]
    fn test_next_wraps_scenario() {
        let mut sprite = hero();
        let mut sequencer = SelectionSequencer::from_sprite(&sprite);
        assert_eq!(sequencer.current(), Some("idle"));

        sequencer.next(&mut sprite);
        sequencer.next(&mut sprite);
        assert_eq!(sequencer.current_index(), 2);
        assert_eq!(sprite.current_clip_name(), Some("attack"));
        assert_eq!(sprite.playback_state(), PlaybackState::PlayToEnd);

        sequencer.next(&mut sprite);
        assert_eq!(sequencer.current_index(), 0);
        assert_eq!(sprite.current_clip_name(), Some("idle"));
    }

    #[test]
    fn test_starts_on_default_clip() {
        let mut def = SpriteDef::new("hero")
            .with_clip(ClipDef::strip("idle", 2, 8, 8))
            .with_clip(ClipDef::strip("walk", 2, 8, 8))
            .with_clip(ClipDef::strip("attack", 2, 8, 8));
        def.default_clip = Some("walk".into());
        let mut sprite = Sprite::from_def(def);

        let mut sequencer = SelectionSequencer::from_sprite(&sprite);
        assert_eq!(sequencer.current(), Some("walk"));
        assert_eq!(sequencer.selection(), "walk");

        sequencer.next(&mut sprite);
        assert_eq!(sprite.current_clip_name(), Some("attack"));
    }

    #[test]
    fn test_previous_from_first_wraps_to_last() {
        let mut sprite = hero();
        let mut sequencer = SelectionSequencer::from_sprite(&sprite);
        sequencer.previous(&mut sprite);
        assert_eq!(sequencer.current_index(), 2);
        assert_eq!(sprite.current_clip_name(), Some("attack"));
    }

    #[test]
    fn test_empty_candidates() {
        let mut sprite = sprite_with(&[]);
        let mut sequencer = SelectionSequencer::from_sprite(&sprite);
        sequencer.next(&mut sprite);
        sequencer.previous(&mut sprite);
        assert_eq!(sequencer.current_index(), 0);
        assert_eq!(sequencer.current(), None);
        assert_eq!(sequencer.selection(), "");
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let sprite = hero();
        let sequencer = SelectionSequencer::from_sprite(&sprite);
        drop(sprite);
        assert_eq!(sequencer.candidates(), ["idle", "walk", "attack"]);
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("clip{i}")).collect()
    }

    proptest! {
        #[test]
        fn prop_n_steps_return_to_start(n in 1usize..12, start in 0usize..12) {
            let names = names(n);
            let mut sprite = sprite_with(&names);
            let mut sequencer = SelectionSequencer::from_sprite(&sprite);
            for _ in 0..(start % n) {
                sequencer.next(&mut sprite);
            }
            let origin = sequencer.current_index();
            for _ in 0..n {
                sequencer.next(&mut sprite);
            }
            prop_assert_eq!(sequencer.current_index(), origin);
        }

        #[test]
        fn prop_previous_inverts_next(n in 1usize..12, start in 0usize..12, forward_first in any::<bool>()) {
            let names = names(n);
            let mut sprite = sprite_with(&names);
            let mut sequencer = SelectionSequencer::from_sprite(&sprite);
            for _ in 0..(start % n) {
                sequencer.next(&mut sprite);
            }
            let origin = sequencer.current_index();
            if forward_first {
                sequencer.next(&mut sprite);
                sequencer.previous(&mut sprite);
            } else {
                sequencer.previous(&mut sprite);
                sequencer.next(&mut sprite);
            }
            prop_assert_eq!(sequencer.current_index(), origin);
            prop_assert_eq!(sprite.current_clip_name(), Some(names[origin].as_str()));
        }
    }
}
