//! Sprite animation preview window.
//!
//! Shows a sprite in a viewport, lets the operator cycle through its clips and
//! reports the chosen clip name on okay.

use crate::observers::Observers;
use crate::query::{QueryOutcome, QuerySession, QueryState};
use crate::sequencer::SelectionSequencer;
use crate::window::{layouts, ControlKind, UiEvent, Window, WindowFactory, WindowManager};
use animbuilder_common::{ControlId, WindowConstructionError, WindowId};
use animbuilder_kernel::{ClipCursor, Sprite, SpriteFrame};
use std::time::Duration;

/// Scale applied to tick time before it reaches the sprite.
pub const PREVIEW_TIME_SCALE: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct PreviewControls {
    viewport: ControlId,
    animation: ControlId,
    next: ControlId,
    last: ControlId,
    okay: ControlId,
    cancel: ControlId,
}

impl PreviewControls {
    fn resolve(window: &Window) -> Result<Self, WindowConstructionError> {
        Ok(Self {
            viewport: window.resolve("spriteViewport", ControlKind::Viewport)?,
            animation: window.resolve("lblAnimation", ControlKind::Label)?,
            next: window.resolve("btnNext", ControlKind::Button)?,
            last: window.resolve("btnLast", ControlKind::Button)?,
            okay: window.resolve("btnOkay", ControlKind::Button)?,
            cancel: window.resolve("btnCancel", ControlKind::Button)?,
        })
    }
}

/// What the viewport should draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView<'a> {
    /// Sprite sheet image path
    pub sprite_sheet: &'a str,
    /// Frame to draw, `None` for a frameless clip
    pub frame: Option<&'a SpriteFrame>,
    /// Render scale
    pub scale: f32,
}

/// Preview query that owns the sprite for its whole lifetime.
#[derive(Debug)]
pub struct SelectSpriteAnimationQuery {
    session: QuerySession<String>,
    controls: PreviewControls,
    sprite: Sprite,
    sequencer: SelectionSequencer,
    time_scale: f32,
}

impl SelectSpriteAnimationQuery {
    /// Open the preview window, centered, taking ownership of `sprite`.
    pub fn create(
        windows: &mut WindowManager,
        factory: &dyn WindowFactory,
        sprite: Sprite,
        time_scale: f32,
    ) -> Result<Self, WindowConstructionError> {
        let mut window = factory.create(layouts::SELECT_SPRITE_ANIMATION)?;
        let controls = PreviewControls::resolve(&window)?;
        window.set_title(sprite.name());
        window.set_text(controls.animation, sprite.active_clip_cursor().display());

        let id = windows.add_window(window);
        windows.center(id);

        Ok(Self {
            session: QuerySession::new(id),
            controls,
            sequencer: SelectionSequencer::from_sprite(&sprite),
            sprite,
            time_scale,
        })
    }

    /// Window owned by the query.
    pub fn window(&self) -> WindowId {
        self.session.window()
    }

    /// Lifecycle state.
    pub fn state(&self) -> QueryState {
        self.session.state()
    }

    /// Listener registry for the chosen clip.
    pub fn observers(&mut self) -> &mut Observers<QueryOutcome<String>> {
        self.session.observers()
    }

    /// Previewed sprite.
    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Clip selection state.
    pub fn sequencer(&self) -> &SelectionSequencer {
        &self.sequencer
    }

    /// Position of the clip on screen.
    pub fn cursor(&self) -> ClipCursor {
        self.sprite.active_clip_cursor()
    }

    /// Viewport control the sprite is drawn into.
    pub fn viewport(&self) -> ControlId {
        self.controls.viewport
    }

    /// What the viewport should draw.
    pub fn view(&self) -> SpriteView<'_> {
        SpriteView {
            sprite_sheet: self.sprite.sprite_sheet(),
            frame: self.sprite.current_frame(),
            scale: self.sprite.scale(),
        }
    }

    /// Route a UI event addressed to this query's window.
    pub fn handle_event(&mut self, event: &UiEvent) {
        let Some(pressed) = event.pressed() else {
            return;
        };

        if pressed == self.controls.next {
            self.next();
        } else if pressed == self.controls.last {
            self.previous();
        } else if pressed == self.controls.okay {
            self.confirm();
        } else if pressed == self.controls.cancel {
            self.cancel();
        }
    }

    /// Play the next clip.
    pub fn next(&mut self) {
        if self.session.is_open() {
            self.sequencer.next(&mut self.sprite);
        }
    }

    /// Play the previous clip.
    pub fn previous(&mut self) {
        if self.session.is_open() {
            self.sequencer.previous(&mut self.sprite);
        }
    }

    /// Raise the selected clip name (empty if the sprite has no clips).
    pub fn confirm(&mut self) -> bool {
        let selection = self.sequencer.selection();
        self.session.confirm(selection)
    }

    /// Raise cancellation.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    /// Refresh the clip label, then advance the sprite by the damped `delta`.
    pub fn update(&mut self, windows: &mut WindowManager, delta: Duration) {
        if self.session.is_disposed() {
            return;
        }
        if let Some(window) = windows.get_mut(self.window()) {
            window.set_text(self.controls.animation, self.cursor().display());
        }
        self.sprite.advance(delta.mul_f32(self.time_scale));
    }

    /// Release the window. Safe to call repeatedly.
    pub fn dispose(&mut self, windows: &mut WindowManager) -> bool {
        self.session.dispose(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::LayoutWindowFactory;
    use animbuilder_kernel::{ClipDef, PlaybackState, SpriteDef};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn hero() -> Sprite {
        Sprite::from_def(
            SpriteDef::new("hero")
                .with_clip(ClipDef::strip("idle", 2, 16, 16).with_fps(8.0))
                .with_clip(ClipDef::strip("walk", 4, 16, 16).with_fps(8.0))
                .with_clip(ClipDef::strip("attack", 3, 16, 16).with_fps(8.0)),
        )
    }

    fn open(windows: &mut WindowManager, sprite: Sprite) -> SelectSpriteAnimationQuery {
        SelectSpriteAnimationQuery::create(windows, &LayoutWindowFactory::default(), sprite, PREVIEW_TIME_SCALE)
            .expect("builtin layout")
    }

    fn press(query: &mut SelectSpriteAnimationQuery, control: ControlId) {
        let event = UiEvent::ButtonPressed {
            window: query.window(),
            control,
        };
        query.handle_event(&event);
    }

    fn label(windows: &WindowManager, query: &SelectSpriteAnimationQuery) -> String {
        windows
            .get(query.window())
            .map(|w| w.text(query.controls.animation).to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_buttons_cycle_clips() {
        let mut windows = WindowManager::new((800, 600));
        let mut query = open(&mut windows, hero());
        let (next, last) = (query.controls.next, query.controls.last);

        press(&mut query, next);
        press(&mut query, next);
        assert_eq!(query.sequencer().current_index(), 2);
        assert_eq!(query.cursor().name, "attack");

        press(&mut query, next);
        assert_eq!(query.cursor().name, "idle");

        press(&mut query, last);
        assert_eq!(query.cursor().name, "attack");
        assert_eq!(query.sprite().playback_state(), PlaybackState::PlayToEnd);
    }

    #[test]
    fn test_update_labels_then_advances_damped() {
        let mut windows = WindowManager::new((800, 600));
        let mut query = open(&mut windows, hero());
        let next = query.controls.next;
        press(&mut query, next);

        // 1300ms of ticks is 130ms of sprite time: one frame at 8 fps.
        query.update(&mut windows, Duration::from_millis(1300));
        assert_eq!(label(&windows, &query), "walk:1/4");
        assert_eq!(query.cursor().frame_index, 1);

        for _ in 0..10 {
            query.update(&mut windows, Duration::from_millis(1300));
        }
        assert_eq!(query.cursor().frame_index, 3);
        assert_eq!(label(&windows, &query), "walk:4/4");
    }

    #[test]
    fn test_confirm_reports_selected_clip_without_disposing() {
        let mut windows = WindowManager::new((800, 600));
        let mut query = open(&mut windows, hero());
        let chosen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&chosen);
        query.observers().add(move |outcome| sink.borrow_mut().push(outcome.clone()));

        let (next, okay) = (query.controls.next, query.controls.okay);
        press(&mut query, next);
        press(&mut query, okay);

        assert_eq!(*chosen.borrow(), [QueryOutcome::Okay("walk".to_string())]);
        assert!(windows.contains(query.window()));
        assert_eq!(query.state(), QueryState::Confirmed);
    }

    #[test]
    fn test_confirm_empty_sprite_reports_empty_name() {
        let mut windows = WindowManager::new((800, 600));
        let mut query = open(&mut windows, Sprite::from_def(SpriteDef::new("ghost")));
        let chosen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&chosen);
        query.observers().add(move |outcome| *sink.borrow_mut() = Some(outcome.clone()));

        query.next();
        query.previous();
        query.update(&mut windows, Duration::from_millis(500));
        assert_eq!(label(&windows, &query), ":-/0");
        assert!(query.view().frame.is_none());

        query.confirm();
        assert_eq!(*chosen.borrow(), Some(QueryOutcome::Okay(String::new())));
    }

    #[test]
    fn test_cancel_and_dispose() {
        let mut windows = WindowManager::new((800, 600));
        let mut query = open(&mut windows, hero());
        let cancel = query.controls.cancel;
        press(&mut query, cancel);
        assert_eq!(query.state(), QueryState::Cancelled);

        assert!(query.dispose(&mut windows));
        assert!(!query.dispose(&mut windows));
        assert!(windows.is_empty());

        query.update(&mut windows, Duration::from_secs(1));
        assert_eq!(query.cursor().frame_index, 0);
    }
}
