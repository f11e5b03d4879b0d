//! Floating toolbar: entry point of the sprite preview tool.
//!
//! The toolbar owns every open stage in an arena. Stage listeners only forward
//! outcomes onto a channel; the toolbar drains that channel after each event
//! and disposes or chains stages from there, so no stage is torn down while it
//! is still raising.
//!
//! Pipeline: file select -> sprite construction -> animation preview. A failed
//! sprite construction ends the pipeline with a message box.

use crate::file_query::{FileInputQuery, FileInputQueryMode};
use crate::message_box::MessageBox;
use crate::query::{QueryOutcome, QueryState};
use crate::sprite_preview::{SelectSpriteAnimationQuery, PREVIEW_TIME_SCALE};
use crate::window::{layouts, ControlKind, UiEvent, WindowFactory, WindowManager};
use animbuilder_common::{ControlId, ToolError, WindowId};
use animbuilder_kernel::SpriteProvider;
use crossbeam_channel::{unbounded, Receiver, Sender};
use slotmap::{new_key_type, SlotMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Prompt shown by the sprite file query.
pub const SELECT_SPRITE_PROMPT: &str = "Select a sprite file to preview:";

/// Message shown when the chosen file is not a usable sprite.
pub const SPRITE_CONSTRUCTION_FAILED: &str =
    "Error constructing sprite. View log for more details.";

new_key_type! {
    /// Handle to a stage owned by the toolbar
    pub struct StageId;
}

/// A modal unit owned by the toolbar.
#[derive(Debug)]
pub enum Stage {
    /// Sprite file prompt
    FileSelect(FileInputQuery),
    /// Sprite animation preview
    AnimationPreview(SelectSpriteAnimationQuery),
    /// Dismissible message
    Notice(MessageBox),
}

impl Stage {
    /// Window owned by the stage.
    pub fn window(&self) -> WindowId {
        match self {
            Self::FileSelect(query) => query.window(),
            Self::AnimationPreview(query) => query.window(),
            Self::Notice(message) => message.window(),
        }
    }

    /// Lifecycle state.
    pub fn state(&self) -> QueryState {
        match self {
            Self::FileSelect(query) => query.state(),
            Self::AnimationPreview(query) => query.state(),
            Self::Notice(message) => message.state(),
        }
    }

    /// Whether the stage belongs to the preview pipeline.
    pub fn is_pipeline(&self) -> bool {
        !matches!(self, Self::Notice(_))
    }

    /// Short stage name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileSelect(_) => "file select",
            Self::AnimationPreview(_) => "animation preview",
            Self::Notice(_) => "notice",
        }
    }

    fn handle_event(&mut self, windows: &mut WindowManager, event: &UiEvent) {
        match self {
            Self::FileSelect(query) => query.handle_event(windows, event),
            Self::AnimationPreview(query) => query.handle_event(event),
            Self::Notice(message) => message.handle_event(event),
        }
    }

    fn dispose(&mut self, windows: &mut WindowManager) -> bool {
        match self {
            Self::FileSelect(query) => query.dispose(windows),
            Self::AnimationPreview(query) => query.dispose(windows),
            Self::Notice(message) => message.dispose(windows),
        }
    }
}

/// Stage outcome forwarded from a listener to the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StageSignal {
    FileChosen(PathBuf),
    FileCancelled,
    AnimationChosen(String),
    PreviewCancelled,
    NoticeDismissed,
}

/// Settings the host passes to the toolbar.
#[derive(Debug, Clone)]
pub struct ToolbarSettings {
    /// Directory sprite paths are entered relative to
    pub base_directory: PathBuf,
    /// Scale applied to tick time in the preview
    pub preview_time_scale: f32,
}

impl Default for ToolbarSettings {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("."),
            preview_time_scale: PREVIEW_TIME_SCALE,
        }
    }
}

/// The sprite preview toolbar and every stage it has opened.
pub struct FloatingToolbar {
    window: WindowId,
    preview_button: ControlId,
    window_factory: Box<dyn WindowFactory>,
    sprite_provider: Box<dyn SpriteProvider>,
    settings: ToolbarSettings,
    stages: SlotMap<StageId, Stage>,
    pipeline: Option<StageId>,
    signals: Sender<(StageId, StageSignal)>,
    pending: Receiver<(StageId, StageSignal)>,
    disposed: bool,
}

impl std::fmt::Debug for FloatingToolbar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingToolbar")
            .field("window", &self.window)
            .field("settings", &self.settings)
            .field("stages", &self.stages.len())
            .field("pipeline", &self.pipeline)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl FloatingToolbar {
    /// Open the toolbar window on top of `windows`.
    pub fn create(
        windows: &mut WindowManager,
        window_factory: Box<dyn WindowFactory>,
        sprite_provider: Box<dyn SpriteProvider>,
        settings: ToolbarSettings,
    ) -> Result<Self, ToolError> {
        let window = window_factory.create(layouts::TOOLBAR)?;
        let preview_button = window.resolve("btnPreviewSprite", ControlKind::Button)?;
        let window = windows.add_window(window);
        let (signals, pending) = unbounded();

        Ok(Self {
            window,
            preview_button,
            window_factory,
            sprite_provider,
            settings,
            stages: SlotMap::with_key(),
            pipeline: None,
            signals,
            pending,
            disposed: false,
        })
    }

    /// Toolbar window.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Show or hide the toolbar.
    pub fn set_visible(&self, windows: &mut WindowManager, visible: bool) {
        if let Some(window) = windows.get_mut(self.window) {
            window.set_visible(visible);
        }
    }

    /// Move the toolbar.
    pub fn set_location(&self, windows: &mut WindowManager, location: (i32, i32)) {
        if let Some(window) = windows.get_mut(self.window) {
            window.set_location(location);
        }
    }

    /// Center the toolbar on screen.
    pub fn center(&self, windows: &mut WindowManager) {
        windows.center(self.window);
    }

    /// Whether the toolbar has been torn down.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stage of the open preview pipeline, if any.
    pub fn active_pipeline(&self) -> Option<StageId> {
        self.pipeline
    }

    /// Stage by id.
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(id)
    }

    /// Stage owning `window`.
    pub fn stage_for_window(&self, window: WindowId) -> Option<StageId> {
        self.stages
            .iter()
            .find(|(_, stage)| stage.window() == window)
            .map(|(id, _)| id)
    }

    /// All open stages.
    pub fn stages(&self) -> impl Iterator<Item = (StageId, &Stage)> {
        self.stages.iter()
    }

    /// Open the sprite file prompt.
    ///
    /// Rejected while a previous pipeline is still open.
    pub fn start_preview(&mut self, windows: &mut WindowManager) -> Result<StageId, ToolError> {
        if self.disposed {
            return Err(ToolError::Disposed);
        }
        if let Some(active) = self.pipeline {
            warn!(?active, "Preview requested while a preview session is open");
            return Err(ToolError::PipelineActive);
        }

        let query = FileInputQuery::create(
            windows,
            self.window_factory.as_ref(),
            FileInputQueryMode::OpenFile,
            SELECT_SPRITE_PROMPT,
            &self.settings.base_directory,
        )
        .map_err(|e| {
            error!(error = %e, "Unable to construct sprite selection dialogue");
            ToolError::from(e)
        })?;

        let signals = self.signals.clone();
        let id = self.stages.insert_with_key(move |id| {
            let mut query = query;
            query.observers().add(move |outcome: &QueryOutcome<PathBuf>| {
                let signal = match outcome {
                    QueryOutcome::Okay(path) => StageSignal::FileChosen(path.clone()),
                    QueryOutcome::Cancel => StageSignal::FileCancelled,
                };
                let _ = signals.send((id, signal));
            });
            Stage::FileSelect(query)
        });

        self.pipeline = Some(id);
        Ok(id)
    }

    /// Route a UI event to the toolbar or the stage owning its window.
    pub fn handle_event(&mut self, windows: &mut WindowManager, event: &UiEvent) -> Result<(), ToolError> {
        if self.disposed {
            return Err(ToolError::Disposed);
        }

        if event.window() == self.window {
            if event.pressed() == Some(self.preview_button) {
                self.start_preview(windows)?;
            }
            return Ok(());
        }

        if let Some(id) = self.stage_for_window(event.window()) {
            if let Some(stage) = self.stages.get_mut(id) {
                stage.handle_event(windows, event);
            }
            self.process_signals(windows);
        }
        Ok(())
    }

    /// Periodic tick: drive the preview animation.
    pub fn update(&mut self, windows: &mut WindowManager, delta: Duration) {
        if self.disposed {
            return;
        }
        for stage in self.stages.values_mut() {
            if let Stage::AnimationPreview(query) = stage {
                query.update(windows, delta);
            }
        }
    }

    /// Dispose one stage. Returns `false` if it is already gone.
    fn dispose_stage(&mut self, windows: &mut WindowManager, id: StageId) -> bool {
        let Some(mut stage) = self.stages.remove(id) else {
            return false;
        };
        stage.dispose(windows);
        if self.pipeline == Some(id) {
            self.pipeline = None;
        }
        true
    }

    /// Tear down every stage and the toolbar window. Safe to call repeatedly.
    pub fn dispose(&mut self, windows: &mut WindowManager) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for (_, mut stage) in self.stages.drain() {
            stage.dispose(windows);
        }
        self.pipeline = None;
        while self.pending.try_recv().is_ok() {}
        windows.remove_window(self.window);
        info!("Toolbar disposed");
    }

    fn process_signals(&mut self, windows: &mut WindowManager) {
        while let Ok((id, signal)) = self.pending.try_recv() {
            if !self.stages.contains_key(id) {
                continue;
            }

            match signal {
                StageSignal::FileChosen(path) => {
                    self.dispose_stage(windows, id);
                    self.open_preview(windows, &path);
                },
                StageSignal::AnimationChosen(clip) => {
                    info!(clip = %clip, "Animation selected");
                    self.dispose_stage(windows, id);
                },
                StageSignal::FileCancelled | StageSignal::PreviewCancelled | StageSignal::NoticeDismissed => {
                    self.dispose_stage(windows, id);
                },
            }
        }
    }

    fn open_preview(&mut self, windows: &mut WindowManager, path: &Path) {
        match self.create_preview(windows, path) {
            Ok(id) => self.pipeline = Some(id),
            Err(ToolError::Sprite(e)) => {
                error!(error = %e, path = %path.display(), "Error occurred constructing sprite");
                self.display_message(windows, SPRITE_CONSTRUCTION_FAILED);
            },
            Err(e) => error!(error = %e, "Unable to construct sprite preview window"),
        }
    }

    fn create_preview(&mut self, windows: &mut WindowManager, path: &Path) -> Result<StageId, ToolError> {
        let sprite = self.sprite_provider.construct(path)?;
        let query = SelectSpriteAnimationQuery::create(
            windows,
            self.window_factory.as_ref(),
            sprite,
            self.settings.preview_time_scale,
        )?;

        let signals = self.signals.clone();
        Ok(self.stages.insert_with_key(move |id| {
            let mut query = query;
            query.observers().add(move |outcome: &QueryOutcome<String>| {
                let signal = match outcome {
                    QueryOutcome::Okay(clip) => StageSignal::AnimationChosen(clip.clone()),
                    QueryOutcome::Cancel => StageSignal::PreviewCancelled,
                };
                let _ = signals.send((id, signal));
            });
            Stage::AnimationPreview(query)
        }))
    }

    /// Show a dismissible message. Failures are logged, not returned.
    pub fn display_message(&mut self, windows: &mut WindowManager, text: &str) -> Option<StageId> {
        let message = match MessageBox::create(windows, self.window_factory.as_ref(), text) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Unable to construct message box");
                return None;
            },
        };

        let signals = self.signals.clone();
        Some(self.stages.insert_with_key(move |id| {
            let mut message = message;
            message.observers().add(move |_: &QueryOutcome<()>| {
                let _ = signals.send((id, StageSignal::NoticeDismissed));
            });
            Stage::Notice(message)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{LayoutWindowFactory, Window};
    use animbuilder_common::{SpriteConstructionError, WindowConstructionError};
    use animbuilder_kernel::{ClipDef, Sprite, SpriteDef};

    /// Provider that serves one in-memory sprite for `hero.toml`.
    struct FixedProvider;

    impl SpriteProvider for FixedProvider {
        fn construct(&self, uri: &Path) -> Result<Sprite, SpriteConstructionError> {
            if uri.ends_with("hero.toml") {
                Ok(Sprite::from_def(
                    SpriteDef::new("hero")
                        .with_clip(ClipDef::strip("idle", 2, 16, 16))
                        .with_clip(ClipDef::strip("walk", 4, 16, 16)),
                ))
            } else {
                Err(SpriteConstructionError::Parse {
                    uri: uri.display().to_string(),
                    reason: "not a sprite".into(),
                })
            }
        }
    }

    /// Builtin layouts, except the preview window cannot be built.
    struct NoPreviewFactory(LayoutWindowFactory);

    impl WindowFactory for NoPreviewFactory {
        fn create(&self, layout_id: &str) -> Result<Window, WindowConstructionError> {
            if layout_id == layouts::SELECT_SPRITE_ANIMATION {
                return Err(WindowConstructionError::UnknownLayout(layout_id.to_string()));
            }
            self.0.create(layout_id)
        }
    }

    fn toolbar(windows: &mut WindowManager) -> FloatingToolbar {
        toolbar_with(windows, Box::new(LayoutWindowFactory::default()))
    }

    fn toolbar_with(windows: &mut WindowManager, factory: Box<dyn WindowFactory>) -> FloatingToolbar {
        FloatingToolbar::create(
            windows,
            factory,
            Box::new(FixedProvider),
            ToolbarSettings::default(),
        )
        .expect("builtin layouts")
    }

    fn choose_file(toolbar: &mut FloatingToolbar, windows: &mut WindowManager, value: &str) {
        let id = toolbar.start_preview(windows).expect("no pipeline open");
        let window = toolbar.stage(id).map(Stage::window).expect("stage");
        let (field, okay) = {
            let w = windows.get(window).expect("window");
            (w.find("txtValue").expect("field"), w.find("btnOkay").expect("okay"))
        };
        toolbar
            .handle_event(windows, &UiEvent::TextEntered { window, control: field, text: value.into() })
            .expect("live toolbar");
        toolbar
            .handle_event(windows, &UiEvent::ButtonPressed { window, control: okay })
            .expect("live toolbar");
    }

    #[test]
    fn test_preview_button_opens_file_query() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        let event = UiEvent::ButtonPressed {
            window: toolbar.window(),
            control: toolbar.preview_button,
        };
        toolbar.handle_event(&mut windows, &event).expect("opens");

        let id = toolbar.active_pipeline().expect("pipeline");
        assert!(matches!(toolbar.stage(id), Some(Stage::FileSelect(_))));
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_second_preview_rejected() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        toolbar.start_preview(&mut windows).expect("first");
        assert!(matches!(toolbar.start_preview(&mut windows), Err(ToolError::PipelineActive)));
        assert_eq!(toolbar.stages().count(), 1);
    }

    #[test]
    fn test_file_chosen_opens_preview() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        choose_file(&mut toolbar, &mut windows, "hero.toml");

        let id = toolbar.active_pipeline().expect("preview open");
        assert!(matches!(toolbar.stage(id), Some(Stage::AnimationPreview(_))));
        assert_eq!(toolbar.stages().count(), 1);
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_bad_file_shows_notice() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        choose_file(&mut toolbar, &mut windows, "broken.toml");

        assert!(toolbar.active_pipeline().is_none());
        let stages: Vec<_> = toolbar.stages().map(|(_, s)| s.name()).collect();
        assert_eq!(stages, ["notice"]);

        // A new pipeline may start while the notice is up.
        assert!(toolbar.start_preview(&mut windows).is_ok());
    }

    #[test]
    fn test_preview_window_failure_ends_pipeline_only() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar_with(&mut windows, Box::new(NoPreviewFactory(LayoutWindowFactory::default())));

        choose_file(&mut toolbar, &mut windows, "broken.toml");
        let notice = toolbar.stages().map(|(id, _)| id).next().expect("notice open");
        let notice_window = toolbar.stage(notice).map(Stage::window).expect("notice window");

        choose_file(&mut toolbar, &mut windows, "hero.toml");

        assert!(toolbar.active_pipeline().is_none());
        let stages: Vec<_> = toolbar.stages().map(|(_, s)| s.name()).collect();
        assert_eq!(stages, ["notice"], "file stage disposed, no preview stage");
        assert!(windows.contains(toolbar.window()));
        assert!(windows.contains(notice_window));
        assert_eq!(windows.len(), 2);

        assert!(toolbar.start_preview(&mut windows).is_ok());
    }

    #[test]
    fn test_dispose_stage_twice() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        let id = toolbar.start_preview(&mut windows).expect("first");

        assert!(toolbar.dispose_stage(&mut windows, id));
        assert!(!toolbar.dispose_stage(&mut windows, id));
        assert!(toolbar.active_pipeline().is_none());
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_dispose_toolbar() {
        let mut windows = WindowManager::new((800, 600));
        let mut toolbar = toolbar(&mut windows);
        toolbar.start_preview(&mut windows).expect("first");

        toolbar.dispose(&mut windows);
        toolbar.dispose(&mut windows);
        assert!(windows.is_empty());
        assert!(toolbar.is_disposed());
        assert!(matches!(toolbar.start_preview(&mut windows), Err(ToolError::Disposed)));
    }
}
