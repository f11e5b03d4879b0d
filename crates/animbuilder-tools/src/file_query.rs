//! File path prompt.

use crate::observers::Observers;
use crate::query::{QueryOutcome, QuerySession, QueryState};
use crate::window::{layouts, ControlKind, UiEvent, Window, WindowFactory, WindowManager};
use animbuilder_common::{ControlId, WindowConstructionError, WindowId};
use std::path::{Path, PathBuf};
use tracing::warn;

/// What kind of path the query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileInputQueryMode {
    /// An existing file to read
    #[default]
    OpenFile,
    /// A file to write
    SaveFile,
    /// A directory
    OpenDirectory,
}

impl FileInputQueryMode {
    /// Window title for this mode.
    pub fn title(&self) -> &'static str {
        match self {
            Self::OpenFile => "Open File",
            Self::SaveFile => "Save File",
            Self::OpenDirectory => "Open Directory",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FileInputControls {
    prompt: ControlId,
    value: ControlId,
    okay: ControlId,
    cancel: ControlId,
}

impl FileInputControls {
    fn resolve(window: &Window) -> Result<Self, WindowConstructionError> {
        Ok(Self {
            prompt: window.resolve("lblPrompt", ControlKind::Label)?,
            value: window.resolve("txtValue", ControlKind::TextField)?,
            okay: window.resolve("btnOkay", ControlKind::Button)?,
            cancel: window.resolve("btnCancel", ControlKind::Button)?,
        })
    }
}

/// Modal prompt for a path, relative to a base directory.
#[derive(Debug)]
pub struct FileInputQuery {
    session: QuerySession<PathBuf>,
    controls: FileInputControls,
    mode: FileInputQueryMode,
    base_directory: PathBuf,
    value: String,
}

impl FileInputQuery {
    /// Open the prompt window, centered, on top of `windows`.
    pub fn create(
        windows: &mut WindowManager,
        factory: &dyn WindowFactory,
        mode: FileInputQueryMode,
        prompt: &str,
        base_directory: &Path,
    ) -> Result<Self, WindowConstructionError> {
        let mut window = factory.create(layouts::FILE_INPUT_QUERY)?;
        let controls = FileInputControls::resolve(&window)?;
        window.set_title(mode.title());
        window.set_text(controls.prompt, prompt);

        let id = windows.add_window(window);
        windows.center(id);

        Ok(Self {
            session: QuerySession::new(id),
            controls,
            mode,
            base_directory: base_directory.to_path_buf(),
            value: String::new(),
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

    /// Requested path kind.
    pub fn mode(&self) -> FileInputQueryMode {
        self.mode
    }

    /// Current text field contents.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Listener registry for the chosen path.
    pub fn observers(&mut self) -> &mut Observers<QueryOutcome<PathBuf>> {
        self.session.observers()
    }

    /// Replace the text field contents.
    pub fn set_value(&mut self, windows: &mut WindowManager, value: impl Into<String>) {
        self.value = value.into();
        if let Some(window) = windows.get_mut(self.window()) {
            window.set_text(self.controls.value, self.value.clone());
        }
    }

    /// Route a UI event addressed to this query's window.
    pub fn handle_event(&mut self, windows: &mut WindowManager, event: &UiEvent) {
        match event {
            UiEvent::TextEntered { control, text, .. } if *control == self.controls.value => {
                self.set_value(windows, text.clone());
            },
            UiEvent::ButtonPressed { control, .. } if *control == self.controls.okay => {
                self.okay();
            },
            UiEvent::ButtonPressed { control, .. } if *control == self.controls.cancel => {
                self.cancel();
            },
            _ => {},
        }
    }

    /// Raise the entered path, resolved against the base directory.
    ///
    /// An empty field keeps the query open.
    pub fn okay(&mut self) -> bool {
        let value = self.value.trim();
        if value.is_empty() {
            warn!("No path entered, ignoring okay");
            return false;
        }
        let path = self.base_directory.join(value);
        self.session.confirm(path)
    }

    /// Raise cancellation.
    pub fn cancel(&mut self) -> bool {
        self.session.cancel()
    }

    /// Release the window. Safe to call repeatedly.
    pub fn dispose(&mut self, windows: &mut WindowManager) -> bool {
        self.session.dispose(windows)
    }
}
