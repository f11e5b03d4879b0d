//! Application lifecycle management.
//!
//! Hosts the window manager, the pointer cursor and the floating toolbar, and
//! drives them from a headless command stream.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use animbuilder_common::{BuilderError, BuilderResult, ToolError};
use animbuilder_kernel::{Sprite, SpriteProvider, TomlSpriteProvider};
use animbuilder_tools::{
    ControlKind, FloatingToolbar, LayoutRegistry, LayoutWindowFactory, ToolbarSettings, UiEvent, WindowManager,
};

use crate::config::BuilderConfig;
use crate::script::{read_script, Command};

/// The animation builder host.
#[derive(Debug)]
pub struct AnimationBuilder {
    config: BuilderConfig,
    windows: WindowManager,
    /// Pointer glyph; `None` is the null cursor
    cursor: Option<Sprite>,
    toolbar: Option<FloatingToolbar>,
    disposed: bool,
}

impl AnimationBuilder {
    /// Build the host: cursor, layouts and a centered toolbar.
    ///
    /// Only an unreadable layouts file is fatal. A missing cursor sprite falls
    /// back to the null cursor and a toolbar failure leaves the host without one.
    pub fn new(config: BuilderConfig) -> BuilderResult<Self> {
        let provider = TomlSpriteProvider::new(&config.base_directory);
        let cursor = Self::load_cursor(&provider, config.cursor_sprite.as_deref());

        let registry = match &config.layouts_file {
            Some(path) => LayoutRegistry::builtin_with_file(path)?,
            None => LayoutRegistry::builtin(),
        };
        info!(layouts = registry.len(), "Window layouts ready");

        let mut windows = WindowManager::new(config.resolution);
        let settings = ToolbarSettings {
            base_directory: config.base_directory.clone(),
            preview_time_scale: config.preview_time_scale,
        };
        let toolbar = match FloatingToolbar::create(
            &mut windows,
            Box::new(LayoutWindowFactory::new(registry)),
            Box::new(provider),
            settings,
        ) {
            Ok(toolbar) => {
                toolbar.center(&mut windows);
                Some(toolbar)
            },
            Err(e) => {
                warn!(error = %e, "Unable to construct toolbar");
                None
            },
        };

        Ok(Self {
            config,
            windows,
            cursor,
            toolbar,
            disposed: false,
        })
    }

    fn load_cursor(provider: &TomlSpriteProvider, uri: Option<&Path>) -> Option<Sprite> {
        let uri = uri?;
        match provider.construct(uri) {
            Ok(sprite) => Some(sprite),
            Err(e) => {
                warn!(error = %e, "Unable to load cursor sprite, using null cursor");
                None
            },
        }
    }

    /// Open windows.
    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    /// Pointer sprite, `None` for the null cursor.
    pub fn cursor(&self) -> Option<&Sprite> {
        self.cursor.as_ref()
    }

    /// The toolbar, if it could be built.
    pub fn toolbar(&self) -> Option<&FloatingToolbar> {
        self.toolbar.as_ref()
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[allow(dead_code)]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Advance the cursor and the toolbar's stages by `delta`.
    pub fn update(&mut self, delta: Duration) {
        if self.disposed {
            return;
        }
        if let Some(cursor) = &mut self.cursor {
            cursor.advance(delta);
        }
        if let Some(toolbar) = &mut self.toolbar {
            toolbar.update(&mut self.windows, delta);
        }
    }

    /// Apply one command. `Break` means the host should stop.
    pub fn run_command(&mut self, command: &Command) -> ControlFlow<()> {
        debug!(%command, "Running command");
        match self.apply(command) {
            Ok(flow) => flow,
            Err(e) => {
                warn!(%command, error = %e, "Command failed");
                ControlFlow::Continue(())
            },
        }
    }

    fn apply(&mut self, command: &Command) -> BuilderResult<ControlFlow<()>> {
        match command {
            Command::Preview => {
                let toolbar = self.toolbar.as_mut().ok_or(BuilderError::Tool(ToolError::Disposed))?;
                toolbar.start_preview(&mut self.windows)?;
            },
            Command::Press(control) => {
                let event = self.event_on_top(control, ControlKind::Button, None)?;
                self.dispatch(&event)?;
            },
            Command::Type { control, text } => {
                let event = self.event_on_top(control, ControlKind::TextField, Some(text))?;
                self.dispatch(&event)?;
            },
            Command::Tick { ms, count } => {
                let delta = Duration::from_millis(*ms);
                for _ in 0..*count {
                    self.update(delta);
                }
            },
            Command::Show => self.show(),
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn event_on_top(&self, control: &str, kind: ControlKind, text: Option<&String>) -> BuilderResult<UiEvent> {
        let window = self
            .windows
            .top()
            .ok_or(BuilderError::Tool(ToolError::NoWindowOpen))?;
        let id = window.resolve(control, kind)?;
        Ok(match text {
            Some(text) => UiEvent::TextEntered {
                window: window.id(),
                control: id,
                text: text.clone(),
            },
            None => UiEvent::ButtonPressed {
                window: window.id(),
                control: id,
            },
        })
    }

    fn dispatch(&mut self, event: &UiEvent) -> BuilderResult<()> {
        let toolbar = self.toolbar.as_mut().ok_or(BuilderError::Tool(ToolError::Disposed))?;
        toolbar.handle_event(&mut self.windows, event)?;
        Ok(())
    }

    fn show(&self) {
        match &self.cursor {
            Some(cursor) => info!(cursor = %cursor.active_clip_cursor(), "Cursor"),
            None => info!("Cursor: null"),
        }
        for window in self.windows.iter() {
            info!(
                window = %window.id(),
                layout = window.layout(),
                title = window.title(),
                visible = window.is_visible(),
                location = ?window.location(),
                "Window"
            );
            for control in window.controls() {
                info!("  {} {} = {:?}", control.kind.display_name(), control.name, control.text);
            }
        }
    }

    /// Tear down the toolbar and every open window. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(toolbar) = &mut self.toolbar {
            toolbar.dispose(&mut self.windows);
        }
        self.cursor = None;
        info!(remaining_windows = self.windows.len(), "Animation builder disposed");
    }

    /// Tick length from the configuration.
    pub fn tick(&self) -> Duration {
        self.config.tick()
    }
}

/// Run the host over a script file, or over stdin when `script` is `None`.
pub fn run(config: BuilderConfig, script: Option<&Path>) -> Result<()> {
    info!("Configuration loaded:");
    info!("  Base directory: {}", config.base_directory.display());
    info!("  Resolution: {}x{}", config.resolution.0, config.resolution.1);
    info!("  Tick: {}ms", config.tick_ms);

    let mut app = AnimationBuilder::new(config).context("Failed to start animation builder")?;
    info!(
        windows = app.windows().len(),
        toolbar = app.toolbar().is_some(),
        cursor = app.cursor().map_or("null", Sprite::name),
        "Animation builder ready"
    );

    match script {
        Some(path) => {
            let commands =
                read_script(path).with_context(|| format!("Failed to load script {}", path.display()))?;
            info!(commands = commands.len(), "Running script {}", path.display());
            for command in &commands {
                if app.run_command(command).is_break() {
                    break;
                }
            }
        },
        None => {
            info!("Reading commands from stdin");
            for line in std::io::stdin().lock().lines() {
                let line = line.context("Failed to read stdin")?;
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if app.run_command(&command).is_break() {
                            break;
                        }
                    },
                    Err(e) => warn!("{e}"),
                }
                app.update(app.tick());
            }
        },
    }

    app.dispose();
    Ok(())
}
