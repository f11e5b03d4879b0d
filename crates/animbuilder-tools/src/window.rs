//! Window model for the builder tools.
//!
//! Windows are built from named layouts that declare typed controls. Tools
//! resolve the controls they need once, right after construction, so a
//! missing control fails the window instead of a later button press.

use ahash::AHashMap;
use animbuilder_common::{ControlId, SchemaVersion, WindowConstructionError, WindowId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Built-in layout ids.
pub mod layouts {
    /// Floating toolbar with the preview button.
    pub const TOOLBAR: &str = "toolbar";
    /// File path prompt.
    pub const FILE_INPUT_QUERY: &str = "fileInputQuery";
    /// Dismissible message.
    pub const MESSAGE_BOX: &str = "messageBox";
    /// Sprite animation preview.
    pub const SELECT_SPRITE_ANIMATION: &str = "selectSpriteAnimation";
}

/// Kind of a control declared by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Pressable button
    Button,
    /// Read-only text
    Label,
    /// Editable single-line text
    TextField,
    /// Render target for a sprite
    Viewport,
}

impl ControlKind {
    /// Lowercase display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Label => "label",
            Self::TextField => "textfield",
            Self::Viewport => "viewport",
        }
    }
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A control declaration inside a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlDecl {
    /// Control name, unique within the layout
    pub name: String,
    /// Control kind
    pub kind: ControlKind,
    /// Initial text
    #[serde(default)]
    pub text: String,
}

impl ControlDecl {
    fn new(name: &str, kind: ControlKind, text: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            text: text.to_string(),
        }
    }
}

/// A window layout: size, title and controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLayout {
    /// Layout id
    pub id: String,
    /// Window title
    #[serde(default)]
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Controls in declaration order
    #[serde(default)]
    pub controls: Vec<ControlDecl>,
}

#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    format_version: Option<SchemaVersion>,
    #[serde(default)]
    layouts: Vec<WindowLayout>,
}

/// Registry of window layouts by id.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: AHashMap<String, WindowLayout>,
}

impl LayoutRegistry {
    /// Registry holding the built-in layouts.
    pub fn builtin() -> Self {
        use ControlKind::{Button, Label, TextField, Viewport};

        let mut registry = Self::default();
        registry.insert(WindowLayout {
            id: layouts::TOOLBAR.to_string(),
            title: "Animation Builder".to_string(),
            width: 220,
            height: 48,
            controls: vec![ControlDecl::new("btnPreviewSprite", Button, "Preview Sprite")],
        });
        registry.insert(WindowLayout {
            id: layouts::FILE_INPUT_QUERY.to_string(),
            title: "Select File".to_string(),
            width: 420,
            height: 120,
            controls: vec![
                ControlDecl::new("lblPrompt", Label, ""),
                ControlDecl::new("txtValue", TextField, ""),
                ControlDecl::new("btnOkay", Button, "Okay"),
                ControlDecl::new("btnCancel", Button, "Cancel"),
            ],
        });
        registry.insert(WindowLayout {
            id: layouts::MESSAGE_BOX.to_string(),
            title: "Message".to_string(),
            width: 360,
            height: 120,
            controls: vec![
                ControlDecl::new("lblMessage", Label, ""),
                ControlDecl::new("btnOkay", Button, "Okay"),
            ],
        });
        registry.insert(WindowLayout {
            id: layouts::SELECT_SPRITE_ANIMATION.to_string(),
            title: "Sprite Preview".to_string(),
            width: 320,
            height: 360,
            controls: vec![
                ControlDecl::new("spriteViewport", Viewport, ""),
                ControlDecl::new("lblAnimation", Label, ""),
                ControlDecl::new("btnLast", Button, "<"),
                ControlDecl::new("btnNext", Button, ">"),
                ControlDecl::new("btnOkay", Button, "Okay"),
                ControlDecl::new("btnCancel", Button, "Cancel"),
            ],
        });
        registry
    }

    /// Built-in layouts overridden by those in a TOML layout file.
    pub fn builtin_with_file(path: &Path) -> Result<Self, WindowConstructionError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WindowConstructionError::LayoutSource(format!("{}: {e}", path.display()))
        })?;
        let file: LayoutFile = toml::from_str(&text).map_err(|e| {
            WindowConstructionError::LayoutSource(format!("{}: {e}", path.display()))
        })?;

        if let Some(version) = file.format_version {
            if !SchemaVersion::WINDOW_LAYOUT.can_read(&version) {
                return Err(WindowConstructionError::LayoutSource(format!(
                    "{}: unsupported layout format {version}",
                    path.display()
                )));
            }
        }

        let mut registry = Self::builtin();
        let count = file.layouts.len();
        for layout in file.layouts {
            registry.insert(layout);
        }
        info!("Loaded {count} window layouts from {}", path.display());
        Ok(registry)
    }

    /// Register or replace a layout.
    pub fn insert(&mut self, layout: WindowLayout) {
        self.layouts.insert(layout.id.clone(), layout);
    }

    /// Look up a layout.
    pub fn get(&self, id: &str) -> Option<&WindowLayout> {
        self.layouts.get(id)
    }

    /// Number of registered layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// A live control inside a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Control name
    pub name: String,
    /// Control kind
    pub kind: ControlKind,
    /// Current text
    pub text: String,
}

/// A window instance built from a layout.
#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    layout: String,
    title: String,
    size: (u32, u32),
    location: (i32, i32),
    visible: bool,
    controls: Vec<Control>,
}

impl Window {
    /// Instantiate `layout` as a new window.
    pub fn from_layout(layout: &WindowLayout) -> Self {
        Self {
            id: WindowId::new(),
            layout: layout.id.clone(),
            title: layout.title.clone(),
            size: (layout.width, layout.height),
            location: (0, 0),
            visible: true,
            controls: layout
                .controls
                .iter()
                .map(|decl| Control {
                    name: decl.name.clone(),
                    kind: decl.kind,
                    text: decl.text.clone(),
                })
                .collect(),
        }
    }

    /// Window id.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Layout id this window was built from.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Top-left position in pixels.
    pub fn location(&self) -> (i32, i32) {
        self.location
    }

    /// Move the window.
    pub fn set_location(&mut self, location: (i32, i32)) {
        self.location = location;
    }

    /// Whether the window is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the window.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Center the window on a screen of the given resolution.
    pub fn center(&mut self, resolution: (u32, u32)) {
        let x = (i64::from(resolution.0) - i64::from(self.size.0)) / 2;
        let y = (i64::from(resolution.1) - i64::from(self.size.1)) / 2;
        self.location = (x as i32, y as i32);
    }

    /// Find a control by name.
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|control| control.name == name)
            .map(|index| ControlId::new(index as u16))
    }

    /// Find a control by name and check its kind.
    pub fn resolve(&self, name: &str, kind: ControlKind) -> Result<ControlId, WindowConstructionError> {
        let id = self.find(name).ok_or_else(|| WindowConstructionError::NoSuchControl {
            layout: self.layout.clone(),
            control: name.to_string(),
        })?;

        let actual = self.controls[id.index()].kind;
        if actual != kind {
            return Err(WindowConstructionError::WrongControlKind {
                layout: self.layout.clone(),
                control: name.to_string(),
                expected: kind.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(id)
    }

    /// Control by id.
    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.index())
    }

    /// All controls in layout order.
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Text of a control, empty if the id is out of range.
    pub fn text(&self, id: ControlId) -> &str {
        self.control(id).map_or("", |control| control.text.as_str())
    }

    /// Replace a control's text.
    pub fn set_text(&mut self, id: ControlId, text: impl Into<String>) {
        if let Some(control) = self.controls.get_mut(id.index()) {
            control.text = text.into();
        }
    }
}

/// Input delivered to a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A button was pressed
    ButtonPressed {
        /// Target window
        window: WindowId,
        /// Pressed button
        control: ControlId,
    },
    /// Text was committed into a text field
    TextEntered {
        /// Target window
        window: WindowId,
        /// Edited field
        control: ControlId,
        /// New field contents
        text: String,
    },
}

impl UiEvent {
    /// Window the event is addressed to.
    pub fn window(&self) -> WindowId {
        match self {
            Self::ButtonPressed { window, .. } | Self::TextEntered { window, .. } => *window,
        }
    }

    /// Control the event is addressed to.
    pub fn control(&self) -> ControlId {
        match self {
            Self::ButtonPressed { control, .. } | Self::TextEntered { control, .. } => *control,
        }
    }

    /// The pressed button, if this is a button press.
    pub fn pressed(&self) -> Option<ControlId> {
        match self {
            Self::ButtonPressed { control, .. } => Some(*control),
            Self::TextEntered { .. } => None,
        }
    }
}

/// Builds windows from layout ids.
pub trait WindowFactory {
    /// Create a window for `layout_id`.
    fn create(&self, layout_id: &str) -> Result<Window, WindowConstructionError>;
}

/// Window factory backed by a [`LayoutRegistry`].
#[derive(Debug, Clone)]
pub struct LayoutWindowFactory {
    registry: LayoutRegistry,
}

impl LayoutWindowFactory {
    /// Create a factory over `registry`.
    pub fn new(registry: LayoutRegistry) -> Self {
        Self { registry }
    }

    /// Layouts this factory knows about.
    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }
}

impl Default for LayoutWindowFactory {
    fn default() -> Self {
        Self::new(LayoutRegistry::builtin())
    }
}

impl WindowFactory for LayoutWindowFactory {
    fn create(&self, layout_id: &str) -> Result<Window, WindowConstructionError> {
        let layout = self
            .registry
            .get(layout_id)
            .ok_or_else(|| WindowConstructionError::UnknownLayout(layout_id.to_string()))?;
        Ok(Window::from_layout(layout))
    }
}

/// Owns all open windows in z-order (last added is on top).
#[derive(Debug, Clone)]
pub struct WindowManager {
    windows: Vec<Window>,
    resolution: (u32, u32),
}

impl WindowManager {
    /// Create a manager for a screen of the given resolution.
    pub fn new(resolution: (u32, u32)) -> Self {
        Self {
            windows: Vec::new(),
            resolution,
        }
    }

    /// Screen resolution.
    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    /// Add a window on top of all others.
    pub fn add_window(&mut self, window: Window) -> WindowId {
        let id = window.id();
        debug!(%id, layout = window.layout(), "Window added");
        self.windows.push(window);
        id
    }

    /// Remove and return a window. Returns `None` if it is already gone.
    pub fn remove_window(&mut self, id: WindowId) -> Option<Window> {
        let index = self.windows.iter().position(|window| window.id() == id)?;
        debug!(%id, "Window removed");
        Some(self.windows.remove(index))
    }

    /// Whether a window is open.
    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    /// Window by id.
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| window.id() == id)
    }

    /// Mutable window by id.
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| window.id() == id)
    }

    /// Center a window on screen.
    pub fn center(&mut self, id: WindowId) {
        let resolution = self.resolution;
        if let Some(window) = self.get_mut(id) {
            window.center(resolution);
        }
    }

    /// Topmost visible window.
    pub fn top(&self) -> Option<&Window> {
        self.windows.iter().rev().find(|window| window.is_visible())
    }

    /// Windows from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    /// Number of open windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no windows are open.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts() {
        let registry = LayoutRegistry::builtin();
        assert_eq!(registry.len(), 4);
        assert!(registry.get(layouts::SELECT_SPRITE_ANIMATION).is_some());
    }

    #[test]
    fn test_unknown_layout() {
        let factory = LayoutWindowFactory::default();
        let err = factory.create("worldSelect").unwrap_err();
        assert_eq!(err, WindowConstructionError::UnknownLayout("worldSelect".into()));
    }

    #[test]
    fn test_resolve_controls() {
        let factory = LayoutWindowFactory::default();
        let window = factory.create(layouts::MESSAGE_BOX).expect("builtin layout");

        let okay = window.resolve("btnOkay", ControlKind::Button).expect("declared");
        assert_eq!(window.text(okay), "Okay");

        assert!(matches!(
            window.resolve("btnCancel", ControlKind::Button),
            Err(WindowConstructionError::NoSuchControl { .. })
        ));
        assert!(matches!(
            window.resolve("lblMessage", ControlKind::Button),
            Err(WindowConstructionError::WrongControlKind { .. })
        ));
    }

    #[test]
    fn test_window_manager_order_and_removal() {
        let factory = LayoutWindowFactory::default();
        let mut manager = WindowManager::new((800, 600));

        let toolbar = manager.add_window(factory.create(layouts::TOOLBAR).expect("toolbar"));
        let message = manager.add_window(factory.create(layouts::MESSAGE_BOX).expect("message"));
        assert_eq!(manager.top().map(Window::id), Some(message));

        manager.center(message);
        assert_eq!(manager.get(message).map(Window::location), Some((220, 240)));

        assert!(manager.remove_window(message).is_some());
        assert!(manager.remove_window(message).is_none());
        assert_eq!(manager.top().map(Window::id), Some(toolbar));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_layout_file_overrides_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layouts.toml");
        std::fs::write(
            &path,
            r#"
            format_version = { major = 1, minor = 0, patch = 0 }

            [[layouts]]
            id = "messageBox"
            title = "Notice"
            width = 100
            height = 50
            controls = [
                { name = "lblMessage", kind = "label" },
                { name = "btnOkay", kind = "button", text = "Dismiss" },
            ]
            "#,
        )
        .expect("write");

        let registry = LayoutRegistry::builtin_with_file(&path).expect("layout file");
        let layout = registry.get(layouts::MESSAGE_BOX).expect("overridden");
        assert_eq!(layout.title, "Notice");
        assert_eq!(layout.controls[1].text, "Dismiss");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_layout_file_missing() {
        let err = LayoutRegistry::builtin_with_file(Path::new("/nonexistent/layouts.toml")).unwrap_err();
        assert!(matches!(err, WindowConstructionError::LayoutSource(_)));
    }
}
