//! Dismissible message window.

use crate::observers::Observers;
use crate::query::{QueryOutcome, QuerySession, QueryState};
use crate::window::{layouts, ControlKind, UiEvent, WindowFactory, WindowManager};
use animbuilder_common::{ControlId, WindowConstructionError, WindowId};

/// A message with a single okay button.
#[derive(Debug)]
pub struct MessageBox {
    session: QuerySession<()>,
    okay: ControlId,
}

impl MessageBox {
    /// Open a centered message window showing `message`.
    pub fn create(
        windows: &mut WindowManager,
        factory: &dyn WindowFactory,
        message: &str,
    ) -> Result<Self, WindowConstructionError> {
        let mut window = factory.create(layouts::MESSAGE_BOX)?;
        let label = window.resolve("lblMessage", ControlKind::Label)?;
        let okay = window.resolve("btnOkay", ControlKind::Button)?;
        window.set_text(label, message);

        let id = windows.add_window(window);
        windows.center(id);

        Ok(Self {
            session: QuerySession::new(id),
            okay,
        })
    }

    /// Window owned by the message box.
    pub fn window(&self) -> WindowId {
        self.session.window()
    }

    /// Lifecycle state.
    pub fn state(&self) -> QueryState {
        self.session.state()
    }

    /// Listener registry for the dismissal.
    pub fn observers(&mut self) -> &mut Observers<QueryOutcome<()>> {
        self.session.observers()
    }

    /// Route a UI event addressed to this window.
    pub fn handle_event(&mut self, event: &UiEvent) {
        if event.pressed() == Some(self.okay) {
            self.okay();
        }
    }

    /// Acknowledge the message.
    pub fn okay(&mut self) -> bool {
        self.session.confirm(())
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

    #[test]
    fn test_message_shown_and_acknowledged() {
        let mut windows = WindowManager::new((800, 600));
        let mut message = MessageBox::create(&mut windows, &LayoutWindowFactory::default(), "Bad sprite")
            .expect("builtin layout");

        let window = windows.get(message.window()).expect("added");
        let label = window.find("lblMessage").expect("label");
        assert_eq!(window.text(label), "Bad sprite");

        let event = UiEvent::ButtonPressed {
            window: message.window(),
            control: message.okay,
        };
        message.handle_event(&event);
        assert_eq!(message.state(), QueryState::Confirmed);

        message.dispose(&mut windows);
        assert!(windows.is_empty());
    }
}
