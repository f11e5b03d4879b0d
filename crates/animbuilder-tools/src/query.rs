//! Query sessions: the dismissible unit every modal tool is built on.
//!
//! A session moves `Open -> Confirmed | Cancelled -> Disposed`. The outcome is
//! raised exactly once; disposal releases the window and detaches listeners
//! and may be requested any number of times.

use crate::observers::Observers;
use crate::window::WindowManager;
use animbuilder_common::WindowId;
use tracing::debug;

/// Outcome of a query, delivered once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// User affirmed the query's primary action
    Okay(T),
    /// User dismissed the query
    Cancel,
}

/// Lifecycle state of a query session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    /// Waiting for the user
    #[default]
    Open,
    /// Okay outcome raised
    Confirmed,
    /// Cancel outcome raised
    Cancelled,
    /// Window released, listeners detached
    Disposed,
}

/// One open modal: its window, its listeners and its lifecycle state.
#[derive(Debug)]
pub struct QuerySession<T> {
    window: WindowId,
    observers: Observers<QueryOutcome<T>>,
    state: QueryState,
}

impl<T> QuerySession<T> {
    /// Start a session for an already added window.
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            observers: Observers::new(),
            state: QueryState::Open,
        }
    }

    /// Window owned by this session.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Current state.
    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Whether the session still accepts input.
    pub fn is_open(&self) -> bool {
        self.state == QueryState::Open
    }

    /// Whether the session has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.state == QueryState::Disposed
    }

    /// Listener registry for the outcome.
    pub fn observers(&mut self) -> &mut Observers<QueryOutcome<T>> {
        &mut self.observers
    }

    /// Raise `Okay(value)`. Ignored unless the session is open.
    pub fn confirm(&mut self, value: T) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = QueryState::Confirmed;
        self.observers.raise(&QueryOutcome::Okay(value));
        true
    }

    /// Raise `Cancel`. Ignored unless the session is open.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = QueryState::Cancelled;
        self.observers.raise(&QueryOutcome::Cancel);
        true
    }

    /// Release the window and detach listeners.
    ///
    /// Returns `false` if the session was already disposed.
    pub fn dispose(&mut self, windows: &mut WindowManager) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.state = QueryState::Disposed;
        self.observers.clear();
        windows.remove_window(self.window);
        debug!(window = %self.window, "Query disposed");
        true
    }
}
