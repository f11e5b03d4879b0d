//! Typed observer registry.
//!
//! Listeners are called synchronously, in registration order, every time an
//! event is raised. Listeners must not reach back into the object raising the
//! event; tools forward events onto a channel and act on them afterwards.

/// Handle returned by [`Observers::add`], used to detach a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered list of listeners for events of type `E`.
pub struct Observers<E> {
    next_id: u64,
    listeners: Vec<(ObserverId, Listener<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> Observers<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. It runs after every listener attached before it.
    pub fn add(&mut self, listener: impl FnMut(&E) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in registration order.
    pub fn raise(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Detach all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are attached.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::<u32>::new();

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            observers.add(move |value| log.borrow_mut().push(format!("{tag}:{value}")));
        }

        observers.raise(&7);
        assert_eq!(*log.borrow(), ["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let hits = Rc::new(RefCell::new(0));
        let mut observers = Observers::<()>::new();

        let counter = Rc::clone(&hits);
        let id = observers.add(move |_| *counter.borrow_mut() += 1);
        let counter = Rc::clone(&hits);
        observers.add(move |_| *counter.borrow_mut() += 10);

        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        observers.raise(&());
        assert_eq!(*hits.borrow(), 10);

        observers.clear();
        assert!(observers.is_empty());
        observers.raise(&());
        assert_eq!(*hits.borrow(), 10);
    }
}
