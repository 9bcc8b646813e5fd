use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use serde_json::Value;

/// Emitted by a widget whenever its value changes, programmatically or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub field: String,
    pub value: Value,
}

/// The single callback a widget reports changes to.
pub type ChangeListener = Box<dyn Fn(ChangeEvent)>;

/// Widget-side half of the change contract: holds at most one listener.
#[derive(Default)]
pub struct ChangeNotifier {
    listener: Option<ChangeListener>,
}

impl ChangeNotifier {
    /// Replaces any previously registered listener.
    pub fn register(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    pub fn notify(&self, field: &str, value: Value) {
        tracing::trace!(field, %value, "field changed");
        if let Some(listener) = &self.listener {
            listener(ChangeEvent {
                field: field.to_string(),
                value,
            });
        }
    }

    pub fn is_registered(&self) -> bool {
        self.listener.is_some()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Single-threaded FIFO of pending change events for one form.
#[derive(Debug, Clone, Default)]
pub struct ChangeQueue {
    pending: Rc<RefCell<VecDeque<ChangeEvent>>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends into this queue.
    pub fn listener(&self) -> ChangeListener {
        let pending = Rc::clone(&self.pending);
        Box::new(move |event| pending.borrow_mut().push_back(event))
    }

    pub fn pop(&self) -> Option<ChangeEvent> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
