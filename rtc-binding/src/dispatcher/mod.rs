//! Publish/subscribe delivery of named events.
//!
//! Every event type has an ordered list of listeners and at most one
//! shorthand handler (the `on<type>` slot). Listeners run in registration
//! order and the shorthand handler runs after them.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use log::trace;

/// An event that can be delivered through a [`Dispatcher`].
pub trait Event {
    /// Name of the event, used to select its listeners.
    type Type: Copy + Eq + Hash + fmt::Debug;

    fn event_type(&self) -> Self::Type;
}

/// A shared event callback.
pub type EventHandler<E> = Rc<dyn Fn(&E)>;

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Dispatcher<E: Event> {
    next_listener_id: u64,
    listeners: HashMap<E::Type, Vec<(ListenerId, EventHandler<E>)>>,
    handlers: HashMap<E::Type, EventHandler<E>>,
}

impl<E: Event> Default for Dispatcher<E> {
    fn default() -> Self {
        Self {
            next_listener_id: 0,
            listeners: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

impl<E: Event> Dispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// add_event_listener appends a listener for `event_type`.
    pub fn add_event_listener(
        &mut self,
        event_type: E::Type,
        listener: impl Fn(&E) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners
            .entry(event_type)
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// remove_event_listener removes a listener, returning false if it was
    /// not registered for `event_type`.
    pub fn remove_event_listener(&mut self, event_type: E::Type, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&event_type) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    /// set_event_handler replaces the shorthand handler, `None` clears it.
    pub fn set_event_handler(&mut self, event_type: E::Type, handler: Option<EventHandler<E>>) {
        match handler {
            Some(handler) => {
                self.handlers.insert(event_type, handler);
            }
            None => {
                self.handlers.remove(&event_type);
            }
        }
    }

    pub fn event_handler(&self, event_type: E::Type) -> Option<EventHandler<E>> {
        self.handlers.get(&event_type).cloned()
    }

    /// snapshot returns the callbacks a dispatch of `event_type` would run
    /// right now, in delivery order.
    pub fn snapshot(&self, event_type: E::Type) -> Vec<EventHandler<E>> {
        let mut callbacks: Vec<EventHandler<E>> = self
            .listeners
            .get(&event_type)
            .map(|listeners| listeners.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        if let Some(handler) = self.handlers.get(&event_type) {
            callbacks.push(Rc::clone(handler));
        }
        callbacks
    }

    /// dispatch delivers `event` and returns how many callbacks ran.
    pub fn dispatch(&self, event: &E) -> usize {
        deliver(self.snapshot(event.event_type()), event)
    }
}

/// deliver runs a snapshot taken earlier, so callers can release any borrow
/// of the owning object before user code runs.
pub(crate) fn deliver<E: Event>(callbacks: Vec<EventHandler<E>>, event: &E) -> usize {
    trace!(
        "dispatch {:?} to {} callbacks",
        event.event_type(),
        callbacks.len()
    );
    for callback in &callbacks {
        callback(event);
    }
    callbacks.len()
}
