use std::{fmt, sync::Arc};

use crate::{
    error::SessionError,
    event::{EventType, Listener},
};

/// Listeners of one session, one ordered list per event type
#[derive(Default)]
pub struct Listeners {
    messages_received: Vec<Listener>,
    error_occurred: Vec<Listener>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("messages_received", &self.messages_received.len())
            .field("error_occurred", &self.error_occurred.len())
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, event_type: EventType) -> &Vec<Listener> {
        match event_type {
            EventType::MessagesReceived => &self.messages_received,
            EventType::ErrorOccurred => &self.error_occurred,
        }
    }

    fn list_mut(&mut self, event_type: EventType) -> &mut Vec<Listener> {
        match event_type {
            EventType::MessagesReceived => &mut self.messages_received,
            EventType::ErrorOccurred => &mut self.error_occurred,
        }
    }

    pub fn add(&mut self, event_type: EventType, listener: Listener) {
        self.list_mut(event_type).push(listener);
    }

    /// Remove the first registration of `listener`, keeping the order of the rest
    pub fn remove(&mut self, event_type: EventType, listener: &Listener) -> Result<(), SessionError> {
        let list = self.list_mut(event_type);
        let index = list
            .iter()
            .position(|registered| same_listener(registered, listener))
            .ok_or(SessionError::ListenerNotFound)?;

        list.remove(index);
        Ok(())
    }

    pub fn clear(&mut self, event_type: EventType) {
        self.list_mut(event_type).clear();
    }

    pub fn len(&self, event_type: EventType) -> usize {
        self.list(event_type).len()
    }

    /// Copy of the current list, taken so listeners can run without the lock held
    pub fn snapshot(&self, event_type: EventType) -> Vec<Listener> {
        self.list(event_type).clone()
    }
}

// compare the data pointers only, vtable pointers are not unique
fn same_listener(lhs: &Listener, rhs: &Listener) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(lhs), Arc::as_ptr(rhs))
}
