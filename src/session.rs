//! A single NDEF reading session and its lifecycle

pub mod listeners;

use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use derive_more::{Display, From, Into};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use crate::{
    error::SessionError,
    event::{EventType, Listener, SessionEvent},
    router::EventRouter,
};

use listeners::Listeners;

/// Correlates a session with its native counterpart, never reused
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Display, From, Into)]
pub struct SessionId(u64);

uniffi::custom_newtype!(SessionId, u64);

/// Options passed to the native session when it is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Message shown by the system sheet while scanning
    pub alert_message: Option<String>,

    /// Let the native session end itself after the first tag is read
    pub invalidate_after_first_read: bool,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_message(mut self, alert_message: impl Into<String>) -> Self {
        self.alert_message = Some(alert_message.into());
        self
    }

    pub fn invalidate_after_first_read(mut self, invalidate_after_first_read: bool) -> Self {
        self.invalidate_after_first_read = invalidate_after_first_read;
        self
    }
}

/// Handle to a reading session, clones refer to the same session
#[derive(Clone)]
pub struct NdefReaderSession(Arc<SessionInner>);

struct SessionInner {
    id: SessionId,
    invalidate_after_first_read: bool,
    alert_message: RwLock<Option<String>>,
    listeners: Mutex<Listeners>,
    router: EventRouter,
}

impl fmt::Debug for NdefReaderSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdefReaderSession")
            .field("id", &self.0.id)
            .field("invalidate_after_first_read", &self.0.invalidate_after_first_read)
            .field("alert_message", &*self.0.alert_message.read())
            .field("listeners", &*self.0.listeners.lock())
            .finish()
    }
}

impl NdefReaderSession {
    /// Create a session and its native counterpart
    ///
    /// The session is registered before the native session is created, so an event sent
    /// right after creation always finds it
    pub fn new(router: &EventRouter, options: SessionOptions) -> Self {
        let SessionOptions { alert_message, invalidate_after_first_read } = options;
        let id = router.next_session_id();

        let session = Self(Arc::new(SessionInner {
            id,
            invalidate_after_first_read,
            alert_message: RwLock::new(alert_message.clone()),
            listeners: Mutex::new(Listeners::new()),
            router: router.clone(),
        }));

        router.registry().insert(session.clone());
        router.native().create_session(id, invalidate_after_first_read, alert_message);

        session
    }

    pub fn id(&self) -> SessionId {
        self.0.id
    }

    pub fn alert_message(&self) -> Option<String> {
        self.0.alert_message.read().clone()
    }

    pub fn invalidate_after_first_read(&self) -> bool {
        self.0.invalidate_after_first_read
    }

    /// Whether the session is still registered, false once released
    pub fn exists(&self) -> bool {
        self.0.router.registry().contains(self.0.id)
    }

    fn ensure_exists(&self) -> Result<(), SessionError> {
        if !self.exists() {
            return Err(SessionError::SessionNoLongerExists(self.0.id));
        }

        Ok(())
    }

    /// Start scanning, every call is forwarded to the native session
    pub fn begin(&self) -> Result<(), SessionError> {
        self.ensure_exists()?;
        self.0.router.native().begin(self.0.id);
        Ok(())
    }

    pub fn invalidate(&self) -> Result<(), SessionError> {
        self.ensure_exists()?;
        self.0.router.native().invalidate(self.0.id);
        Ok(())
    }

    pub fn set_alert_message(&self, alert_message: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_exists()?;

        let alert_message = alert_message.into();
        *self.0.alert_message.write() = Some(alert_message.clone());
        self.0.router.native().set_alert_message(self.0.id, alert_message);

        Ok(())
    }

    /// Release the native session and unregister this one
    ///
    /// Not deduplicated, a second call is forwarded to the native layer again
    pub fn release(&self) {
        self.0.router.native().release(self.0.id);
        if self.0.router.registry().remove(self.0.id).is_none() {
            debug!("session {} was already released", self.0.id);
        }
    }

    pub fn add_event_listener(&self, event_type: EventType, listener: Listener) {
        self.0.listeners.lock().add(event_type, listener);
    }

    pub fn remove_event_listener(
        &self,
        event_type: EventType,
        listener: &Listener,
    ) -> Result<(), SessionError> {
        self.0.listeners.lock().remove(event_type, listener)
    }

    pub fn remove_all_listeners(&self, event_type: EventType) {
        self.0.listeners.lock().clear(event_type);
    }

    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.0.listeners.lock().len(event_type)
    }

    /// Deliver an event to the listeners registered for its type, in registration order
    ///
    /// Listeners run against a snapshot taken before the first one is called. A panicking
    /// listener is logged and does not stop delivery to the others. That relies on unwinding,
    /// a build with `panic = "abort"` takes the whole process down instead.
    pub(crate) fn emit(&self, event: SessionEvent) {
        let event_type = event.event_type();
        let listeners = self.0.listeners.lock().snapshot(event_type);

        debug!(
            "emitting {} to {} listeners on session {}",
            event_type.name(),
            listeners.len(),
            self.0.id
        );

        for listener in listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener(&event)));
            if result.is_err() {
                error!("listener for {} on session {} panicked", event_type.name(), self.0.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::ReadError,
        event::listener,
        test_support::{NativeCommand, RecordingNative},
    };

    fn setup() -> (RecordingNative, EventRouter) {
        let native = RecordingNative::default();
        let router = EventRouter::new(Box::new(native.clone()));
        (native, router)
    }

    fn error_event(message: &str) -> SessionEvent {
        SessionEvent::ErrorOccurred(ReadError::Native(message.to_string()))
    }

    #[test]
    fn test_create_registers_then_creates_native_session() {
        let (native, router) = setup();
        let options =
            SessionOptions::new().alert_message("Hold near tag").invalidate_after_first_read(true);

        let session = NdefReaderSession::new(&router, options);

        assert!(session.exists());
        assert!(router.session(session.id()).is_some());
        assert_eq!(
            native.commands(),
            vec![NativeCommand::Create {
                session_id: session.id(),
                invalidate_after_first_read: true,
                alert_message: Some("Hold near tag".to_string()),
            }]
        );
    }

    #[test]
    fn test_lifecycle_commands_are_forwarded() {
        let (native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());
        let id = session.id();

        session.begin().unwrap();
        session.begin().unwrap();
        session.set_alert_message("Tag found").unwrap();
        session.invalidate().unwrap();
        session.release();

        assert_eq!(session.alert_message(), Some("Tag found".to_string()));
        assert_eq!(
            native.commands()[1..].to_vec(),
            vec![
                NativeCommand::Begin(id),
                NativeCommand::Begin(id),
                NativeCommand::SetAlertMessage(id, "Tag found".to_string()),
                NativeCommand::Invalidate(id),
                NativeCommand::Release(id),
            ]
        );
    }

    #[test]
    fn test_lifecycle_after_release_is_stale() {
        let (native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());
        let id = session.id();

        session.release();
        let commands_after_release = native.commands().len();

        assert_eq!(session.begin(), Err(SessionError::SessionNoLongerExists(id)));
        assert_eq!(session.invalidate(), Err(SessionError::SessionNoLongerExists(id)));
        assert_eq!(session.set_alert_message("late"), Err(SessionError::SessionNoLongerExists(id)));

        assert_eq!(session.alert_message(), None);
        assert_eq!(native.commands().len(), commands_after_release);
    }

    #[test]
    fn test_release_twice_forwards_twice() {
        let (native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        session.release();
        session.release();

        assert_eq!(native.release_count(session.id()), 2);
        assert!(!session.exists());
    }

    #[test]
    fn test_listener_management_needs_no_live_session() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());
        session.release();

        let noop = listener(|_| {});
        session.add_event_listener(EventType::MessagesReceived, noop.clone());
        assert_eq!(session.listener_count(EventType::MessagesReceived), 1);

        session.remove_event_listener(EventType::MessagesReceived, &noop).unwrap();
        assert_eq!(
            session.remove_event_listener(EventType::MessagesReceived, &noop),
            Err(SessionError::ListenerNotFound)
        );
    }

    #[test]
    fn test_emit_in_registration_order() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..4 {
            let order = order.clone();
            session.add_event_listener(
                EventType::ErrorOccurred,
                listener(move |_| order.lock().push(index)),
            );
        }

        session.emit(error_event("timeout"));
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_emit_only_reaches_matching_channel() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        session.add_event_listener(
            EventType::MessagesReceived,
            listener(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        session.emit(error_event("timeout"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        session.emit(SessionEvent::MessagesReceived(vec![]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_removing_itself_and_another_during_emit() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let order = Arc::new(Mutex::new(Vec::new()));

        let last = {
            let order = order.clone();
            listener(move |_| order.lock().push("last"))
        };

        let slot: Arc<Mutex<Option<Listener>>> = Arc::new(Mutex::new(None));
        let first = {
            let order = order.clone();
            let session = session.clone();
            let slot = slot.clone();
            let last = last.clone();

            listener(move |_| {
                order.lock().push("first");

                if let Some(me) = slot.lock().take() {
                    session.remove_event_listener(EventType::ErrorOccurred, &me).unwrap();
                    session.remove_event_listener(EventType::ErrorOccurred, &last).unwrap();
                }
            })
        };

        *slot.lock() = Some(first.clone());
        session.add_event_listener(EventType::ErrorOccurred, first);
        session.add_event_listener(EventType::ErrorOccurred, last);

        // snapshot delivery, both listeners still see the first emit
        session.emit(error_event("one"));
        assert_eq!(*order.lock(), vec!["first", "last"]);

        session.emit(error_event("two"));
        assert_eq!(*order.lock(), vec!["first", "last"]);
        assert_eq!(session.listener_count(EventType::ErrorOccurred), 0);
    }

    #[test]
    fn test_listener_added_during_emit_sees_next_emit() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let late_calls = Arc::new(AtomicUsize::new(0));
        let added = Arc::new(AtomicUsize::new(0));

        let adder = {
            let session = session.clone();
            let late_calls = late_calls.clone();
            let added = added.clone();

            listener(move |_| {
                if added.fetch_add(1, Ordering::SeqCst) > 0 {
                    return;
                }

                let late_calls = late_calls.clone();
                session.add_event_listener(
                    EventType::MessagesReceived,
                    listener(move |_| {
                        late_calls.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            })
        };

        session.add_event_listener(EventType::MessagesReceived, adder);

        session.emit(SessionEvent::MessagesReceived(vec![]));
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        session.emit(SessionEvent::MessagesReceived(vec![]));
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_delivery() {
        let (_native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        session.add_event_listener(
            EventType::ErrorOccurred,
            listener(|_| panic!("listener failure")),
        );
        session.add_event_listener(
            EventType::ErrorOccurred,
            listener(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        session.emit(error_event("timeout"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_from_inside_listener() {
        let (native, router) = setup();
        let session = NdefReaderSession::new(&router, SessionOptions::default());

        let releaser = {
            let session = session.clone();
            listener(move |_| session.release())
        };

        session.add_event_listener(EventType::MessagesReceived, releaser);
        router.messages_received(session.id(), vec![]);

        assert!(!session.exists());
        assert_eq!(native.release_count(session.id()), 1);
    }
}
