//! Surface exported to the platform side through uniffi

use std::sync::Arc;

use ndef_record::{NdefMessage, RawNdefMessage};
use parking_lot::Mutex;
use tracing::warn;

use crate::{
    error::{ReadError, SessionError},
    event::{EventType, Listener, SessionEvent, listener},
    native::NfcNativeModule,
    router::EventRouter,
    session::{NdefReaderSession, SessionId, SessionOptions},
};

/// Install the native module, call once before creating any session
#[uniffi::export]
pub fn init_ndef_reader(native: Box<dyn NfcNativeModule>) {
    crate::logging::init();
    EventRouter::init(native);
}

#[uniffi::export]
pub fn ndef_reading_available() -> bool {
    EventRouter::try_global().is_some_and(EventRouter::reading_available)
}

/// Native "messages received" event
#[uniffi::export]
pub fn ndef_messages_received(session_id: SessionId, messages: Vec<RawNdefMessage>) {
    match EventRouter::try_global() {
        Some(router) => router.messages_received(session_id, messages),
        None => warn!("messages received before the ndef reader was initialized"),
    }
}

/// Native "error occurred" event
#[uniffi::export]
pub fn ndef_error_occurred(session_id: SessionId, error: String) {
    match EventRouter::try_global() {
        Some(router) => router.error_occurred(session_id, error),
        None => warn!("error received before the ndef reader was initialized: {error}"),
    }
}

/// Read a single tag, resolves with its messages or the first error
#[uniffi::export]
pub async fn read_ndef_tag(alert_message: Option<String>) -> Result<Vec<NdefMessage>, ReadError> {
    let router = EventRouter::try_global().ok_or(SessionError::NotInitialized)?;
    NdefReaderSession::read_tag(router, alert_message).await
}

#[uniffi::export(callback_interface)]
pub trait NdefSessionListener: Send + Sync + 'static {
    fn on_messages(&self, messages: Vec<NdefMessage>);
    fn on_error(&self, error: String);
}

#[derive(uniffi::Object)]
pub struct FfiNdefReaderSession {
    session: NdefReaderSession,

    /// Listeners added from the platform side, with the channel each is registered on
    listeners: Mutex<Vec<(EventType, Listener)>>,
}

impl FfiNdefReaderSession {
    fn with_router(router: &EventRouter, options: SessionOptions) -> Self {
        Self { session: NdefReaderSession::new(router, options), listeners: Mutex::new(Vec::new()) }
    }

    fn forward(&self, event_types: &[EventType], callback: Box<dyn NdefSessionListener>) {
        let forward: Arc<dyn NdefSessionListener> = Arc::from(callback);

        let listener = listener(move |event| match event {
            SessionEvent::MessagesReceived(messages) => forward.on_messages(messages.clone()),
            SessionEvent::ErrorOccurred(error) => forward.on_error(error.to_string()),
        });

        let mut listeners = self.listeners.lock();
        for &event_type in event_types {
            self.session.add_event_listener(event_type, listener.clone());
            listeners.push((event_type, listener.clone()));
        }
    }
}

#[uniffi::export]
impl FfiNdefReaderSession {
    #[uniffi::constructor]
    pub fn new(
        alert_message: Option<String>,
        invalidate_after_first_read: bool,
    ) -> Result<Self, SessionError> {
        let router = EventRouter::try_global().ok_or(SessionError::NotInitialized)?;
        let options = SessionOptions { alert_message, invalidate_after_first_read };

        Ok(Self::with_router(router, options))
    }

    pub fn id(&self) -> SessionId {
        self.session.id()
    }

    pub fn alert_message(&self) -> Option<String> {
        self.session.alert_message()
    }

    pub fn begin(&self) -> Result<(), SessionError> {
        self.session.begin()
    }

    pub fn invalidate(&self) -> Result<(), SessionError> {
        self.session.invalidate()
    }

    pub fn set_alert_message(&self, alert_message: String) -> Result<(), SessionError> {
        self.session.set_alert_message(alert_message)
    }

    pub fn release(&self) {
        self.session.release();
    }

    /// Forward both event channels of this session to `callback`
    pub fn add_listener(&self, callback: Box<dyn NdefSessionListener>) {
        self.forward(&[EventType::MessagesReceived, EventType::ErrorOccurred], callback);
    }

    /// Forward a single event channel to `callback`
    pub fn add_listener_for(&self, event_type: EventType, callback: Box<dyn NdefSessionListener>) {
        self.forward(&[event_type], callback);
    }

    /// Same as [`Self::add_listener_for`] with the channel given by name, for frontends that
    /// only carry strings
    pub fn add_listener_named(
        &self,
        event_name: String,
        callback: Box<dyn NdefSessionListener>,
    ) -> Result<(), SessionError> {
        let event_type = EventType::from_name(&event_name)?;
        self.forward(&[event_type], callback);
        Ok(())
    }

    /// Drop every listener on one channel, including ones not added through this object
    pub fn remove_all_listeners(&self, event_type: EventType) {
        self.session.remove_all_listeners(event_type);
        self.listeners.lock().retain(|(registered, _)| *registered != event_type);
    }

    /// Remove every listener added through this object
    pub fn remove_listeners(&self) {
        let listeners = std::mem::take(&mut *self.listeners.lock());

        for (event_type, listener) in listeners {
            if let Err(error) = self.session.remove_event_listener(event_type, &listener) {
                warn!("unable to remove listener: {error}");
            }
        }
    }
}
