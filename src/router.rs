//! Routes native events to the session they belong to

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use ndef_record::{RawNdefMessage, message::format_messages};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    error::ReadError,
    event::SessionEvent,
    native::{NativeModule, NfcNativeModule},
    registry::SessionRegistry,
    session::{NdefReaderSession, SessionId},
};

static ROUTER: OnceCell<EventRouter> = OnceCell::new();

/// Single subscriber to the native event channels
///
/// Owns the session registry and the session id counter
#[derive(Debug, Clone)]
pub struct EventRouter(Arc<RouterState>);

#[derive(Debug)]
struct RouterState {
    native: NativeModule,
    registry: SessionRegistry,
    next_session_id: AtomicU64,

    /// Queried once from the native module when the router is created
    reading_available: bool,
}

impl EventRouter {
    pub fn new(native: Box<dyn NfcNativeModule>) -> Self {
        let native = NativeModule::new(native);
        let reading_available = native.reading_available();

        Self(Arc::new(RouterState {
            native,
            registry: SessionRegistry::new(),
            next_session_id: AtomicU64::new(0),
            reading_available,
        }))
    }

    /// Install the process wide router, later calls return the router installed first
    pub fn init(native: Box<dyn NfcNativeModule>) -> &'static Self {
        let mut installed = false;
        let router = ROUTER.get_or_init(|| {
            installed = true;
            Self::new(native)
        });

        if !installed {
            warn!("event router is already initialized");
        }

        router
    }

    /// Returns the global router, `None` until [`Self::init`] has run
    pub fn try_global() -> Option<&'static Self> {
        ROUTER.get()
    }

    pub fn reading_available(&self) -> bool {
        self.0.reading_available
    }

    pub fn session(&self, id: SessionId) -> Option<NdefReaderSession> {
        self.0.registry.get(id)
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.0.registry
    }

    /// Handle the native "messages received" event
    ///
    /// Events for sessions that were already released are dropped
    pub fn messages_received(&self, session_id: SessionId, messages: Vec<RawNdefMessage>) {
        debug!("messages received for session {session_id}: {messages:?}");

        let Some(session) = self.0.registry.get(session_id) else {
            debug!("no session {session_id}, dropping messages");
            return;
        };

        let event = match format_messages(messages) {
            Ok(messages) => SessionEvent::MessagesReceived(messages),
            Err(error) => {
                warn!("unable to format messages for session {session_id}: {error}");
                SessionEvent::ErrorOccurred(ReadError::MalformedRecord(error.to_string()))
            }
        };

        session.emit(event);
    }

    /// Handle the native "error occurred" event
    pub fn error_occurred(&self, session_id: SessionId, error: String) {
        debug!("error received for session {session_id}: {error}");

        let Some(session) = self.0.registry.get(session_id) else {
            debug!("no session {session_id}, dropping error");
            return;
        };

        session.emit(SessionEvent::ErrorOccurred(ReadError::Native(error)));
    }

    /// Release every live session, used when the native module goes away
    ///
    /// Each released session gets a final `ReadError::Cancelled` on its error channel, so
    /// pending reads settle instead of waiting on events that can no longer be routed
    pub fn teardown(&self) {
        let sessions = self.0.registry.drain();
        debug!("tearing down {} sessions", sessions.len());

        for session in &sessions {
            self.0.native.release(session.id());
        }

        for session in sessions {
            session.emit(SessionEvent::ErrorOccurred(ReadError::Cancelled));
        }
    }

    pub(crate) fn native(&self) -> &NativeModule {
        &self.0.native
    }

    pub(crate) fn next_session_id(&self) -> SessionId {
        SessionId::from(self.0.next_session_id.fetch_add(1, Ordering::Relaxed))
    }
}
