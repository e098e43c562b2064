//! Command sink into the platform NFC implementation

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::session::SessionId;

/// Implemented by the platform binding, every command is fire and forget
#[uniffi::export(callback_interface)]
pub trait NfcNativeModule: Send + Sync + 'static {
    fn create_session(
        &self,
        session_id: SessionId,
        invalidate_after_first_read: bool,
        alert_message: Option<String>,
    );

    fn begin(&self, session_id: SessionId);

    fn invalidate(&self, session_id: SessionId);

    fn release(&self, session_id: SessionId);

    fn set_alert_message(&self, session_id: SessionId, alert_message: String);

    /// Whether the device can read NDEF tags at all
    fn reading_available(&self) -> bool;
}

#[derive(Clone)]
pub struct NativeModule(Arc<Box<dyn NfcNativeModule>>);

impl fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeModule").finish_non_exhaustive()
    }
}

impl NativeModule {
    pub fn new(native: Box<dyn NfcNativeModule>) -> Self {
        Self(Arc::new(native))
    }

    pub fn create_session(
        &self,
        session_id: SessionId,
        invalidate_after_first_read: bool,
        alert_message: Option<String>,
    ) {
        debug!("native create session {session_id}, invalidate after first read: {invalidate_after_first_read}");
        self.0.create_session(session_id, invalidate_after_first_read, alert_message);
    }

    pub fn begin(&self, session_id: SessionId) {
        debug!("native begin session {session_id}");
        self.0.begin(session_id);
    }

    pub fn invalidate(&self, session_id: SessionId) {
        debug!("native invalidate session {session_id}");
        self.0.invalidate(session_id);
    }

    pub fn release(&self, session_id: SessionId) {
        debug!("native release session {session_id}");
        self.0.release(session_id);
    }

    pub fn set_alert_message(&self, session_id: SessionId, alert_message: String) {
        debug!("native set alert message on session {session_id}");
        self.0.set_alert_message(session_id, alert_message);
    }

    pub fn reading_available(&self) -> bool {
        self.0.reading_available()
    }
}
