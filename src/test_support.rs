//! Native module test double that records every command it receives

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::{native::NfcNativeModule, session::SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCommand {
    Create {
        session_id: SessionId,
        invalidate_after_first_read: bool,
        alert_message: Option<String>,
    },
    Begin(SessionId),
    Invalidate(SessionId),
    Release(SessionId),
    SetAlertMessage(SessionId, String),
}

#[derive(Debug, Clone)]
pub struct RecordingNative {
    commands: Arc<Mutex<Vec<NativeCommand>>>,
    reading_available: Arc<AtomicBool>,
}

impl Default for RecordingNative {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RecordingNative {
    pub fn new(reading_available: bool) -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            reading_available: Arc::new(AtomicBool::new(reading_available)),
        }
    }

    pub fn set_reading_available(&self, reading_available: bool) {
        self.reading_available.store(reading_available, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<NativeCommand> {
        self.commands.lock().clone()
    }

    pub fn release_count(&self, session_id: SessionId) -> usize {
        self.count(|command| *command == NativeCommand::Release(session_id))
    }

    pub fn invalidate_count(&self, session_id: SessionId) -> usize {
        self.count(|command| *command == NativeCommand::Invalidate(session_id))
    }

    pub fn begin_count(&self, session_id: SessionId) -> usize {
        self.count(|command| *command == NativeCommand::Begin(session_id))
    }

    fn count(&self, predicate: impl Fn(&NativeCommand) -> bool) -> usize {
        self.commands.lock().iter().filter(|command| predicate(command)).count()
    }

    fn record(&self, command: NativeCommand) {
        self.commands.lock().push(command);
    }
}

impl NfcNativeModule for RecordingNative {
    fn create_session(
        &self,
        session_id: SessionId,
        invalidate_after_first_read: bool,
        alert_message: Option<String>,
    ) {
        self.record(NativeCommand::Create { session_id, invalidate_after_first_read, alert_message });
    }

    fn begin(&self, session_id: SessionId) {
        self.record(NativeCommand::Begin(session_id));
    }

    fn invalidate(&self, session_id: SessionId) {
        self.record(NativeCommand::Invalidate(session_id));
    }

    fn release(&self, session_id: SessionId) {
        self.record(NativeCommand::Release(session_id));
    }

    fn set_alert_message(&self, session_id: SessionId, alert_message: String) {
        self.record(NativeCommand::SetAlertMessage(session_id, alert_message));
    }

    fn reading_available(&self) -> bool {
        self.reading_available.load(Ordering::SeqCst)
    }
}
