use ahash::AHashMap;
use parking_lot::Mutex;

use crate::session::{NdefReaderSession, SessionId};

/// Live sessions by id, the only way a native event finds its session
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<AHashMap<SessionId, NdefReaderSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, session: NdefReaderSession) {
        self.sessions.lock().insert(session.id(), session);
    }

    pub(crate) fn remove(&self, id: SessionId) -> Option<NdefReaderSession> {
        self.sessions.lock().remove(&id)
    }

    /// Returns a handle to the session, the registry lock is not held after this returns
    pub fn get(&self, id: SessionId) -> Option<NdefReaderSession> {
        self.sessions.lock().get(&id).cloned()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn drain(&self) -> Vec<NdefReaderSession> {
        self.sessions.lock().drain().map(|(_, session)| session).collect()
    }
}
