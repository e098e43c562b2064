use crate::session::SessionId;

/// Errors raised synchronously by session operations
#[derive(Debug, Clone, Hash, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum SessionError {
    /// The session was released, create a new one to read again
    #[error("session {0} does not exist anymore")]
    SessionNoLongerExists(SessionId),

    #[error("event type {0} is not supported")]
    UnsupportedEventType(String),

    #[error("cannot find event listener")]
    ListenerNotFound,

    #[error("ndef reader is not initialized, call init_ndef_reader first")]
    NotInitialized,
}

/// Errors delivered on the error channel of a session
#[derive(Debug, Clone, Hash, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum ReadError {
    /// Opaque error reported by the native layer
    #[error("{0}")]
    Native(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("unable to start reading: {0}")]
    Session(String),

    #[error("read was cancelled before a tag was read")]
    Cancelled,
}

impl From<SessionError> for ReadError {
    fn from(error: SessionError) -> Self {
        Self::Session(error.to_string())
    }
}
