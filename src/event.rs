//! Event channels a session delivers to its listeners

use std::sync::Arc;

use ndef_record::NdefMessage;

use crate::error::{ReadError, SessionError};

/// The two channels the native layer emits on
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
    uniffi::Enum,
)]
pub enum EventType {
    #[strum(to_string = "NDEFMessages", serialize = "messages_received")]
    MessagesReceived,

    #[strum(to_string = "NDEFError", serialize = "error_occurred")]
    ErrorOccurred,
}

impl EventType {
    /// Look up an event type by the name a dynamic frontend uses for it
    pub fn from_name(name: &str) -> Result<Self, SessionError> {
        name.parse().map_err(|_| SessionError::UnsupportedEventType(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessagesReceived(Vec<NdefMessage>),
    ErrorOccurred(ReadError),
}

impl SessionEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MessagesReceived(_) => EventType::MessagesReceived,
            Self::ErrorOccurred(_) => EventType::ErrorOccurred,
        }
    }
}

/// Callback registered on a session, compared by identity when removed
pub type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync + 'static>;

pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&SessionEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
