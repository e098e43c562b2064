pub mod error;
pub mod event;
pub mod ffi;
pub mod native;
pub mod read_tag;
pub mod registry;
pub mod router;
pub mod session;

pub(crate) mod logging;

#[cfg(test)]
mod test_support;

pub use error::{ReadError, SessionError};
pub use event::{EventType, Listener, SessionEvent, listener};
pub use native::NfcNativeModule;
pub use ndef_record::{NdefMessage, NdefRecord, NdefType, RawNdefMessage, RawNdefRecord};
pub use read_tag::ReadTag;
pub use router::EventRouter;
pub use session::{NdefReaderSession, SessionId, SessionOptions};

uniffi::setup_scaffolding!();
