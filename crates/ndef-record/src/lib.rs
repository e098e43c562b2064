uniffi::setup_scaffolding!();

pub mod message;
pub mod ndef_type;
pub mod payload;
pub mod record;

pub use message::{NdefMessage, RawNdefMessage};
pub use ndef_type::NdefType;
pub use record::{NdefRecord, RawNdefRecord};

/// Reasons a raw record coming off the native bridge cannot be formatted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum RecordFormatError {
    /// Only codes 0 through 6 name a record category
    #[error("unknown type name format code {0}, expected 0-6")]
    UnknownTypeNameFormat(u8),

    #[error("payload is not valid base64: {0}")]
    InvalidPayload(String),
}

pub type Error = RecordFormatError;
pub type Result<T, E = Error> = std::result::Result<T, E>;
