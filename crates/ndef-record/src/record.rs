use crate::{NdefType, RecordFormatError, payload};

/// A record exactly as the native bridge delivers it
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct RawNdefRecord {
    pub type_: Vec<u8>,
    pub type_name_format: u8,
    pub identifier: Vec<u8>,

    /// base64 encoded payload bytes
    pub payload: String,
}

/// A record in the shape handed to application code
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefRecord {
    pub type_: Option<Vec<u8>>,
    pub type_name_format: NdefType,
    pub identifier: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
}

impl TryFrom<RawNdefRecord> for NdefRecord {
    type Error = RecordFormatError;

    fn try_from(raw: RawNdefRecord) -> Result<Self, Self::Error> {
        format_record(raw)
    }
}

/// Normalize a raw record, empty byte strings become `None`
pub fn format_record(raw: RawNdefRecord) -> Result<NdefRecord, RecordFormatError> {
    let type_name_format = NdefType::try_from(raw.type_name_format)?;
    let payload = payload::decode(&raw.payload)?;

    Ok(NdefRecord {
        type_: non_empty(raw.type_),
        type_name_format,
        identifier: non_empty(raw.identifier),
        payload,
    })
}

fn non_empty(bytes: Vec<u8>) -> Option<Vec<u8>> {
    if bytes.is_empty() {
        return None;
    }

    Some(bytes)
}

// only used for uniffi
mod ffi {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
    pub struct NdefRecordReader {
        record: NdefRecord,
    }

    #[uniffi::export]
    impl NdefRecordReader {
        #[uniffi::constructor]
        pub fn new(record: NdefRecord) -> Self {
            Self { record }
        }

        pub fn type_(&self) -> Option<String> {
            let type_ = self.record.type_.as_ref()?;
            String::from_utf8(type_.clone()).ok()
        }

        pub fn identifier(&self) -> Option<String> {
            let identifier = self.record.identifier.as_ref()?;
            String::from_utf8(identifier.clone()).ok()
        }

        pub fn type_name_format(&self) -> String {
            self.record.type_name_format.name().to_string()
        }

        pub fn payload_string(&self) -> Option<String> {
            let payload = self.record.payload.as_ref()?;
            String::from_utf8(payload.clone()).ok()
        }
    }
}
