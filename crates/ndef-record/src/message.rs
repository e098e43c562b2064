use crate::{
    RecordFormatError,
    record::{NdefRecord, RawNdefRecord, format_record},
};

/// An NDEF message as delivered by the native bridge, records in tag order
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct RawNdefMessage {
    pub records: Vec<RawNdefRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl TryFrom<RawNdefMessage> for NdefMessage {
    type Error = RecordFormatError;

    fn try_from(raw: RawNdefMessage) -> Result<Self, Self::Error> {
        format_message(raw)
    }
}

/// Format every record of a message, keeping the order they were read off the tag
///
/// Fails on the first record that cannot be formatted
pub fn format_message(raw: RawNdefMessage) -> Result<NdefMessage, RecordFormatError> {
    let records = raw.records.into_iter().map(format_record).collect::<Result<Vec<_>, _>>()?;

    Ok(NdefMessage { records })
}

/// Format a batch of messages from a single read
pub fn format_messages(raw: Vec<RawNdefMessage>) -> Result<Vec<NdefMessage>, RecordFormatError> {
    raw.into_iter().map(format_message).collect()
}
