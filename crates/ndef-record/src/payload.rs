//! Transport decoding for record payloads
//!
//! The native bridge hands payload bytes over as a base64 string

use base64::{Engine as _, prelude::BASE64_STANDARD};

use crate::RecordFormatError;

/// Decode a base64 payload, an empty string means the record has no payload
pub fn decode(encoded: &str) -> Result<Option<Vec<u8>>, RecordFormatError> {
    if encoded.is_empty() {
        return Ok(None);
    }

    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|error| RecordFormatError::InvalidPayload(error.to_string()))?;

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(bytes))
}
