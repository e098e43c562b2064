use crate::RecordFormatError;

/// Type name format of a record, the 3 bit TNF field of the NDEF header
///
/// The string form of each variant is the name handed to application code
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
    uniffi::Enum,
)]
pub enum NdefType {
    #[strum(serialize = "EMPTY_RECORD")]
    Empty,
    #[strum(serialize = "WELL_KNOWN_RECORD")]
    WellKnown,
    #[strum(serialize = "MIME_MEDIA_RECORD")]
    MimeMedia,
    #[strum(serialize = "ABSOLUTE_URI_RECORD")]
    AbsoluteUri,
    #[strum(serialize = "EXTERNAL_RECORD")]
    External,
    #[strum(serialize = "UNKNOWN_RECORD")]
    Unknown,
    #[strum(serialize = "UNCHANGED_RECORD")]
    Unchanged,
}

impl NdefType {
    /// The native integer code for this type
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WellKnown => 1,
            Self::MimeMedia => 2,
            Self::AbsoluteUri => 3,
            Self::External => 4,
            Self::Unknown => 5,
            Self::Unchanged => 6,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<u8> for NdefType {
    type Error = RecordFormatError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let ndef_type = match code {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::MimeMedia,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            code => return Err(RecordFormatError::UnknownTypeNameFormat(code)),
        };

        Ok(ndef_type)
    }
}

impl std::fmt::Display for NdefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

mod ffi {
    use super::NdefType;

    #[uniffi::export]
    fn ndef_type_name(ndef_type: NdefType) -> String {
        ndef_type.name().to_string()
    }
}
