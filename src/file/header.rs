use crate::{
    file::{FormatType, Timing},
    reader::{ReadResult, Reader, ReaderError},
};

/// The length every `MThd` chunk must declare.
pub const HEADER_LENGTH: u32 = 6;

#[doc = r#"
   The contents of the `MThd` chunk: format, declared track count and timing.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// Create a new header
    pub const fn new(format: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }

    /// Read the six data bytes of a header chunk.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let position = reader.buffer_position();
        let format = FormatType::try_from(reader.read_u16()?)
            .map_err(|_| ReaderError::invalid_header(position))?;
        let track_count = reader.read_u16()?;
        let timing = Timing::read(reader)?;
        Ok(Self::new(format, track_count, timing))
    }

    /// The file's format word
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// The number of tracks the header declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }
    /// Get the timing props
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
}

#[test]
fn read_header_fields() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x01, 0x00, 0x03, 0x00, 0x60];
    let header = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(header.format(), FormatType::Simultaneous);
    assert_eq!(header.track_count(), 3);
    assert_eq!(header.timing().ticks_per_quarter_note(), Some(96));
}

#[test]
fn reject_unknown_format() {
    use crate::reader::ReaderErrorKind;
    let bytes = [0x00, 0x07, 0x00, 0x01, 0x00, 0x60];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::InvalidHeader);
}
