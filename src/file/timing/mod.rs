mod smpte;
pub use smpte::*;

use crate::reader::{ReadResult, Reader, ReaderError};

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format. The top bit of the 16-bit division word
/// selects between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte(SmpteHeader),
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote {
            inner: tpqn & 0x7FFF,
        })
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let position = reader.buffer_position();
        let bytes: [u8; 2] = reader.read_exact_size()?;
        match bytes[0] >> 7 {
            0 => Ok(Self::TicksPerQuarterNote(TicksPerQuarterNote {
                inner: u16::from_be_bytes(bytes),
            })),
            _ => {
                let fps = SmpteFps::from_division_byte(bytes[0])
                    .ok_or(ReaderError::invalid_header(position))?;
                Ok(Self::new_smpte(fps, bytes[1]))
            }
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }

    /// True if tempo changes affect how ticks map to time
    pub const fn is_metrical(&self) -> bool {
        matches!(self, Self::TicksPerQuarterNote(_))
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote {
    inner: u16,
}
impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.inner & 0x7FFF
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    fps: SmpteFps,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    /// Ticks elapsing in one second of playback.
    pub fn ticks_per_second(&self) -> f64 {
        self.fps.as_f64() * self.ticks_per_frame as f64
    }
}

#[test]
fn read_metrical_division() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x01, 0xE0]);
    let timing = Timing::read(&mut reader).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(480));
    assert!(timing.is_metrical());
}

#[test]
fn read_smpte_division() {
    use pretty_assertions::assert_eq;
    // -25 fps, 40 ticks per frame
    let mut reader = Reader::from_byte_slice(&[0xE7, 0x28]);
    let Timing::Smpte(smpte) = Timing::read(&mut reader).unwrap() else {
        panic!("expected smpte timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(smpte.ticks_per_second(), 1000.);
}

#[test]
fn reject_unknown_smpte_rate() {
    use crate::reader::ReaderErrorKind;
    let mut reader = Reader::from_byte_slice(&[0xF0, 0x28]);
    let err = Timing::read(&mut reader).unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::InvalidHeader);
}
