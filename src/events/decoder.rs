use super::{ChannelStatus, EventKind, RawEvent};
use crate::{
    file::meta::END_OF_TRACK,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};
use alloc::vec::Vec;

#[doc = r#"
Decodes the events of a single track, one at a time.

The decoder owns the track's running status: when an event starts with a data
byte (top bit clear) the previous channel status is reused and the byte is
treated as the first data byte. Meta, system exclusive and real-time events
leave the running status untouched; system common messages (`0xF1..=0xF6`)
cancel it.

Decoding stops after the end-of-track meta event; anything after it is ignored.

# Example
```rust
# use midi_timeline::prelude::*;
// note on, then a running-status note on with velocity 0
let bytes = [0x00, 0x90, 0x3C, 0x64, 0x60, 0x3C, 0x00];
let events = TrackDecoder::new(&bytes, 0).decode_all().unwrap();
assert_eq!(events.len(), 2);
assert!(events[1].is_note_end());
assert_eq!(events[1].absolute_tick(), 96);
```
"#]
#[derive(Debug, Clone)]
pub struct TrackDecoder<'a> {
    reader: Reader<'a>,
    running_status: Option<u8>,
    tick: u64,
    finished: bool,
}

impl<'a> TrackDecoder<'a> {
    /// Create a decoder for track data that starts `offset` bytes into the file.
    pub const fn new(data: &'a [u8], offset: usize) -> Self {
        Self {
            reader: Reader::with_offset(data, offset),
            running_status: None,
            tick: 0,
            finished: false,
        }
    }

    /// The channel status that a data-leading event would reuse.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// Decode the next event, or `None` once the track is exhausted.
    pub fn next_event(&mut self) -> ReadResult<Option<RawEvent<'a>>> {
        if self.finished || self.reader.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        let delta_ticks = self.reader.read_vlq()?;
        self.tick += delta_ticks as u64;

        let position = self.reader.buffer_position();
        let lead = self.reader.peek_u8()?;
        let status = if lead & 0x80 == 0 {
            self.running_status
                .ok_or(ReaderError::new(position, ReaderErrorKind::UnknownStatus(lead)))?
        } else {
            self.reader.read_u8()?;
            lead
        };

        let mut channel = None;
        let mut data = [0; 2];
        let kind = match status {
            0xFF => {
                let meta_type = self.reader.read_u8()?;
                let len = self.reader.read_vlq()?;
                let payload = self.reader.read_slice(len as usize)?;
                if meta_type == END_OF_TRACK {
                    self.finished = true;
                }
                EventKind::Meta { meta_type, payload }
            }
            0xF0 | 0xF7 => {
                let len = self.reader.read_vlq()?;
                let payload = self.reader.read_slice(len as usize)?;
                EventKind::SysEx { payload }
            }
            // system common cancels running status, real-time bytes do not
            0xF1 | 0xF3 => {
                self.running_status = None;
                self.reader.read_u8()?;
                EventKind::Other
            }
            0xF2 => {
                self.running_status = None;
                self.reader.read_u16()?;
                EventKind::Other
            }
            0xF4..=0xF6 => {
                self.running_status = None;
                EventKind::Other
            }
            0xF8..=0xFE => EventKind::Other,
            _ => {
                let message = ChannelStatus::try_from(status >> 4).map_err(|_| {
                    ReaderError::new(position, ReaderErrorKind::UnknownStatus(status))
                })?;
                self.running_status = Some(status);
                channel = Some(status & 0x0F);
                for byte in data.iter_mut().take(message.data_len()) {
                    *byte = self.reader.read_u8()? & 0x7F;
                }
                message.kind()
            }
        };

        Ok(Some(RawEvent::new(
            delta_ticks,
            self.tick,
            channel,
            kind,
            data,
        )))
    }

    /// Decode every remaining event.
    pub fn decode_all(mut self) -> ReadResult<Vec<RawEvent<'a>>> {
        let mut events = Vec::with_capacity(self.reader.remaining() / 3);
        while let Some(event) = self.next_event()? {
            events.push(event);
        }
        Ok(events)
    }
}

impl<'a> Iterator for TrackDecoder<'a> {
    type Item = ReadResult<RawEvent<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(e) => {
                //Don't decode from the middle of a malformed event
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[test]
fn decode_meta_and_sysex() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
        0x10, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ];
    let events = TrackDecoder::new(&bytes, 0).decode_all().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(
        *events[0].kind(),
        EventKind::Meta {
            meta_type: 0x51,
            payload: &[0x07, 0xA1, 0x20]
        }
    );
    assert_eq!(
        *events[1].kind(),
        EventKind::SysEx {
            payload: &[0x43, 0x12, 0xF7]
        }
    );
    assert_eq!(events[1].absolute_tick(), 16);
    assert_eq!(events[2].channel(), None);
}

#[test]
fn running_status_survives_meta_events() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x00, 0xC2, 0x05, // program change, channel 3
        0x00, 0x92, 0x40, 0x50, // note on
        0x00, 0xFF, 0x01, 0x01, b'x', // text meta
        0x0A, 0x40, 0x00, // running status note on, velocity 0
    ];
    let events = TrackDecoder::new(&bytes, 0).decode_all().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(*events[0].kind(), EventKind::ProgramChange);
    assert_eq!(events[0].data(), [0x05, 0x00]);
    assert_eq!(events[3].channel(), Some(2));
    assert_eq!(events[3].key(), 0x40);
    assert!(events[3].is_note_end());
    assert_eq!(events[3].absolute_tick(), 10);
}

#[test]
fn system_common_cancels_running_status() {
    use pretty_assertions::assert_eq;
    #[rustfmt::skip]
    let bytes = [
        0x00, 0x90, 0x3C, 0x64,
        0x00, 0xF8,             // timing clock keeps it
        0x00, 0x3E, 0x64,
        0x00, 0xF6,             // tune request cancels it
        0x00, 0x40, 0x64,
    ];
    let mut decoder = TrackDecoder::new(&bytes, 0);
    for _ in 0..3 {
        assert!(decoder.next_event().unwrap().is_some());
    }
    assert_eq!(decoder.running_status(), Some(0x90));
    assert!(matches!(
        decoder.next_event().unwrap().map(|event| *event.kind()),
        Some(EventKind::Other)
    ));
    assert_eq!(decoder.running_status(), None);
    let err = decoder.next_event().unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::UnknownStatus(0x40));
    assert_eq!(err.position(), 12);
}

#[test]
fn data_byte_without_running_status() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x3C, 0x40];
    let err = TrackDecoder::new(&bytes, 100).decode_all().unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::UnknownStatus(0x3C));
    assert_eq!(err.position(), 101);
}

#[test]
fn short_channel_message_is_truncated() {
    let bytes = [0x00, 0x90, 0x3C];
    let err = TrackDecoder::new(&bytes, 0).decode_all().unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn bytes_after_end_of_track_are_ignored() {
    let bytes = [0x00, 0xFF, 0x2F, 0x00, 0x12, 0x34];
    let events = TrackDecoder::new(&bytes, 0).decode_all().unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn iterator_stops_after_error() {
    let bytes = [0x00, 0x3C, 0x40, 0x00, 0x90, 0x3C, 0x40];
    let mut decoder = TrackDecoder::new(&bytes, 0);
    assert!(decoder.next().unwrap().is_err());
    assert!(decoder.next().is_none());
}
