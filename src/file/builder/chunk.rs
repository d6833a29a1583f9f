#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length and then the chunk data.

- `MThd`: the header chunk. Must come first and always declares a length of 6.
- `MTrk`: a track chunk holding delta-timed events.
- Anything else is an unknown chunk. Unknown chunks are skipped by their declared
  length so that newer files remain readable.

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Optional Unknown Chunk]
[Track Chunk 2: "MTrk"]
...
```
"#]

use crate::{
    events::{RawEvent, TrackDecoder},
    file::{HEADER_LENGTH, Header},
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::vec::Vec;

/// Type identifier of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// Type identifier of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// One chunk read from a file.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkEvent<'a> {
    /// An `MThd` chunk
    Header(Header),
    /// An `MTrk` chunk
    Track(TrackChunk<'a>),
    /// Any other chunk type
    Unknown(UnknownChunk<'a>),
    /// No bytes left
    Eof,
}

impl ChunkEvent<'_> {
    /// True if the end of the buffer was reached
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// The raw bytes of an `MTrk` chunk, not yet decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackChunk<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> TrackChunk<'a> {
    /// Wrap track data that begins `offset` bytes into the file.
    pub const fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }
    /// The undecoded event bytes
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
    /// Where the track data starts in the file
    pub const fn offset(&self) -> usize {
        self.offset
    }
    /// Decode every event in the track.
    pub fn events(&self) -> ReadResult<Vec<RawEvent<'a>>> {
        TrackDecoder::new(self.data, self.offset).decode_all()
    }
}

/// A chunk whose type identifier is neither `MThd` nor `MTrk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownChunk<'a> {
    tag: [u8; 4],
    data: &'a [u8],
}

impl<'a> UnknownChunk<'a> {
    /// The four byte type identifier
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }
    /// The chunk's payload
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl<'slc> Reader<'slc> {
    /// Read the leading `MThd` chunk.
    ///
    /// # Errors
    /// - [`InvalidHeader`](crate::ReaderErrorKind::InvalidHeader) if the type identifier
    ///   is not `MThd` or the declared length is not 6
    /// - [`TruncatedStream`](crate::ReaderErrorKind::TruncatedStream) if the buffer ends early
    pub fn read_header_chunk(&mut self) -> ReadResult<Header> {
        let position = self.buffer_position();
        if self.remaining() < HEADER_TAG.len() {
            return Err(ReaderError::truncated(position));
        }
        let mut peek = self.clone();
        if peek.read_exact_size::<4>()? != HEADER_TAG {
            return Err(ReaderError::invalid_header(position));
        }
        match self.read_chunk()? {
            ChunkEvent::Header(header) => Ok(header),
            _ => Err(ReaderError::invalid_header(position)),
        }
    }

    /// Read the next chunk, skipping over its data.
    pub fn read_chunk(&mut self) -> ReadResult<ChunkEvent<'slc>> {
        if self.is_empty() {
            return Ok(ChunkEvent::Eof);
        }
        let position = self.buffer_position();
        let tag: [u8; 4] = self.read_exact_size()?;
        let len = self.read_u32()?;

        if tag == HEADER_TAG && len != HEADER_LENGTH {
            return Err(ReaderError::invalid_header(position));
        }

        let offset = self.buffer_position();
        let data = self.read_slice(len as usize)?;

        Ok(match tag {
            HEADER_TAG => {
                ChunkEvent::Header(Header::read(&mut Reader::with_offset(data, offset))?)
            }
            TRACK_TAG => ChunkEvent::Track(TrackChunk::new(data, offset)),
            tag => ChunkEvent::Unknown(UnknownChunk { tag, data }),
        })
    }
}

#[test]
fn read_chunks_in_sequence() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, //
        b'X', b'Y', b'Z', b'W', 0, 0, 0, 2, 0xAA, 0xBB, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(matches!(reader.read_chunk().unwrap(), ChunkEvent::Header(_)));

    let ChunkEvent::Unknown(unknown) = reader.read_chunk().unwrap() else {
        panic!("expected unknown chunk");
    };
    assert_eq!(&unknown.tag(), b"XYZW");
    assert_eq!(unknown.data(), &[0xAA, 0xBB]);

    let ChunkEvent::Track(track) = reader.read_chunk().unwrap() else {
        panic!("expected track chunk");
    };
    assert_eq!(track.offset(), 32);
    assert_eq!(track.data().len(), 4);

    assert!(reader.read_chunk().unwrap().is_eof());
}

#[test]
fn chunk_longer_than_buffer_is_truncated() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 10, 0x00, 0xFF];
    let err = Reader::from_byte_slice(&bytes).read_chunk().unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn header_must_declare_six_bytes() {
    use crate::reader::ReaderErrorKind;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 7, 0, 0, 0, 1, 0, 96, 0];
    let err = Reader::from_byte_slice(&bytes)
        .read_header_chunk()
        .unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::InvalidHeader);
}

#[test]
fn header_must_come_first() {
    use crate::reader::ReaderErrorKind;
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 0];
    let err = Reader::from_byte_slice(&bytes)
        .read_header_chunk()
        .unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::InvalidHeader);
}
