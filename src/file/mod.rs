#![doc = r#"
The Standard MIDI File container: header, track chunks and timing.
"#]

/// Contains the [`MidiFileBuilder`](builder::MidiFileBuilder) and the
/// chunk types it consumes.
pub mod builder;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

pub mod meta;

use crate::{
    events::RawEvent,
    file::builder::{
        MidiFileBuilder,
        chunk::{ChunkEvent, TrackChunk, UnknownChunk},
    },
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::vec::Vec;

#[doc = r#"
A split-up MIDI file: the header plus the raw bytes of every track.

Track events are decoded on demand with [`TrackChunk::events`] or all at once
with [`MidiFile::decode_tracks`].
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct MidiFile<'a> {
    header: Header,
    tracks: Vec<TrackChunk<'a>>,
    unknown_chunks: Vec<UnknownChunk<'a>>,
}

impl<'a> MidiFile<'a> {
    /// Split a set of bytes into header and track chunks.
    pub fn parse(bytes: &'a [u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut builder = MidiFileBuilder::default();

        let header = reader.read_header_chunk()?;
        builder
            .handle_chunk(ChunkEvent::Header(header))
            .map_err(|k| ReaderError::new(0, k))?;

        loop {
            let position = reader.buffer_position();
            let val = reader.read_chunk()?;

            if val.is_eof() {
                break;
            }
            builder
                .handle_chunk(val)
                .map_err(|k| ReaderError::new(position, k))?;
        }

        builder
            .build()
            .map_err(|k| ReaderError::new(reader.buffer_position(), k))
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the timing of the file
    pub fn timing(&self) -> Timing {
        *self.header.timing()
    }

    /// Returns the format type for the file.
    pub fn format_type(&self) -> FormatType {
        self.header.format()
    }

    /// Returns the track chunks in file order
    pub fn tracks(&self) -> &[TrackChunk<'a>] {
        &self.tracks
    }

    /// Chunks that were skipped because their type was not recognized
    pub fn unknown_chunks(&self) -> &[UnknownChunk<'a>] {
        &self.unknown_chunks
    }

    /// Decodes every track, in parallel when the `parallel` feature is enabled.
    ///
    /// A malformed track fails the whole decode.
    pub fn decode_tracks(&self) -> ReadResult<Vec<Vec<RawEvent<'a>>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.tracks.par_iter().map(TrackChunk::events).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.tracks.iter().map(TrackChunk::events).collect()
        }
    }
}
