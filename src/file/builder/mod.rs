pub mod chunk;

use super::MidiFile;
use crate::{
    file::{
        Header,
        builder::chunk::{ChunkEvent, TrackChunk, UnknownChunk},
    },
    reader::ReaderErrorKind,
};
use alloc::vec::Vec;

/// A builder used to create a new [`MidiFile`] from its chunks.
///
/// The header must be handed over before any other chunk.
#[derive(Default)]
pub struct MidiFileBuilder<'a> {
    header: Option<Header>,
    tracks: Vec<TrackChunk<'a>>,
    unknown_chunks: Vec<UnknownChunk<'a>>,
}

impl<'a> MidiFileBuilder<'a> {
    /// Handles a chunk of a midi file.
    pub fn handle_chunk(&mut self, chunk: ChunkEvent<'a>) -> Result<(), ReaderErrorKind> {
        use ChunkEvent::*;
        match chunk {
            Header(h) => {
                if self.header.is_some() || !self.tracks.is_empty() {
                    return Err(ReaderErrorKind::InvalidHeader);
                }
                self.header = Some(h);
            }
            Track(t) => {
                if self.header.is_none() {
                    return Err(ReaderErrorKind::InvalidHeader);
                }
                self.tracks.push(t);
            }
            Unknown(data) => {
                if self.header.is_none() {
                    return Err(ReaderErrorKind::InvalidHeader);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "skipping unknown chunk {:?} ({} bytes)",
                    data.tag(),
                    data.data().len()
                );
                self.unknown_chunks.push(data);
            }
            Eof => {}
        }
        Ok(())
    }

    /// Attempts to finish the midifile from the provided chunks.
    ///
    /// A builder that never saw a header means the buffer ended before one.
    pub fn build(self) -> Result<MidiFile<'a>, ReaderErrorKind> {
        let Some(header) = self.header else {
            return Err(ReaderErrorKind::TruncatedStream);
        };

        Ok(MidiFile {
            header,
            tracks: self.tracks,
            unknown_chunks: self.unknown_chunks,
        })
    }
}

#[test]
fn track_before_header_is_rejected() {
    let mut builder = MidiFileBuilder::default();
    let err = builder
        .handle_chunk(ChunkEvent::Track(TrackChunk::new(&[], 8)))
        .unwrap_err();
    assert_eq!(err, ReaderErrorKind::InvalidHeader);
}

#[test]
fn duplicate_header_is_rejected() {
    use crate::file::{FormatType, Timing};
    let header = Header::new(
        FormatType::SingleMultiChannel,
        1,
        Timing::new_ticks_per_quarter_note(96),
    );
    let mut builder = MidiFileBuilder::default();
    builder.handle_chunk(ChunkEvent::Header(header)).unwrap();
    let err = builder.handle_chunk(ChunkEvent::Header(header)).unwrap_err();
    assert_eq!(err, ReaderErrorKind::InvalidHeader);
}
