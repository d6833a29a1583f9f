use crate::{
    diagnostics::Diagnostic,
    file::{Header, MidiFile, Timing},
    instrument::{Instrument, NoteAssembler},
    reader::ReadResult,
    tempo::{
        TempoChange, TempoSource, TickConverter, TimeSignatureChange, build_tempo_map,
        collect_time_signatures,
    },
};
use alloc::vec::Vec;

#[doc = r#"
Options for [`ParsedMidi::parse_with`].

# Example
```rust
# use midi_timeline::prelude::*;
let options = ParseOptions::default()
    .with_tempo_source(TempoSource::FirstTrack)
    .with_include_drums(false);
assert_eq!(options.tempo_source(), TempoSource::FirstTrack);
assert!(!options.include_drums());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    tempo_source: TempoSource,
    include_drums: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tempo_source: TempoSource::AllTracks,
            include_drums: true,
        }
    }
}

impl ParseOptions {
    /// Read set-tempo events from `source`
    pub const fn with_tempo_source(mut self, source: TempoSource) -> Self {
        self.tempo_source = source;
        self
    }
    /// Keep or drop notes on the percussion channel
    pub const fn with_include_drums(mut self, include: bool) -> Self {
        self.include_drums = include;
        self
    }
    /// Which tracks set-tempo events are read from
    pub const fn tempo_source(&self) -> TempoSource {
        self.tempo_source
    }
    /// True if percussion notes are kept
    pub const fn include_drums(&self) -> bool {
        self.include_drums
    }
}

#[doc = r#"
A fully parsed MIDI file: instruments with timed notes, the tempo map and
anything unusual that was noticed along the way.

Parsing is all-or-nothing: a malformed file produces a
[`ReaderError`](crate::ReaderError) and no instruments.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedMidi {
    header: Header,
    tempo_changes: Vec<TempoChange>,
    time_signatures: Vec<TimeSignatureChange>,
    converter: TickConverter,
    instruments: Vec<Instrument>,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedMidi {
    /// Parse a complete SMF buffer with default options.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::parse_with(bytes, ParseOptions::default())
    }

    /// Parse a complete SMF buffer.
    ///
    /// Tracks are decoded independently (in parallel with the `parallel`
    /// feature). The tempo map is built once every track is decoded, since a
    /// tempo change in any track moves the notes of every other track.
    pub fn parse_with(bytes: &[u8], options: ParseOptions) -> ReadResult<Self> {
        let file = MidiFile::parse(bytes)?;
        let header = *file.header();
        let mut diagnostics = Vec::new();

        for chunk in file.unknown_chunks() {
            diagnostics.push(Diagnostic::UnknownChunk {
                tag: chunk.tag(),
                len: chunk.data().len(),
            });
        }
        if file.tracks().len() != header.track_count() as usize {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "header declares {} tracks, found {}",
                header.track_count(),
                file.tracks().len()
            );
            diagnostics.push(Diagnostic::TrackCountMismatch {
                declared: header.track_count(),
                found: file.tracks().len(),
            });
        }

        let tracks = file.decode_tracks()?;

        let tempo_changes = match header.timing() {
            Timing::TicksPerQuarterNote(_) => build_tempo_map(&tracks, options.tempo_source),
            Timing::Smpte(_) => Vec::new(),
        };
        let converter = TickConverter::new(*header.timing(), &tempo_changes);
        let time_signatures = collect_time_signatures(&tracks, &converter);

        let mut assembler = NoteAssembler::new(&converter).with_include_drums(options.include_drums);
        for (index, events) in tracks.iter().enumerate() {
            assembler.add_track(index, events);
        }
        let (instruments, notes_diagnostics) = assembler.finish();
        diagnostics.extend(notes_diagnostics);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "parsed {} tracks into {} instruments ({} tempo changes)",
            tracks.len(),
            instruments.len(),
            tempo_changes.len()
        );

        Ok(Self {
            header,
            tempo_changes,
            time_signatures,
            converter,
            instruments,
            diagnostics,
        })
    }

    /// The file's header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The file's timing
    pub fn timing(&self) -> Timing {
        *self.header.timing()
    }

    /// Ticks per quarter note, if the file uses metrical timing
    pub fn resolution(&self) -> Option<u16> {
        self.header.timing().ticks_per_quarter_note()
    }

    /// Instruments in order of first appearance
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Take ownership of the instruments
    pub fn into_instruments(self) -> Vec<Instrument> {
        self.instruments
    }

    /// The tempo map. Empty for SMPTE-timed files, where tempo has no effect.
    pub fn tempo_changes(&self) -> &[TempoChange] {
        &self.tempo_changes
    }

    /// Time signature changes in tick order
    pub fn time_signatures(&self) -> &[TimeSignatureChange] {
        &self.time_signatures
    }

    /// The tick to seconds mapping used for every note
    pub fn converter(&self) -> &TickConverter {
        &self.converter
    }

    /// Seconds from the start of the file at `tick`
    pub fn tick_to_seconds(&self, tick: u64) -> f64 {
        self.converter.tick_to_seconds(tick)
    }

    /// The time of the last event of any instrument
    pub fn end_time(&self) -> f64 {
        self.instruments
            .iter()
            .map(Instrument::end_time)
            .fold(0., f64::max)
    }

    /// Non-fatal conditions found while parsing
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
fn smf(format: u16, declared_tracks: u16, division: u16, chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&declared_tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for (tag, data) in chunks {
        bytes.extend_from_slice(*tag);
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(data);
    }
    bytes
}

#[test]
fn single_note_at_default_tempo() {
    use crate::instrument::Note;
    use pretty_assertions::assert_eq;
    #[rustfmt::skip]
    let track: &[u8] = &[
        0x00, 0x90, 0x3C, 0x64,
        0x83, 0x60, 0x80, 0x3C, 0x00,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 1, 480, &[(b"MTrk", track)]);
    let parsed = ParsedMidi::parse(&bytes).unwrap();

    assert_eq!(parsed.resolution(), Some(480));
    assert_eq!(parsed.tempo_changes(), &[TempoChange::new(0, 500_000)]);
    assert_eq!(parsed.instruments().len(), 1);
    assert_eq!(
        parsed.instruments()[0].notes(),
        &[Note::new(60, 100, 0., 0.5, 0)]
    );
    assert_eq!(parsed.end_time(), 0.5);
    assert!(parsed.diagnostics().is_empty());
}

#[test]
fn unknown_chunk_and_missing_track_are_reported() {
    use pretty_assertions::assert_eq;
    let track: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];
    let unknown: &[u8] = &[1, 2, 3];
    let bytes = smf(1, 2, 96, &[(b"XFIH", unknown), (b"MTrk", track)]);
    let parsed = ParsedMidi::parse(&bytes).unwrap();

    assert!(parsed.instruments().is_empty());
    assert_eq!(
        parsed.diagnostics(),
        &[
            Diagnostic::UnknownChunk {
                tag: *b"XFIH",
                len: 3
            },
            Diagnostic::TrackCountMismatch {
                declared: 2,
                found: 1
            },
        ]
    );
}

#[test]
fn drums_can_be_excluded() {
    use pretty_assertions::assert_eq;
    #[rustfmt::skip]
    let track: &[u8] = &[
        0x00, 0x99, 0x24, 0x7F,
        0x00, 0x90, 0x40, 0x50,
        0x60, 0x89, 0x24, 0x00,
        0x00, 0x80, 0x40, 0x00,
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = smf(0, 1, 96, &[(b"MTrk", track)]);

    let all = ParsedMidi::parse(&bytes).unwrap();
    assert_eq!(all.instruments().len(), 2);
    assert!(all.instruments()[0].is_drum());

    let options = ParseOptions::default().with_include_drums(false);
    let melodic = ParsedMidi::parse_with(&bytes, options).unwrap();
    assert_eq!(melodic.instruments().len(), 1);
    assert_eq!(melodic.instruments()[0].channel(), 0);
    assert_eq!(melodic.instruments()[0].notes()[0].end(), 0.5);
}

#[test]
fn malformed_track_fails_the_parse() {
    use crate::reader::ReaderErrorKind;
    let track: &[u8] = &[0x00, 0x90, 0x3C];
    let bytes = smf(0, 1, 96, &[(b"MTrk", track)]);
    let err = ParsedMidi::parse(&bytes).unwrap_err();
    assert!(matches!(err.error_kind(), ReaderErrorKind::TruncatedStream));
}
