use core::fmt;

#[doc = r#"
A non-fatal oddity found while parsing.

Malformed and truncated files often release keys that were never pressed, or
end with keys still held. These never abort a parse; they are collected here
for callers that want to inspect them.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A note-off with no matching note-on. No note was produced.
    DanglingNoteOff {
        /// Index of the track
        track: usize,
        /// Zero-based channel
        channel: u8,
        /// The released key
        pitch: u8,
        /// Tick of the release
        tick: u64,
    },
    /// A note-on still open at the end of its track. The note was dropped.
    UnterminatedNote {
        /// Index of the track
        track: usize,
        /// Zero-based channel
        channel: u8,
        /// The held key
        pitch: u8,
        /// Tick of the note-on
        tick: u64,
    },
    /// A chunk with an unrecognized type identifier was skipped.
    UnknownChunk {
        /// The chunk's type identifier
        tag: [u8; 4],
        /// Bytes skipped
        len: usize,
    },
    /// The header declared a different number of tracks than the file holds.
    TrackCountMismatch {
        /// Count written in the header
        declared: u16,
        /// Track chunks actually present
        found: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingNoteOff {
                track,
                channel,
                pitch,
                tick,
            } => write!(
                f,
                "track {track}: note-off for key {pitch} on channel {channel} at tick {tick} has no note-on"
            ),
            Self::UnterminatedNote {
                track,
                channel,
                pitch,
                tick,
            } => write!(
                f,
                "track {track}: key {pitch} on channel {channel} pressed at tick {tick} is never released"
            ),
            Self::UnknownChunk { tag, len } => {
                write!(f, "skipped unknown chunk {tag:?} of {len} bytes")
            }
            Self::TrackCountMismatch { declared, found } => {
                write!(f, "header declares {declared} tracks but {found} were found")
            }
        }
    }
}
