use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading a MIDI file.

Every error is fatal to the parse: no partially built instrument set is
returned alongside it.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The `MThd` chunk is missing, misplaced, duplicated or malformed.
    #[error("Invalid header chunk")]
    InvalidHeader,
    /// A read went past the end of the buffer or a chunk declared more bytes than remain.
    #[error("Read out of bounds!")]
    TruncatedStream,
    /// A variable-length quantity was longer than four bytes.
    #[error("Variable-length quantity exceeds four bytes")]
    MalformedVlq,
    /// A data byte appeared where a status byte was required and no running status existed.
    #[error("Unknown status byte {0:#04X} with no running status")]
    UnknownStatus(u8),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the error came from reading past the end of the data
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedStream)
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new truncated stream error
    pub const fn truncated(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedStream,
        }
    }

    /// Create a new invalid header error
    pub const fn invalid_header(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::InvalidHeader,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
