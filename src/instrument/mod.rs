#![doc = r#"
Notes and the instruments that play them

An [`Instrument`] gathers every [`Note`] played on one channel with one program,
across all tracks of a file. Times are absolute seconds from the start of the
file.
"#]

mod assembler;
pub use assembler::*;

use alloc::vec::Vec;

/// The zero-based channel reserved for percussion.
pub const DRUM_CHANNEL: u8 = 9;

/// A sounded note with absolute start and end times.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pitch: u8,
    velocity: u8,
    start: f64,
    end: f64,
    channel: u8,
}

impl Note {
    /// Create a note. `pitch` and `velocity` are 7-bit values.
    pub const fn new(pitch: u8, velocity: u8, start: f64, end: f64, channel: u8) -> Self {
        Self {
            pitch,
            velocity,
            start,
            end,
            channel,
        }
    }
    /// The MIDI key, 0-127
    pub const fn pitch(&self) -> u8 {
        self.pitch
    }
    /// Velocity of the note-on, 1-127
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }
    /// Start time in seconds
    pub const fn start(&self) -> f64 {
        self.start
    }
    /// End time in seconds
    pub const fn end(&self) -> f64 {
        self.end
    }
    /// The zero-based channel the note was played on
    pub const fn channel(&self) -> u8 {
        self.channel
    }
    /// How long the note sounds, in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A pitch wheel position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend {
    /// Signed offset from center, `-8192..=8191`
    pub bend: i16,
    /// Time in seconds
    pub time: f64,
}

/// A controller value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlChange {
    /// Controller number
    pub number: u8,
    /// Controller value
    pub value: u8,
    /// Time in seconds
    pub time: f64,
}

/// Every note, pitch bend and controller change for one channel and program.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instrument {
    program: u8,
    channel: u8,
    is_drum: bool,
    notes: Vec<Note>,
    pitch_bends: Vec<PitchBend>,
    control_changes: Vec<ControlChange>,
}

impl Instrument {
    /// Create an empty instrument
    pub fn new(program: u8, channel: u8) -> Self {
        Self {
            program,
            channel,
            is_drum: channel == DRUM_CHANNEL,
            notes: Vec::new(),
            pitch_bends: Vec::new(),
            control_changes: Vec::new(),
        }
    }

    /// The General MIDI program number, 0-127
    pub const fn program(&self) -> u8 {
        self.program
    }
    /// The zero-based channel the instrument plays on
    pub const fn channel(&self) -> u8 {
        self.channel
    }
    /// True for the percussion channel
    pub const fn is_drum(&self) -> bool {
        self.is_drum
    }
    /// Notes ordered by start time
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
    /// Pitch bends ordered by time
    pub fn pitch_bends(&self) -> &[PitchBend] {
        &self.pitch_bends
    }
    /// Controller changes ordered by time
    pub fn control_changes(&self) -> &[ControlChange] {
        &self.control_changes
    }
    /// Take ownership of the notes
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    /// The time of the last note end, pitch bend or controller change.
    pub fn end_time(&self) -> f64 {
        let notes = self.notes.iter().map(Note::end);
        let bends = self.pitch_bends.iter().map(|b| b.time);
        let controls = self.control_changes.iter().map(|c| c.time);
        notes.chain(bends).chain(controls).fold(0., f64::max)
    }

    fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.pitch_bends.is_empty() && self.control_changes.is_empty()
    }
}

#[test]
fn drum_channel_is_detected() {
    assert!(Instrument::new(0, 9).is_drum());
    assert!(!Instrument::new(9, 0).is_drum());
}

#[test]
fn end_time_covers_controls() {
    use pretty_assertions::assert_eq;
    let mut instrument = Instrument::new(0, 0);
    assert_eq!(instrument.end_time(), 0.);
    instrument.notes.push(Note::new(60, 100, 0., 1.5, 0));
    instrument.control_changes.push(ControlChange {
        number: 64,
        value: 0,
        time: 2.25,
    });
    assert_eq!(instrument.end_time(), 2.25);
}
