#![doc = r#"
Decoded track events

A track chunk is a sequence of `<delta-time> <event>` pairs. Each event is one of

```text
|-----------------|   |--------------------|   |-----------------------|
| Channel Message |   | Meta (FF tt len..) |   | SysEx (F0/F7 len ..)  |
|-----------------|   |--------------------|   |-----------------------|
```

[`TrackDecoder`] turns the bytes of one track into [`RawEvent`]s, each stamped
with both its delta and its absolute tick within the track.
"#]

mod decoder;
pub use decoder::*;

use num_enum::TryFromPrimitive;

/// The high nibble of a channel status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum ChannelStatus {
    /// `8n kk vv`
    NoteOff = 0x8,
    /// `9n kk vv`
    NoteOn = 0x9,
    /// `An kk pp` (polyphonic aftertouch)
    KeyPressure = 0xA,
    /// `Bn cc vv`
    ControlChange = 0xB,
    /// `Cn pp`
    ProgramChange = 0xC,
    /// `Dn pp` (channel aftertouch)
    ChannelPressure = 0xD,
    /// `En ll mm`
    PitchBend = 0xE,
}

impl ChannelStatus {
    /// Number of data bytes following the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    const fn kind<'a>(&self) -> EventKind<'a> {
        match self {
            Self::NoteOff => EventKind::NoteOff,
            Self::NoteOn => EventKind::NoteOn,
            Self::KeyPressure => EventKind::KeyPressure,
            Self::ControlChange => EventKind::ControlChange,
            Self::ProgramChange => EventKind::ProgramChange,
            Self::ChannelPressure => EventKind::ChannelPressure,
            Self::PitchBend => EventKind::PitchBend,
        }
    }
}

/// What a [`RawEvent`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// A key was pressed (a zero velocity counts as a release)
    NoteOn,
    /// A key was released
    NoteOff,
    /// Polyphonic aftertouch
    KeyPressure,
    /// A controller changed value
    ControlChange,
    /// The channel switched instrument
    ProgramChange,
    /// Channel-wide aftertouch
    ChannelPressure,
    /// Pitch wheel movement
    PitchBend,
    /// A meta event and its verbatim payload
    Meta {
        /// The meta type byte
        meta_type: u8,
        /// Payload bytes
        payload: &'a [u8],
    },
    /// A system exclusive message (`F0` or `F7`) and its payload
    SysEx {
        /// Payload bytes, excluding the length prefix
        payload: &'a [u8],
    },
    /// System common and realtime bytes, which carry nothing of interest here
    Other,
}

/// A single event decoded from a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent<'a> {
    delta_ticks: u32,
    absolute_tick: u64,
    channel: Option<u8>,
    kind: EventKind<'a>,
    data: [u8; 2],
}

impl<'a> RawEvent<'a> {
    /// Create an event. `data` holds the channel message data bytes (zeros otherwise).
    pub const fn new(
        delta_ticks: u32,
        absolute_tick: u64,
        channel: Option<u8>,
        kind: EventKind<'a>,
        data: [u8; 2],
    ) -> Self {
        Self {
            delta_ticks,
            absolute_tick,
            channel,
            kind,
            data,
        }
    }

    /// Ticks since the previous event in the same track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// Ticks since the start of the track
    pub const fn absolute_tick(&self) -> u64 {
        self.absolute_tick
    }

    /// The zero-based channel of a channel message
    pub const fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// The event's kind
    pub const fn kind(&self) -> &EventKind<'a> {
        &self.kind
    }

    /// The raw data bytes of a channel message
    pub const fn data(&self) -> [u8; 2] {
        self.data
    }

    /// The key of a note or key pressure event
    pub const fn key(&self) -> u8 {
        self.data[0]
    }

    /// The velocity of a note event
    pub const fn velocity(&self) -> u8 {
        self.data[1]
    }

    /// True for a note-on with a velocity above zero
    pub const fn is_note_start(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn) && self.data[1] > 0
    }

    /// True for a note-off, or a note-on with zero velocity
    pub const fn is_note_end(&self) -> bool {
        match self.kind {
            EventKind::NoteOff => true,
            EventKind::NoteOn => self.data[1] == 0,
            _ => false,
        }
    }

    /// The signed pitch wheel offset of a pitch bend event, `-8192..=8191`.
    pub const fn pitch_bend(&self) -> Option<i16> {
        match self.kind {
            EventKind::PitchBend => {
                let raw = ((self.data[1] as u16) << 7) | self.data[0] as u16;
                Some(raw as i16 - 8192)
            }
            _ => None,
        }
    }

    /// The payload of a meta event of the given type
    pub fn meta_payload(&self, meta_type: u8) -> Option<&'a [u8]> {
        match self.kind {
            EventKind::Meta {
                meta_type: t,
                payload,
            } if t == meta_type => Some(payload),
            _ => None,
        }
    }
}

#[test]
fn zero_velocity_note_on_ends_a_note() {
    let on = RawEvent::new(0, 0, Some(0), EventKind::NoteOn, [60, 100]);
    let silent_on = RawEvent::new(0, 0, Some(0), EventKind::NoteOn, [60, 0]);
    let off = RawEvent::new(0, 0, Some(0), EventKind::NoteOff, [60, 64]);
    assert!(on.is_note_start() && !on.is_note_end());
    assert!(!silent_on.is_note_start() && silent_on.is_note_end());
    assert!(off.is_note_end());
}

#[test]
fn pitch_bend_is_centered() {
    use pretty_assertions::assert_eq;
    let center = RawEvent::new(0, 0, Some(0), EventKind::PitchBend, [0x00, 0x40]);
    let lowest = RawEvent::new(0, 0, Some(0), EventKind::PitchBend, [0x00, 0x00]);
    let highest = RawEvent::new(0, 0, Some(0), EventKind::PitchBend, [0x7F, 0x7F]);
    assert_eq!(center.pitch_bend(), Some(0));
    assert_eq!(lowest.pitch_bend(), Some(-8192));
    assert_eq!(highest.pitch_bend(), Some(8191));
}
