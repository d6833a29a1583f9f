/// Tempo assumed until the first set-tempo event: 120 beats per minute.
pub const DEFAULT_MICROS_PER_QUARTER_NOTE: u32 = 500_000;

#[doc = r#"
The payload of a set-tempo meta event.

The tempo is stored as three big-endian bytes of microseconds per quarter note.

# Example
```rust
# use midi_timeline::prelude::*;
let tempo = Tempo::from_payload(&[0x07, 0xA1, 0x20]).unwrap();
assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.bpm(), 120.);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_MICROS_PER_QUARTER_NOTE)
    }
}

impl Tempo {
    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Decode a set-tempo payload. Anything but exactly three bytes is rejected.
    pub const fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            [a, b, c] => Some(Self(u32::from_be_bytes([0, *a, *b, *c]))),
            _ => None,
        }
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }
}

#[test]
fn wrong_payload_length_is_ignored() {
    assert_eq!(Tempo::from_payload(&[0x07, 0xA1]), None);
    assert_eq!(Tempo::from_payload(&[0x00, 0x07, 0xA1, 0x20]), None);
}
