/// The payload of a time signature meta event.
///
/// `FF 58 04 nn dd cc bb`: the denominator is stored as a power of two,
/// `cc` is MIDI clocks per metronome click and `bb` the number of notated
/// 32nd notes in a quarter note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_power: u8,
    clocks_per_click: u8,
    thirty_seconds_per_quarter: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_power: 2,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }
}

impl TimeSignature {
    /// Decode a time signature payload. Requires exactly four bytes.
    pub const fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            [nn, dd, cc, bb] => Some(Self {
                numerator: *nn,
                denominator_power: *dd,
                clocks_per_click: *cc,
                thirty_seconds_per_quarter: *bb,
            }),
            _ => None,
        }
    }

    /// Beats in a bar
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// The note value of one beat (4 for quarter notes, 8 for eighths...).
    ///
    /// Returns `None` if the stored power does not fit in a `u32`.
    pub const fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_power as u32)
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    /// Notated 32nd notes per MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }
}

#[test]
fn decode_six_eight() {
    use pretty_assertions::assert_eq;
    let sig = TimeSignature::from_payload(&[6, 3, 36, 8]).unwrap();
    assert_eq!(sig.numerator(), 6);
    assert_eq!(sig.denominator(), Some(8));
    assert_eq!(sig.clocks_per_click(), 36);
    assert!(TimeSignature::from_payload(&[6, 3]).is_none());
    assert_eq!(TimeSignature::default().denominator(), Some(4));
}
