use num_enum::TryFromPrimitive;

#[doc = r#"
The SMF format word from the header chunk.

- Format 0: a single track holding every channel
- Format 1: simultaneous tracks sharing one tempo map (conventionally in track 0)
- Format 2: sequentially independent patterns
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The raw format word as stored in the file.
    pub const fn as_u16(&self) -> u16 {
        *self as u16
    }
}

#[test]
fn format_from_word() {
    use pretty_assertions::assert_eq;
    assert_eq!(FormatType::try_from(0u16).unwrap(), FormatType::SingleMultiChannel);
    assert_eq!(FormatType::try_from(1u16).unwrap(), FormatType::Simultaneous);
    assert_eq!(
        FormatType::try_from(2u16).unwrap(),
        FormatType::SequentiallyIndependent
    );
    assert!(FormatType::try_from(3u16).is_err());
}
