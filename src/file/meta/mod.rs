#![doc = r#"
The meta events this crate interprets.

Meta events (status `0xFF`) carry a type byte and a length-prefixed payload.
Only tempo and time signature payloads are decoded; every other meta event is
kept as raw bytes on the [`RawEvent`](crate::events::RawEvent).
"#]

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

/// `FF 2F 00`: marks the end of a track
pub const END_OF_TRACK: u8 = 0x2F;
/// `FF 51 03 tttttt`: set tempo in microseconds per quarter note
pub const SET_TEMPO: u8 = 0x51;
/// `FF 58 04 nn dd cc bb`: time signature
pub const TIME_SIGNATURE: u8 = 0x58;
