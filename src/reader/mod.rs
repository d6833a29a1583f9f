#![doc = r#"
A byte cursor over an in-memory MIDI buffer.

All multi-byte integers in a Standard MIDI File are big-endian. Delta times and
variable payload lengths are stored as variable-length quantities (VLQ): seven
bits per byte, most significant group first, with the top bit of each byte set
when another byte follows. SMF caps a VLQ at four bytes (`0x0FFF_FFFF`).

# Example
```rust
# use midi_timeline::reader::Reader;
let mut reader = Reader::from_byte_slice(&[0x81, 0x00, 0x12, 0x34]);
assert_eq!(reader.read_vlq().unwrap(), 128);
assert_eq!(reader.read_u16().unwrap(), 0x1234);
assert!(reader.is_empty());
```
"#]

mod error;
pub use error::*;

/// The longest variable-length quantity a Standard MIDI File may contain.
pub const MAX_VLQ_BYTES: usize = 4;

/// A cursor over a borrowed byte slice.
///
/// A reader can be created over a sub-slice of a larger buffer (a track chunk,
/// for example) with [`Reader::with_offset`]; positions reported in errors are
/// then relative to the start of the whole buffer.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    buf: &'slc [u8],
    pos: usize,
    base: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader at the start of a byte slice
    pub const fn from_byte_slice(buf: &'slc [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            base: 0,
        }
    }

    /// Create a reader for a slice that starts `base` bytes into a larger buffer.
    pub const fn with_offset(buf: &'slc [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    /// The absolute position of the cursor.
    pub const fn buffer_position(&self) -> usize {
        self.base + self.pos
    }

    /// Number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True if every byte has been consumed.
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next byte without advancing.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| ReaderError::truncated(self.buffer_position()))
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// The cursor does not move if fewer than `len` bytes remain.
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        if len > self.remaining() {
            return Err(ReaderError::truncated(self.buffer_position()));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    /// Read a variable-length quantity.
    ///
    /// # Errors
    /// - [`ReaderErrorKind::TruncatedStream`] if the buffer ends mid-quantity
    /// - [`ReaderErrorKind::MalformedVlq`] if the quantity is longer than four bytes
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let start = self.buffer_position();
        let mut value: u32 = 0;
        for _ in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::new(start, ReaderErrorKind::MalformedVlq))
    }
}

#[test]
fn read_fixed_width_integers() {
    use pretty_assertions::assert_eq;
    let bytes = [0x4D, 0x00, 0x06, 0x00, 0x00, 0x01, 0xE0];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 0x4D);
    assert_eq!(reader.read_u16().unwrap(), 6);
    assert_eq!(reader.read_u32().unwrap(), 0x01E0);
    assert!(reader.is_empty());
}

#[test]
fn read_vlq_single_and_multi_byte() {
    use pretty_assertions::assert_eq;
    let cases: [(&[u8], u32); 6] = [
        (&[0x00], 0),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 0x80),
        (&[0xC0, 0x00], 0x2000),
        (&[0xFF, 0xFF, 0x7F], 0x1F_FFFF),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_vlq().unwrap(), expected);
        assert!(reader.is_empty());
    }
}

#[test]
fn five_byte_vlq_is_malformed() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80, 0x80, 0x80, 0x00]);
    let err = reader.read_vlq().unwrap_err();
    assert!(matches!(err.error_kind(), ReaderErrorKind::MalformedVlq));
    assert_eq!(err.position(), 0);
}

#[test]
fn vlq_cut_short_is_truncated() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
    let err = reader.read_vlq().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 2);
}

#[test]
fn short_read_leaves_cursor_in_place() {
    let mut reader = Reader::with_offset(&[0x01, 0x02], 10);
    assert!(reader.read_u32().unwrap_err().is_truncated());
    assert_eq!(reader.buffer_position(), 10);
    assert_eq!(reader.read_u16().unwrap(), 0x0102);
    assert_eq!(reader.buffer_position(), 12);
}
