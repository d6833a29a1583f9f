//! Builds Standard MIDI Files byte by byte.
#![allow(dead_code)]

/// Encode `value` as a variable-length quantity.
pub fn vlq(value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        out.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    out.reverse();
    out
}

#[derive(Default)]
pub struct Track {
    bytes: Vec<u8>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn raw(mut self, delta: u32, event: &[u8]) -> Self {
        self.bytes.extend(vlq(delta));
        self.bytes.extend_from_slice(event);
        self
    }
    pub fn note_on(self, delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        self.raw(delta, &[0x90 | channel, key, velocity])
    }
    pub fn note_off(self, delta: u32, channel: u8, key: u8) -> Self {
        self.raw(delta, &[0x80 | channel, key, 0x40])
    }
    pub fn program(self, delta: u32, channel: u8, program: u8) -> Self {
        self.raw(delta, &[0xC0 | channel, program])
    }
    pub fn tempo(self, delta: u32, micros: u32) -> Self {
        let [_, a, b, c] = micros.to_be_bytes();
        self.raw(delta, &[0xFF, 0x51, 0x03, a, b, c])
    }
    pub fn end(self) -> Vec<u8> {
        self.raw(0, &[0xFF, 0x2F, 0x00]).bytes
    }
    /// The events without an end-of-track marker
    pub fn unterminated(self) -> Vec<u8> {
        self.bytes
    }
}

pub struct Smf {
    format: u16,
    division: u16,
    declared_tracks: Option<u16>,
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl Smf {
    pub fn new(format: u16, division: u16) -> Self {
        Self {
            format,
            division,
            declared_tracks: None,
            chunks: Vec::new(),
        }
    }
    /// A ticks-per-quarter-note file
    pub fn ppq(format: u16, ticks: u16) -> Self {
        Self::new(format, ticks)
    }
    /// An SMPTE timed file; `fps` is 24, 25, 29 or 30.
    pub fn smpte(format: u16, fps: u8, ticks_per_frame: u8) -> Self {
        let high = (-(fps as i8)) as u8;
        Self::new(format, u16::from_be_bytes([high, ticks_per_frame]))
    }
    pub fn declared_tracks(mut self, count: u16) -> Self {
        self.declared_tracks = Some(count);
        self
    }
    pub fn track(self, data: Vec<u8>) -> Self {
        self.chunk(*b"MTrk", data)
    }
    pub fn chunk(mut self, tag: [u8; 4], data: Vec<u8>) -> Self {
        self.chunks.push((tag, data));
        self
    }
    pub fn build(self) -> Vec<u8> {
        let track_count = self.chunks.iter().filter(|(tag, _)| tag == b"MTrk").count() as u16;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&self.format.to_be_bytes());
        bytes.extend_from_slice(&self.declared_tracks.unwrap_or(track_count).to_be_bytes());
        bytes.extend_from_slice(&self.division.to_be_bytes());
        for (tag, data) in self.chunks {
            bytes.extend_from_slice(&tag);
            bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
            bytes.extend(data);
        }
        bytes
    }
}
