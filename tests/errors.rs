mod common;

use common::{Smf, Track, vlq};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn vlq_round_trips() {
    let mut value: u32 = 0;
    while value <= 0x0FFF_FFFF {
        let bytes = vlq(value);
        assert!(bytes.len() <= 4);
        let mut reader = Reader::from_byte_slice(&bytes);
        assert_eq!(reader.read_vlq().unwrap(), value);
        assert!(reader.is_empty());
        value = value * 3 + 1;
    }
    for edge in [0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0FFF_FFFF] {
        let bytes = vlq(edge);
        assert_eq!(Reader::from_byte_slice(&bytes).read_vlq().unwrap(), edge);
    }
}

#[test]
fn five_byte_delta_is_malformed() {
    let track = Track::new()
        .raw(0, &[0x90, 60, 100])
        .unterminated()
        .into_iter()
        .chain([0x80, 0x80, 0x80, 0x80, 0x00, 0x80, 60, 0])
        .collect();
    let bytes = Smf::ppq(0, 96).track(track).build();
    let err = ParsedMidi::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::MalformedVlq);
    assert_eq!(err.position(), 22 + 4);
}

#[test]
fn truncated_header() {
    let bytes = Smf::ppq(0, 96).build();
    for len in [0, 3, 8, 13] {
        let err = ParsedMidi::parse(&bytes[..len]).unwrap_err();
        assert!(err.is_truncated(), "{len} bytes: {err}");
    }
}

#[test]
fn wrong_leading_chunk() {
    let track = Track::new().end();
    let bytes = Smf::ppq(0, 96).track(track).build();
    let err = ParsedMidi::parse(&bytes[14..]).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::InvalidHeader);
    assert_eq!(err.position(), 0);
}

#[test]
fn header_with_wrong_length() {
    let mut bytes = Smf::ppq(0, 96).build();
    bytes[7] = 7;
    bytes.push(0);
    let err = ParsedMidi::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::InvalidHeader);
}

#[test]
fn unknown_format_is_rejected() {
    let bytes = Smf::ppq(3, 96).build();
    let err = ParsedMidi::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::InvalidHeader);
}

#[test]
fn track_longer_than_file() {
    let mut bytes = Smf::ppq(0, 96).track(Track::new().end()).build();
    bytes[21] = 0xFF;
    let err = ParsedMidi::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn unknown_chunks_are_skipped() {
    let track = Track::new().note_on(0, 0, 60, 100).note_off(96, 0, 60).end();
    let bytes = Smf::ppq(0, 96)
        .chunk(*b"XFIH", vec![0xDE, 0xAD, 0xBE, 0xEF, 0x90])
        .track(track)
        .chunk(*b"MTrx", vec![])
        .build();
    let parsed = ParsedMidi::parse(&bytes).unwrap();

    assert_eq!(parsed.instruments()[0].notes().len(), 1);
    assert_eq!(
        parsed.diagnostics(),
        &[
            Diagnostic::UnknownChunk {
                tag: *b"XFIH",
                len: 5
            },
            Diagnostic::UnknownChunk {
                tag: *b"MTrx",
                len: 0
            },
        ]
    );
}

#[test]
fn declared_track_count_is_not_trusted() {
    let bytes = Smf::ppq(1, 96)
        .declared_tracks(1)
        .track(Track::new().end())
        .track(Track::new().note_on(0, 0, 60, 1).note_off(1, 0, 60).end())
        .build();
    let parsed = ParsedMidi::parse(&bytes).unwrap();
    assert_eq!(parsed.instruments().len(), 1);
    assert_eq!(
        parsed.diagnostics(),
        &[Diagnostic::TrackCountMismatch {
            declared: 1,
            found: 2
        }]
    );
}

#[test]
fn errors_display_their_position() {
    let err = ReaderError::new(42, ReaderErrorKind::MalformedVlq);
    assert!(err.to_string().starts_with("Reading at Position 42"));
}
