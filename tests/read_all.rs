mod common;

use common::{Smf, Track};
use midi_timeline::{
    ReaderErrorKind,
    events::{EventKind, TrackDecoder},
    file::MidiFile,
};
use pretty_assertions::assert_eq;

fn loop_through(bytes: &[u8]) -> usize {
    let file = MidiFile::parse(bytes).unwrap();
    let mut count = 0;
    for track in file.tracks() {
        for event in TrackDecoder::new(track.data(), track.offset()) {
            if let Err(e) = event {
                panic!("Error at {}, {:?}", e.position(), e);
            }
            count += 1;
        }
    }
    count
}

fn scale() -> Vec<u8> {
    let mut track = Track::new().program(0, 0, 0);
    for key in [60, 62, 64, 65, 67, 69, 71, 72] {
        track = track.note_on(0, 0, key, 90).note_off(120, 0, key);
    }
    Smf::ppq(0, 480).track(track.end()).build()
}

#[test]
fn read_scale() {
    assert_eq!(loop_through(&scale()), 18);
}

#[test]
fn read_multi_track() {
    let bytes = Smf::ppq(1, 96)
        .track(Track::new().tempo(0, 400_000).tempo(384, 600_000).end())
        .track(Track::new().note_on(0, 1, 40, 64).note_off(96, 1, 40).end())
        .track(Track::new().note_on(48, 9, 36, 127).note_off(1, 9, 36).end())
        .build();
    assert_eq!(loop_through(&bytes), 9);
}

#[test]
fn read_sysex_and_system_common() {
    let track = Track::new()
        .raw(0, &[0xF0, 0x03, 0x7E, 0x09, 0xF7])
        .raw(0, &[0xF2, 0x10, 0x20])
        .raw(0, &[0xF8])
        .raw(0, &[0xFF, 0x03, 0x04, b'l', b'e', b'a', b'd'])
        .note_on(10, 2, 50, 50)
        .end();
    let bytes = Smf::ppq(0, 96).track(track).build();
    assert_eq!(loop_through(&bytes), 6);

    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events().unwrap();
    assert!(matches!(events[0].kind(), EventKind::SysEx { payload } if payload.len() == 3));
    assert_eq!(events[4].absolute_tick(), 10);
}

#[test]
fn read_without_end_of_track() {
    let track = Track::new().note_on(0, 0, 60, 100).note_off(10, 0, 60).unterminated();
    let bytes = Smf::ppq(0, 96).track(track).build();
    assert_eq!(loop_through(&bytes), 2);
}

#[test]
fn read_damaged() {
    let mut bytes = scale();
    // cut the last note-off in half
    let len = bytes.len();
    bytes.truncate(len - 5);
    let track_len = (bytes.len() - 22) as u32;
    bytes[18..22].copy_from_slice(&track_len.to_be_bytes());

    let file = MidiFile::parse(&bytes).unwrap();
    let result = file.decode_tracks();
    let Err(e) = result else {
        panic!("Corrupted track should not have decoded")
    };
    assert!(matches!(e.error_kind(), ReaderErrorKind::TruncatedStream));
}

#[test]
fn read_data_byte_without_status() {
    let bytes = Smf::ppq(0, 96).track(Track::new().raw(0, &[0x3C, 0x40]).end()).build();
    let file = MidiFile::parse(&bytes).unwrap();
    let e = file.tracks()[0].events().unwrap_err();
    assert_eq!(e.error_kind(), &ReaderErrorKind::UnknownStatus(0x3C));
    assert_eq!(e.position(), 22 + 1);
}
