use crate::common::{Smf, Track};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

/// A C major chord spread over three channels, released together.
fn simple() -> Vec<u8> {
    let track = Track::new()
        .raw(0, &[0xFF, 0x03, 0x06, b'S', b'i', b'm', b'p', b'l', b'e'])
        .raw(0, &[0xFF, 0x58, 0x04, 4, 2, 24, 8])
        .tempo(0, 500_000)
        .note_on(0, 2, 48, 112)
        .note_on(0, 2, 60, 112)
        .note_on(96, 1, 67, 80)
        .note_on(96, 0, 76, 48)
        // running status note-on with velocity 0
        .raw(192, &[0x92, 48, 0])
        .raw(0, &[60, 0])
        .note_off(0, 1, 67)
        .note_off(0, 0, 76)
        .end();
    Smf::ppq(0, 96).track(track).build()
}

#[test]
fn test_parse() {
    let bytes = simple();
    let parsed = ParsedMidi::parse(&bytes).unwrap();

    assert_eq!(parsed.header().format(), FormatType::SingleMultiChannel);
    assert_eq!(parsed.header().track_count(), 1);
    assert_eq!(parsed.resolution(), Some(96));
    assert!(parsed.diagnostics().is_empty());

    let instruments = parsed.instruments();
    assert_eq!(instruments.len(), 3);
    let channels: Vec<u8> = instruments.iter().map(Instrument::channel).collect();
    assert_eq!(channels, vec![2, 1, 0]);

    note(&instruments[0].notes()[0], 48, 112, 0., 2.);
    note(&instruments[0].notes()[1], 60, 112, 0., 2.);
    note(&instruments[1].notes()[0], 67, 80, 0.5, 2.);
    note(&instruments[2].notes()[0], 76, 48, 1., 2.);

    assert_eq!(parsed.end_time(), 2.);
}

#[test]
fn test_raw_events() {
    let bytes = simple();
    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events().unwrap();

    let mut events = events.iter().skip(3);
    note_on(events.next().unwrap(), 0, 2, 48, 112);
    note_on(events.next().unwrap(), 0, 2, 60, 112);
    note_on(events.next().unwrap(), 96, 1, 67, 80);
    note_on(events.next().unwrap(), 192, 0, 76, 48);
    note_off(events.next().unwrap(), 384, 2, 48);
    note_off(events.next().unwrap(), 384, 2, 60);
    note_off(events.next().unwrap(), 384, 1, 67);
    note_off(events.next().unwrap(), 384, 0, 76);
}

fn note(note: &Note, pitch: u8, velocity: u8, start: f64, end: f64) {
    assert_eq!(note.pitch(), pitch);
    assert_eq!(note.velocity(), velocity);
    assert_eq!(note.start(), start);
    assert_eq!(note.end(), end);
}

fn note_on(e: &RawEvent<'_>, absolute_tick: u64, channel: u8, key: u8, velocity: u8) {
    assert_eq!(e.absolute_tick(), absolute_tick);
    assert_eq!(e.channel(), Some(channel));
    assert!(e.is_note_start());
    assert_eq!(e.key(), key);
    assert_eq!(e.velocity(), velocity);
}

fn note_off(e: &RawEvent<'_>, absolute_tick: u64, channel: u8, key: u8) {
    assert_eq!(e.absolute_tick(), absolute_tick);
    assert_eq!(e.channel(), Some(channel));
    assert!(e.is_note_end());
    assert_eq!(e.key(), key);
}
