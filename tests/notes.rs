mod common;

use common::{Smf, Track};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

fn parse(bytes: &[u8]) -> ParsedMidi {
    ParsedMidi::parse(bytes).unwrap()
}

#[test]
fn overlapping_notes_pair_first_in_first_out() {
    let track = Track::new()
        .note_on(0, 0, 60, 100)
        .note_on(480, 0, 60, 80)
        .note_off(480, 0, 60)
        .note_off(480, 0, 60)
        .end();
    let parsed = parse(&Smf::ppq(0, 480).track(track).build());

    let notes = parsed.instruments()[0].notes();
    assert_eq!(
        notes,
        &[
            Note::new(60, 100, 0., 1.0, 0),
            Note::new(60, 80, 0.5, 1.5, 0),
        ]
    );
}

#[test]
fn dangling_release_is_ignored() {
    let track = Track::new()
        .note_off(0, 3, 64)
        .note_on(10, 3, 64, 90)
        .note_off(86, 3, 64)
        .end();
    let parsed = parse(&Smf::ppq(0, 96).track(track).build());

    assert_eq!(parsed.instruments()[0].notes().len(), 1);
    assert_eq!(
        parsed.diagnostics(),
        &[Diagnostic::DanglingNoteOff {
            track: 0,
            channel: 3,
            pitch: 64,
            tick: 0
        }]
    );
}

#[test]
fn held_notes_are_dropped_at_end_of_track() {
    let first = Track::new().note_on(0, 0, 60, 100).end();
    let second = Track::new().note_off(96, 0, 60).end();
    let parsed = parse(&Smf::ppq(1, 96).track(first).track(second).build());

    assert!(parsed.instruments().is_empty());
    assert_eq!(
        parsed.diagnostics(),
        &[
            Diagnostic::UnterminatedNote {
                track: 0,
                channel: 0,
                pitch: 60,
                tick: 0
            },
            Diagnostic::DanglingNoteOff {
                track: 1,
                channel: 0,
                pitch: 60,
                tick: 96
            },
        ]
    );
}

#[test]
fn zero_length_note_is_kept() {
    let track = Track::new().note_on(5, 0, 70, 20).note_off(0, 0, 70).end();
    let parsed = parse(&Smf::ppq(0, 96).track(track).build());
    let note = parsed.instruments()[0].notes()[0];
    assert_eq!(note.start(), note.end());
    assert_eq!(note.duration(), 0.);
}

#[test]
fn running_status_continues_across_meta() {
    let track = Track::new()
        .raw(0, &[0x91, 60, 100])
        .raw(0, &[0xFF, 0x01, 0x02, b'h', b'i'])
        .raw(96, &[62, 100])
        .raw(96, &[60, 0])
        .raw(0, &[62, 0])
        .end();
    let parsed = parse(&Smf::ppq(0, 96).track(track).build());

    let instrument = &parsed.instruments()[0];
    assert_eq!(instrument.channel(), 1);
    let pitches: Vec<u8> = instrument.notes().iter().map(Note::pitch).collect();
    assert_eq!(pitches, vec![60, 62]);
    assert_eq!(instrument.notes()[1].start(), 0.5);
    assert_eq!(instrument.notes()[1].end(), 1.0);
}

#[test]
fn program_changes_split_instruments() {
    let track = Track::new()
        .program(0, 0, 24)
        .note_on(0, 0, 60, 100)
        .note_off(96, 0, 60)
        .program(0, 0, 40)
        .note_on(0, 0, 60, 100)
        .note_off(96, 0, 60)
        .program(0, 0, 24)
        .note_on(0, 0, 64, 100)
        .note_off(96, 0, 64)
        .end();
    let parsed = parse(&Smf::ppq(0, 96).track(track).build());

    let instruments = parsed.instruments();
    assert_eq!(instruments.len(), 2);
    assert_eq!(instruments[0].program(), 24);
    assert_eq!(instruments[0].notes().len(), 2);
    assert_eq!(instruments[1].program(), 40);
    assert_eq!(instruments[1].notes()[0].start(), 0.5);
}

#[test]
fn same_channel_in_two_tracks_shares_an_instrument() {
    let first = Track::new().note_on(96, 5, 50, 60).note_off(96, 5, 50).end();
    let second = Track::new().note_on(0, 5, 55, 60).note_off(96, 5, 55).end();
    let parsed = parse(&Smf::ppq(1, 96).track(first).track(second).build());

    assert_eq!(parsed.instruments().len(), 1);
    let pitches: Vec<u8> = parsed.instruments()[0]
        .notes()
        .iter()
        .map(Note::pitch)
        .collect();
    assert_eq!(pitches, vec![55, 50]);
}

#[test]
fn pitch_bends_and_controllers() {
    let track = Track::new()
        .raw(0, &[0xB0, 7, 100])
        .raw(0, &[0xE0, 0x7F, 0x7F])
        .note_on(0, 0, 60, 100)
        .raw(48, &[0xE0, 0x00, 0x00])
        .note_off(48, 0, 60)
        .raw(96, &[0xB0, 64, 0])
        .end();
    let parsed = parse(&Smf::ppq(0, 96).track(track).build());

    let instrument = &parsed.instruments()[0];
    assert_eq!(
        instrument.pitch_bends(),
        &[
            PitchBend {
                bend: 8191,
                time: 0.
            },
            PitchBend {
                bend: -8192,
                time: 0.25
            },
        ]
    );
    assert_eq!(
        instrument.control_changes(),
        &[
            ControlChange {
                number: 7,
                value: 100,
                time: 0.
            },
            ControlChange {
                number: 64,
                value: 0,
                time: 1.0
            },
        ]
    );
    assert_eq!(instrument.end_time(), 1.0);
}
