mod common;

use common::{Smf, Track};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn default_tempo() {
    let track = Track::new()
        .note_on(0, 0, 60, 100)
        .note_off(480, 0, 60)
        .note_on(0, 0, 62, 100)
        .note_off(480, 0, 62)
        .end();
    let parsed = ParsedMidi::parse(&Smf::ppq(0, 480).track(track).build()).unwrap();

    assert_eq!(parsed.tempo_changes(), &[TempoChange::new(0, 500_000)]);
    assert_eq!(parsed.tick_to_seconds(480), 0.5);
    assert_eq!(parsed.tick_to_seconds(960), 1.0);

    let notes = parsed.instruments()[0].notes();
    assert_eq!(notes[0].start(), 0.);
    assert_eq!(notes[0].end(), 0.5);
    assert_eq!(notes[1].start(), 0.5);
    assert_eq!(notes[1].end(), 1.0);
}

#[test]
fn tempo_change_stretches_later_notes() {
    let track = Track::new()
        .tempo(0, 500_000)
        .tempo(960, 1_000_000)
        .note_on(0, 0, 60, 100)
        .note_off(480, 0, 60)
        .end();
    let parsed = ParsedMidi::parse(&Smf::ppq(0, 480).track(track).build()).unwrap();

    assert_eq!(
        parsed.tempo_changes(),
        &[TempoChange::new(0, 500_000), TempoChange::new(960, 1_000_000)]
    );
    let note = parsed.instruments()[0].notes()[0];
    assert_eq!(note.start(), 1.0);
    assert_eq!(note.end(), 2.0);
    assert_eq!(note.duration(), 1.0);
}

#[test]
fn tempo_in_later_track_moves_every_track() {
    let conductor = Track::new().end();
    let melody = Track::new().note_on(0, 0, 60, 100).note_off(192, 0, 60).end();
    let tempo = Track::new().tempo(96, 250_000).end();
    let bytes = Smf::ppq(1, 96)
        .track(conductor)
        .track(melody)
        .track(tempo)
        .build();

    let parsed = ParsedMidi::parse(&bytes).unwrap();
    // 96 ticks at 120 BPM, then 96 ticks at 240 BPM
    assert_eq!(parsed.instruments()[0].notes()[0].end(), 0.75);

    let options = ParseOptions::default().with_tempo_source(TempoSource::FirstTrack);
    let first_only = ParsedMidi::parse_with(&bytes, options).unwrap();
    assert_eq!(first_only.tempo_changes(), &[TempoChange::new(0, 500_000)]);
    assert_eq!(first_only.instruments()[0].notes()[0].end(), 1.0);
}

#[test]
fn smpte_ignores_tempo_events() {
    let track = Track::new()
        .tempo(0, 2_000_000)
        .note_on(0, 0, 60, 100)
        .note_off(1000, 0, 60)
        .end();
    let parsed = ParsedMidi::parse(&Smf::smpte(0, 25, 40).track(track).build()).unwrap();

    let Timing::Smpte(smpte) = parsed.timing() else {
        panic!("expected SMPTE timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(parsed.resolution(), None);
    assert!(parsed.tempo_changes().is_empty());
    assert_eq!(parsed.instruments()[0].notes()[0].end(), 1.0);
}

#[test]
fn drop_frame_rate() {
    // 29.97 frames per second, so 3000 frames last 100.1 seconds
    let track = Track::new().note_on(0, 0, 60, 100).note_off(30_000, 0, 60).end();
    let parsed = ParsedMidi::parse(&Smf::smpte(0, 29, 10).track(track).build()).unwrap();
    let end = parsed.instruments()[0].notes()[0].end();
    assert!((end - 100.1).abs() < 1e-9, "{end}");
}

#[test]
fn time_signatures_are_timed() {
    let track = Track::new()
        .raw(0, &[0xFF, 0x58, 0x04, 6, 3, 24, 8])
        .raw(960, &[0xFF, 0x58, 0x04, 3, 2, 24, 8])
        .end();
    let parsed = ParsedMidi::parse(&Smf::ppq(0, 480).track(track).build()).unwrap();

    let changes = parsed.time_signatures();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].signature.numerator(), 6);
    assert_eq!(changes[0].signature.denominator(), Some(8));
    assert_eq!(changes[1].tick, 960);
    assert_eq!(changes[1].time, 1.0);
    assert_eq!(changes[1].signature.denominator(), Some(4));
}

#[test]
fn converter_round_trips_through_seconds() {
    let track = Track::new().tempo(0, 600_000).tempo(300, 450_000).end();
    let parsed = ParsedMidi::parse(&Smf::ppq(0, 120).track(track).build()).unwrap();
    let converter = parsed.converter();
    for tick in (0..2_000).chain([50_000, 1_234_567]) {
        let seconds = converter.tick_to_seconds(tick);
        let back = converter.seconds_to_tick(seconds);
        assert_eq!(back, tick, "tick {tick} at {seconds}s");
    }
    // halfway through a tick still belongs to that tick
    assert_eq!(converter.seconds_to_tick(1.0075), 201);
}
