#![doc = r#"
Tempo maps and tick to time conversion

A tempo map is the sorted list of [`TempoChange`]s in a file. Together with the
header's [`Timing`](crate::file::Timing) it determines how long every tick lasts.
The [`TickConverter`] precomputes the elapsed time at each tempo boundary so
that converting a tick is a binary search plus one multiplication.
"#]

mod converter;
pub use converter::*;

use crate::{
    events::RawEvent,
    file::meta::{DEFAULT_MICROS_PER_QUARTER_NOTE, SET_TEMPO, TIME_SIGNATURE, Tempo, TimeSignature},
};
use alloc::vec::Vec;

/// A tempo taking effect at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    /// Absolute tick at which the tempo applies
    pub tick: u64,
    /// Microseconds per quarter note from this tick onward
    pub micros_per_quarter_note: u32,
}

impl TempoChange {
    /// Create a new tempo change
    pub const fn new(tick: u64, micros_per_quarter_note: u32) -> Self {
        Self {
            tick,
            micros_per_quarter_note,
        }
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        Tempo::new(self.micros_per_quarter_note).bpm()
    }
}

#[doc = r#"
Which tracks are searched for set-tempo events.

Format 1 files conventionally keep the tempo map in the first track, but some
encoders place tempo events elsewhere. Scanning every track is the lenient
default.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TempoSource {
    /// Merge set-tempo events from every track
    #[default]
    AllTracks,
    /// Only read set-tempo events from the first track
    FirstTrack,
}

impl TempoSource {
    fn tracks<'t, 'a>(&self, tracks: &'t [Vec<RawEvent<'a>>]) -> &'t [Vec<RawEvent<'a>>] {
        match self {
            Self::AllTracks => tracks,
            Self::FirstTrack => &tracks[..tracks.len().min(1)],
        }
    }
}

/// Collect the tempo map of a set of decoded tracks.
///
/// The result is sorted by tick, holds at most one entry per tick (the last
/// one seen in track order wins) and always starts at tick 0, falling back to
/// 120 BPM when no tempo is set there.
pub fn build_tempo_map(tracks: &[Vec<RawEvent<'_>>], source: TempoSource) -> Vec<TempoChange> {
    let mut changes: Vec<TempoChange> = source
        .tracks(tracks)
        .iter()
        .flatten()
        .filter_map(|event| {
            let tempo = Tempo::from_payload(event.meta_payload(SET_TEMPO)?)?;
            Some(TempoChange::new(
                event.absolute_tick(),
                tempo.micros_per_quarter_note(),
            ))
        })
        .collect();

    // stable, so equal ticks stay in the order they were seen
    changes.sort_by_key(|change| change.tick);

    let mut map: Vec<TempoChange> = Vec::with_capacity(changes.len() + 1);
    for change in changes {
        match map.last_mut() {
            Some(last) if last.tick == change.tick => *last = change,
            _ => map.push(change),
        }
    }

    if map.first().is_none_or(|first| first.tick != 0) {
        map.insert(0, TempoChange::new(0, DEFAULT_MICROS_PER_QUARTER_NOTE));
    }
    map
}

/// A time signature taking effect at a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignatureChange {
    /// Absolute tick of the change
    pub tick: u64,
    /// Time of the change in seconds
    pub time: f64,
    /// The decoded signature
    pub signature: TimeSignature,
}

/// Collect every time signature event from every track, sorted by tick.
pub fn collect_time_signatures(
    tracks: &[Vec<RawEvent<'_>>],
    converter: &TickConverter,
) -> Vec<TimeSignatureChange> {
    let mut changes: Vec<TimeSignatureChange> = tracks
        .iter()
        .flatten()
        .filter_map(|event| {
            let signature = TimeSignature::from_payload(event.meta_payload(TIME_SIGNATURE)?)?;
            Some(TimeSignatureChange {
                tick: event.absolute_tick(),
                time: converter.tick_to_seconds(event.absolute_tick()),
                signature,
            })
        })
        .collect();
    changes.sort_by_key(|change| change.tick);
    changes
}

#[cfg(test)]
fn tempo_event(tick: u64, micros: u32) -> RawEvent<'static> {
    let bytes = micros.to_be_bytes();
    let payload: &'static [u8] = alloc::boxed::Box::leak(alloc::boxed::Box::new([
        bytes[1], bytes[2], bytes[3],
    ]));
    RawEvent::new(
        0,
        tick,
        None,
        crate::events::EventKind::Meta {
            meta_type: SET_TEMPO,
            payload,
        },
        [0; 2],
    )
}

#[test]
fn empty_tracks_get_default_tempo() {
    use pretty_assertions::assert_eq;
    let map = build_tempo_map(&[], TempoSource::AllTracks);
    assert_eq!(map, alloc::vec![TempoChange::new(0, 500_000)]);
}

#[test]
fn implicit_default_is_prepended() {
    use pretty_assertions::assert_eq;
    let tracks = alloc::vec![alloc::vec![tempo_event(960, 1_000_000)]];
    let map = build_tempo_map(&tracks, TempoSource::AllTracks);
    assert_eq!(
        map,
        alloc::vec![
            TempoChange::new(0, 500_000),
            TempoChange::new(960, 1_000_000)
        ]
    );
}

#[test]
fn merges_tracks_and_keeps_last_duplicate() {
    use pretty_assertions::assert_eq;
    let tracks = alloc::vec![
        alloc::vec![tempo_event(0, 600_000), tempo_event(480, 400_000)],
        alloc::vec![tempo_event(240, 450_000), tempo_event(480, 300_000)],
    ];
    let map = build_tempo_map(&tracks, TempoSource::AllTracks);
    assert_eq!(
        map,
        alloc::vec![
            TempoChange::new(0, 600_000),
            TempoChange::new(240, 450_000),
            TempoChange::new(480, 300_000),
        ]
    );

    let first_only = build_tempo_map(&tracks, TempoSource::FirstTrack);
    assert_eq!(
        first_only,
        alloc::vec![TempoChange::new(0, 600_000), TempoChange::new(480, 400_000)]
    );
}

#[test]
fn bpm_of_default_tempo() {
    assert_eq!(TempoChange::new(0, 500_000).bpm(), 120.);
}
