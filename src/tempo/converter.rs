use super::TempoChange;
use crate::file::{Timing, meta::DEFAULT_MICROS_PER_QUARTER_NOTE};
use alloc::vec::Vec;

/// Elapsed time at the start of one tempo segment.
///
/// A tick inside the segment lasts `numerator / denominator` seconds. The two
/// are kept apart so that whole segments convert without rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    /// First tick of the segment
    pub tick: u64,
    /// Seconds elapsed before `tick`
    pub seconds: f64,
    numerator: f64,
    denominator: f64,
}

impl Checkpoint {
    fn new(tick: u64, seconds: f64, numerator: f64, denominator: f64) -> Self {
        // a zero division or frame rate makes every tick instantaneous
        if denominator > 0. {
            Self {
                tick,
                seconds,
                numerator,
                denominator,
            }
        } else {
            Self {
                tick,
                seconds,
                numerator: 0.,
                denominator: 1.,
            }
        }
    }

    /// Length of one tick inside the segment
    pub fn seconds_per_tick(&self) -> f64 {
        self.numerator / self.denominator
    }

    fn seconds_after(&self, ticks: u64) -> f64 {
        ticks as f64 * self.numerator / self.denominator
    }
}

#[doc = r#"
Maps absolute ticks to absolute seconds.

For ticks-per-quarter-note timing each tempo segment lasts
`ticks * micros_per_quarter_note / (1_000_000 * ticks_per_quarter_note)`
seconds. The elapsed time at every tempo boundary is computed once, so a lookup
is a binary search over those checkpoints.

For SMPTE timing every tick lasts `1 / (fps * ticks_per_frame)` seconds and the
tempo map is ignored.

The mapping is monotonic: a later tick never maps to an earlier time.

# Example
```rust
# use midi_timeline::prelude::*;
let map = [TempoChange::new(0, 500_000), TempoChange::new(960, 1_000_000)];
let converter = TickConverter::new(Timing::new_ticks_per_quarter_note(480), &map);
assert_eq!(converter.tick_to_seconds(960), 1.0);
assert_eq!(converter.tick_to_seconds(1440), 2.0);
```
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickConverter {
    checkpoints: Vec<Checkpoint>,
}

impl TickConverter {
    /// Build the checkpoints for a file's timing and tempo map.
    ///
    /// `tempo_map` must be sorted by tick; an empty map means 120 BPM throughout.
    /// A tempo map that does not start at tick 0 is treated as 120 BPM until
    /// its first entry.
    pub fn new(timing: Timing, tempo_map: &[TempoChange]) -> Self {
        let tpqn = match timing {
            Timing::Smpte(smpte) => {
                return Self {
                    checkpoints: alloc::vec![Checkpoint::new(
                        0,
                        0.,
                        1.,
                        smpte.ticks_per_second()
                    )],
                };
            }
            Timing::TicksPerQuarterNote(tpqn) => tpqn.ticks_per_quarter_note(),
        };
        let denominator = 1_000_000. * tpqn as f64;
        let segment = |tick: u64, seconds: f64, micros: u32| {
            Checkpoint::new(tick, seconds, micros as f64, denominator)
        };

        let mut checkpoints: Vec<Checkpoint> = Vec::with_capacity(tempo_map.len() + 1);
        let mut current = segment(0, 0., DEFAULT_MICROS_PER_QUARTER_NOTE);

        for change in tempo_map {
            if change.tick > current.tick {
                checkpoints.push(current);
                let seconds = current.seconds + current.seconds_after(change.tick - current.tick);
                current = segment(change.tick, seconds, change.micros_per_quarter_note);
            } else {
                current = segment(current.tick, current.seconds, change.micros_per_quarter_note);
            }
        }
        checkpoints.push(current);

        Self { checkpoints }
    }

    /// The checkpoint at the start of every tempo segment.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    fn segment_for_tick(&self, tick: u64) -> &Checkpoint {
        let idx = self
            .checkpoints
            .partition_point(|checkpoint| checkpoint.tick <= tick);
        &self.checkpoints[idx.saturating_sub(1)]
    }

    /// Seconds elapsed from the start of the file until `tick`.
    pub fn tick_to_seconds(&self, tick: u64) -> f64 {
        let segment = self.segment_for_tick(tick);
        segment.seconds + segment.seconds_after(tick - segment.tick)
    }

    /// The last tick that starts at or before `seconds`.
    ///
    /// Inverts [`tick_to_seconds`](Self::tick_to_seconds) exactly: for every
    /// tick `t`, `seconds_to_tick(tick_to_seconds(t))` is the last tick sharing
    /// that start time, which is `t` itself unless the tempo is zero.
    pub fn seconds_to_tick(&self, seconds: f64) -> u64 {
        if seconds.is_nan() || seconds <= 0. {
            return 0;
        }
        let idx = self
            .checkpoints
            .partition_point(|checkpoint| checkpoint.seconds <= seconds);
        let segment = &self.checkpoints[idx.saturating_sub(1)];
        if segment.numerator <= 0. {
            return segment.tick;
        }
        let offset = (seconds - segment.seconds) * segment.denominator / segment.numerator;
        let mut tick = segment.tick.saturating_add(offset as u64);

        // the division rounds, so the estimate can sit one tick to either side
        while tick > segment.tick && self.tick_to_seconds(tick) > seconds {
            tick -= 1;
        }
        while let Some(next) = tick.checked_add(1) {
            if self.tick_to_seconds(next) > seconds {
                break;
            }
            tick = next;
        }
        tick
    }

    /// The conversion as a plain function value.
    pub fn as_fn(&self) -> impl Fn(u64) -> f64 + '_ {
        move |tick| self.tick_to_seconds(tick)
    }
}

#[cfg(test)]
fn ppq(tpqn: u16) -> Timing {
    Timing::new_ticks_per_quarter_note(tpqn)
}

#[test]
fn default_tempo_quarter_note_is_half_a_second() {
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(ppq(480), &[TempoChange::new(0, 500_000)]);
    assert_eq!(converter.tick_to_seconds(0), 0.);
    assert_eq!(converter.tick_to_seconds(480), 0.5);
    assert_eq!(converter.tick_to_seconds(960), 1.0);

    let empty_map = TickConverter::new(ppq(480), &[]);
    assert_eq!(empty_map.tick_to_seconds(960), 1.0);
}

#[test]
fn tempo_change_mid_file() {
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(
        ppq(480),
        &[
            TempoChange::new(0, 500_000),
            TempoChange::new(960, 1_000_000),
        ],
    );
    assert_eq!(converter.checkpoints().len(), 2);
    assert_eq!(converter.tick_to_seconds(480), 0.5);
    assert_eq!(converter.tick_to_seconds(960), 1.0);
    assert_eq!(converter.tick_to_seconds(1200), 1.5);
    assert_eq!(converter.tick_to_seconds(1440), 2.0);
}

#[test]
fn map_not_starting_at_zero_uses_default_first() {
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(ppq(96), &[TempoChange::new(96, 250_000)]);
    assert_eq!(converter.tick_to_seconds(96), 0.5);
    assert_eq!(converter.tick_to_seconds(192), 0.75);
}

#[test]
fn smpte_ignores_tempo() {
    use crate::file::SmpteFps;
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(
        Timing::new_smpte(SmpteFps::TwentyFive, 40),
        &[TempoChange::new(0, 1_000_000), TempoChange::new(10, 2_000)],
    );
    assert_eq!(converter.tick_to_seconds(1000), 1.0);
    assert_eq!(converter.tick_to_seconds(2500), 2.5);
}

#[test]
fn conversion_is_monotonic() {
    let converter = TickConverter::new(
        ppq(120),
        &[
            TempoChange::new(0, 700_000),
            TempoChange::new(33, 1),
            TempoChange::new(34, 16_777_215),
            TempoChange::new(500, 0),
            TempoChange::new(900, 321_987),
        ],
    );
    let mut last = 0.;
    for tick in 0..2_000 {
        let now = converter.tick_to_seconds(tick);
        assert!(now >= last, "tick {tick}: {now} < {last}");
        last = now;
    }
}

#[test]
fn seconds_back_to_ticks() {
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(
        ppq(480),
        &[
            TempoChange::new(0, 500_000),
            TempoChange::new(960, 1_000_000),
        ],
    );
    assert_eq!(converter.seconds_to_tick(0.), 0);
    assert_eq!(converter.seconds_to_tick(0.5), 480);
    assert_eq!(converter.seconds_to_tick(1.0), 960);
    assert_eq!(converter.seconds_to_tick(2.0), 1440);
}

#[test]
fn seconds_to_tick_inverts_every_tick() {
    use pretty_assertions::assert_eq;
    let maps: [(u16, &[TempoChange]); 4] = [
        (120, &[TempoChange::new(0, 600_000)]),
        (96, &[TempoChange::new(0, 333_333)]),
        (
            480,
            &[
                TempoChange::new(0, 428_571),
                TempoChange::new(1_000, 701_754),
                TempoChange::new(3_001, 517_241),
            ],
        ),
        (
            25,
            &[TempoChange::new(0, 999_999), TempoChange::new(77, 123_457)],
        ),
    ];
    for (tpqn, map) in maps {
        let converter = TickConverter::new(ppq(tpqn), map);
        for tick in 0..5_000 {
            let seconds = converter.tick_to_seconds(tick);
            assert_eq!(
                converter.seconds_to_tick(seconds),
                tick,
                "ppq {tpqn}, tick {tick} at {seconds}s"
            );
        }
    }
    let converter = TickConverter::new(ppq(120), &[TempoChange::new(0, 600_000)]);
    assert_eq!(converter.seconds_to_tick(1.005), 201);
    assert_eq!(converter.seconds_to_tick(1.0074), 201);
}

#[test]
fn seconds_to_tick_with_a_zero_tempo_segment() {
    use pretty_assertions::assert_eq;
    let converter = TickConverter::new(
        ppq(100),
        &[
            TempoChange::new(0, 1_000_000),
            TempoChange::new(100, 0),
            TempoChange::new(200, 1_000_000),
        ],
    );
    assert_eq!(converter.tick_to_seconds(150), 1.0);
    // ticks 100..=200 all start at one second
    assert_eq!(converter.seconds_to_tick(1.0), 200);
    assert_eq!(converter.seconds_to_tick(1.5), 250);
    assert_eq!(converter.seconds_to_tick(f64::NAN), 0);
}

#[test]
fn converter_as_function() {
    let converter = TickConverter::new(ppq(480), &[]);
    let to_seconds = converter.as_fn();
    assert_eq!(to_seconds(480), 0.5);
}
