use super::{ControlChange, Instrument, Note, PitchBend, DRUM_CHANNEL};
use crate::{
    diagnostics::Diagnostic,
    events::{EventKind, RawEvent},
    tempo::TickConverter,
};
use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};
use core::cmp::Ordering;

/// A note-on waiting for its release.
#[derive(Debug, Clone, Copy)]
struct PendingNote {
    tick: u64,
    velocity: u8,
    program: u8,
    order: u64,
}

/// Open note-ons per (channel, key), oldest first.
///
/// A queue rather than a single slot: a key retriggered before release opens a
/// second note, and releases close them in the order they were opened.
#[derive(Debug, Default)]
struct PendingNotes(BTreeMap<(u8, u8), VecDeque<PendingNote>>);

impl PendingNotes {
    fn open(&mut self, channel: u8, key: u8, note: PendingNote) {
        self.0.entry((channel, key)).or_default().push_back(note);
    }

    fn close(&mut self, channel: u8, key: u8) -> Option<PendingNote> {
        self.0.get_mut(&(channel, key))?.pop_front()
    }

    /// Notes never released, in the order they were opened.
    fn into_remaining(self) -> Vec<((u8, u8), PendingNote)> {
        let mut remaining: Vec<_> = self
            .0
            .into_iter()
            .flat_map(|(key, queue)| queue.into_iter().map(move |note| (key, note)))
            .collect();
        remaining.sort_by_key(|(_, note)| note.order);
        remaining
    }
}

/// State of one track while it is being assembled. Dropped at the end of the track.
struct TrackState {
    index: usize,
    programs: [u8; 16],
    pending: PendingNotes,
}

#[derive(Debug)]
struct InstrumentBuilder {
    instrument: Instrument,
    note_order: Vec<u64>,
}

#[doc = r#"
Pairs note-ons with their releases and groups the resulting notes into instruments.

Tracks are fed one at a time in file order with [`NoteAssembler::add_track`].
Within a track:

- a note-on with velocity above zero opens a note on its (channel, key)
- a note-off, or a note-on with velocity zero, closes the *oldest* open note on
  that (channel, key)
- a release with nothing open is ignored and reported as
  [`Diagnostic::DanglingNoteOff`]
- notes still open when the track ends are dropped and reported as
  [`Diagnostic::UnterminatedNote`]

A note belongs to the program that was current on its channel, within its track,
when it was opened. Program changes default to 0.
"#]
pub struct NoteAssembler<'c> {
    converter: &'c TickConverter,
    include_drums: bool,
    instruments: Vec<InstrumentBuilder>,
    index: BTreeMap<(u8, u8), usize>,
    diagnostics: Vec<Diagnostic>,
    next_order: u64,
}

impl<'c> NoteAssembler<'c> {
    /// Create an assembler that times notes with `converter`.
    pub fn new(converter: &'c TickConverter) -> Self {
        Self {
            converter,
            include_drums: true,
            instruments: Vec::new(),
            index: BTreeMap::new(),
            diagnostics: Vec::new(),
            next_order: 0,
        }
    }

    /// Whether events on the percussion channel are kept. Defaults to true.
    pub fn with_include_drums(mut self, include: bool) -> Self {
        self.include_drums = include;
        self
    }

    fn instrument_mut(&mut self, channel: u8, program: u8) -> &mut InstrumentBuilder {
        let next = self.instruments.len();
        let idx = *self.index.entry((channel, program)).or_insert(next);
        if idx == next {
            self.instruments.push(InstrumentBuilder {
                instrument: Instrument::new(program, channel),
                note_order: Vec::new(),
            });
        }
        &mut self.instruments[idx]
    }

    /// Assemble the notes of one decoded track.
    pub fn add_track(&mut self, index: usize, events: &[RawEvent<'_>]) {
        let mut state = TrackState {
            index,
            programs: [0; 16],
            pending: PendingNotes::default(),
        };

        for event in events {
            let Some(channel) = event.channel() else {
                continue;
            };
            if channel == DRUM_CHANNEL && !self.include_drums {
                continue;
            }
            self.apply_event(&mut state, channel, event);
        }

        for ((channel, pitch), note) in state.pending.into_remaining() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "track {index}: dropping key {pitch} on channel {channel} opened at tick {} with no release",
                note.tick
            );
            self.diagnostics.push(Diagnostic::UnterminatedNote {
                track: index,
                channel,
                pitch,
                tick: note.tick,
            });
        }
    }

    fn apply_event(&mut self, state: &mut TrackState, channel: u8, event: &RawEvent<'_>) {
        let tick = event.absolute_tick();
        let program = state.programs[channel as usize];
        match event.kind() {
            EventKind::ProgramChange => state.programs[channel as usize] = event.data()[0],
            EventKind::NoteOn if event.is_note_start() => {
                let order = self.next_order;
                self.next_order += 1;
                // registers the instrument so instruments keep first-appearance order
                self.instrument_mut(channel, program);
                state.pending.open(
                    channel,
                    event.key(),
                    PendingNote {
                        tick,
                        velocity: event.velocity(),
                        program,
                        order,
                    },
                );
            }
            EventKind::NoteOn | EventKind::NoteOff => {
                let pitch = event.key();
                let Some(open) = state.pending.close(channel, pitch) else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "track {}: ignoring release of key {pitch} on channel {channel} at tick {tick}",
                        state.index
                    );
                    self.diagnostics.push(Diagnostic::DanglingNoteOff {
                        track: state.index,
                        channel,
                        pitch,
                        tick,
                    });
                    return;
                };
                let note = Note::new(
                    pitch,
                    open.velocity,
                    self.converter.tick_to_seconds(open.tick),
                    self.converter.tick_to_seconds(tick),
                    channel,
                );
                let builder = self.instrument_mut(channel, open.program);
                builder.instrument.notes.push(note);
                builder.note_order.push(open.order);
            }
            EventKind::PitchBend => {
                let Some(bend) = event.pitch_bend() else {
                    return;
                };
                let time = self.converter.tick_to_seconds(tick);
                self.instrument_mut(channel, program)
                    .instrument
                    .pitch_bends
                    .push(PitchBend { bend, time });
            }
            EventKind::ControlChange => {
                let [number, value] = event.data();
                let time = self.converter.tick_to_seconds(tick);
                self.instrument_mut(channel, program)
                    .instrument
                    .control_changes
                    .push(ControlChange {
                        number,
                        value,
                        time,
                    });
            }
            _ => {}
        }
    }

    /// Conditions noticed so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Order every instrument's contents by time and hand them over.
    ///
    /// Instruments that ended up with nothing in them are left out.
    pub fn finish(self) -> (Vec<Instrument>, Vec<Diagnostic>) {
        let instruments = self
            .instruments
            .into_iter()
            .map(InstrumentBuilder::finish)
            .filter(|instrument| !instrument.is_empty())
            .collect();
        (instruments, self.diagnostics)
    }
}

impl InstrumentBuilder {
    fn finish(self) -> Instrument {
        let Self {
            mut instrument,
            note_order,
        } = self;

        let mut notes: Vec<(u64, Note)> = note_order.into_iter().zip(instrument.notes).collect();
        notes.sort_by(|(a_order, a), (b_order, b)| {
            by_time(a.start, b.start).then(a_order.cmp(b_order))
        });
        instrument.notes = notes.into_iter().map(|(_, note)| note).collect();

        instrument.pitch_bends.sort_by(|a, b| by_time(a.time, b.time));
        instrument
            .control_changes
            .sort_by(|a, b| by_time(a.time, b.time));
        instrument
    }
}

fn by_time(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
fn note_on(tick: u64, channel: u8, key: u8, velocity: u8) -> RawEvent<'static> {
    RawEvent::new(0, tick, Some(channel), EventKind::NoteOn, [key, velocity])
}

#[cfg(test)]
fn note_off(tick: u64, channel: u8, key: u8) -> RawEvent<'static> {
    RawEvent::new(0, tick, Some(channel), EventKind::NoteOff, [key, 64])
}

#[cfg(test)]
fn program_change(tick: u64, channel: u8, program: u8) -> RawEvent<'static> {
    RawEvent::new(0, tick, Some(channel), EventKind::ProgramChange, [program, 0])
}

#[cfg(test)]
fn ppq_converter() -> TickConverter {
    use crate::{file::Timing, tempo::TempoChange};
    TickConverter::new(
        Timing::new_ticks_per_quarter_note(10),
        &[TempoChange::new(0, 1_000_000)],
    )
}

#[test]
fn overlapping_same_key_closes_first_opened() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(
        0,
        &[
            note_on(0, 0, 60, 90),
            note_on(10, 0, 60, 80),
            note_off(20, 0, 60),
            note_off(30, 0, 60),
        ],
    );
    let (instruments, diagnostics) = assembler.finish();
    assert!(diagnostics.is_empty());
    assert_eq!(instruments.len(), 1);
    assert_eq!(
        instruments[0].notes(),
        &[
            Note::new(60, 90, 0., 2., 0),
            Note::new(60, 80, 1., 3., 0)
        ]
    );
}

#[test]
fn dangling_release_makes_no_note() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(3, &[note_off(5, 2, 61)]);
    let (instruments, diagnostics) = assembler.finish();
    assert!(instruments.is_empty());
    assert_eq!(
        diagnostics,
        alloc::vec![Diagnostic::DanglingNoteOff {
            track: 3,
            channel: 2,
            pitch: 61,
            tick: 5
        }]
    );
}

#[test]
fn open_notes_are_dropped_at_track_end() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(0, &[note_on(0, 0, 60, 90), note_on(0, 0, 64, 90), note_off(10, 0, 64)]);
    // a release in a later track does not close a note from an earlier one
    assembler.add_track(1, &[note_off(20, 0, 60)]);
    let (instruments, diagnostics) = assembler.finish();
    assert_eq!(instruments[0].notes(), &[Note::new(64, 90, 0., 1., 0)]);
    assert_eq!(diagnostics.len(), 2);
    assert!(matches!(
        diagnostics[0],
        Diagnostic::UnterminatedNote { track: 0, pitch: 60, .. }
    ));
    assert!(matches!(
        diagnostics[1],
        Diagnostic::DanglingNoteOff { track: 1, pitch: 60, .. }
    ));
}

#[test]
fn unterminated_notes_report_in_opening_order() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(
        2,
        &[
            note_on(0, 4, 72, 90),
            note_on(5, 1, 40, 90),
            note_on(5, 4, 48, 90),
            note_on(7, 1, 40, 90),
        ],
    );
    let (_, diagnostics) = assembler.finish();
    let opened: Vec<(u8, u8, u64)> = diagnostics
        .iter()
        .map(|diagnostic| match *diagnostic {
            Diagnostic::UnterminatedNote {
                channel,
                pitch,
                tick,
                ..
            } => (channel, pitch, tick),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(opened, alloc::vec![(4, 72, 0), (1, 40, 5), (4, 48, 5), (1, 40, 7)]);
}

#[test]
fn programs_split_instruments() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(
        0,
        &[
            program_change(0, 0, 5),
            note_on(0, 0, 60, 90),
            // the open note keeps the program it started with
            program_change(5, 0, 7),
            note_off(10, 0, 60),
            note_on(10, 0, 62, 90),
            note_off(20, 0, 62),
        ],
    );
    assembler.add_track(1, &[note_on(0, 0, 48, 70), note_off(10, 0, 48)]);
    let (instruments, _) = assembler.finish();
    let programs: Vec<_> = instruments.iter().map(|i| i.program()).collect();
    assert_eq!(programs, alloc::vec![5, 7, 0]);
    assert_eq!(instruments[0].notes()[0].pitch(), 60);
    assert_eq!(instruments[1].notes()[0].pitch(), 62);
    assert_eq!(instruments[2].notes()[0].pitch(), 48);
}

#[test]
fn notes_across_tracks_are_ordered_by_start() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(0, &[note_on(10, 1, 60, 90), note_off(20, 1, 60)]);
    assembler.add_track(1, &[note_on(0, 1, 50, 90), note_on(10, 1, 55, 90), note_off(30, 1, 50), note_off(30, 1, 55)]);
    let (instruments, _) = assembler.finish();
    assert_eq!(instruments.len(), 1);
    let pitches: Vec<_> = instruments[0].notes().iter().map(Note::pitch).collect();
    // 60 and 55 both start at tick 10; 60 was opened first
    assert_eq!(pitches, alloc::vec![50, 60, 55]);
}

#[test]
fn drums_can_be_skipped() {
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter).with_include_drums(false);
    assembler.add_track(0, &[note_on(0, 9, 36, 100), note_off(1, 9, 36)]);
    let (instruments, diagnostics) = assembler.finish();
    assert!(instruments.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn pitch_bends_and_controls_follow_program() {
    use pretty_assertions::assert_eq;
    let converter = ppq_converter();
    let mut assembler = NoteAssembler::new(&converter);
    assembler.add_track(
        0,
        &[
            program_change(0, 3, 40),
            RawEvent::new(0, 10, Some(3), EventKind::PitchBend, [0x00, 0x60]),
            RawEvent::new(0, 20, Some(3), EventKind::ControlChange, [7, 100]),
        ],
    );
    let (instruments, _) = assembler.finish();
    assert_eq!(instruments.len(), 1);
    assert_eq!(instruments[0].program(), 40);
    assert_eq!(
        instruments[0].pitch_bends(),
        &[PitchBend {
            bend: 4096,
            time: 1.
        }]
    );
    assert_eq!(
        instruments[0].control_changes(),
        &[ControlChange {
            number: 7,
            value: 100,
            time: 2.
        }]
    );
}
