// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Compiled event timeline.
//!
//! A timeline is an immutable, tick-ordered list of MIDI events plus the
//! resolution and loop length needed to play it back.

use std::time::Duration;

use crate::midi::messages;

/// Ticks per quarter note (one tick per grid step, four steps per beat)
pub const TICKS_PER_QUARTER: u32 = 4;

/// Length of one pass through the pattern in ticks
pub const LOOP_TICKS: u64 = 16;

/// Kind of MIDI message carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    ControlChange,
    ProgramChange,
}

/// A single timed MIDI event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    /// Position from the start of the loop
    pub tick: u64,
    /// Message type
    pub kind: EventKind,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// First data byte (note, controller or program)
    pub data1: u8,
    /// Second data byte (velocity or value)
    pub data2: u8,
}

impl NoteEvent {
    pub fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            kind: EventKind::NoteOn,
            channel,
            data1: note,
            data2: velocity,
        }
    }

    pub fn note_off(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            kind: EventKind::NoteOff,
            channel,
            data1: note,
            data2: velocity,
        }
    }

    pub fn control_change(tick: u64, channel: u8, controller: u8, value: u8) -> Self {
        Self {
            tick,
            kind: EventKind::ControlChange,
            channel,
            data1: controller,
            data2: value,
        }
    }

    pub fn program_change(tick: u64, channel: u8, program: u8) -> Self {
        Self {
            tick,
            kind: EventKind::ProgramChange,
            channel,
            data1: program,
            data2: 0,
        }
    }

    /// Raw MIDI bytes for this event
    pub fn to_midi_bytes(&self) -> Vec<u8> {
        let channel = self.channel & 0x0F;
        match self.kind {
            EventKind::NoteOn => vec![messages::NOTE_ON | channel, self.data1 & 0x7F, self.data2 & 0x7F],
            EventKind::NoteOff => vec![messages::NOTE_OFF | channel, self.data1 & 0x7F, self.data2 & 0x7F],
            EventKind::ControlChange => {
                vec![messages::CONTROL_CHANGE | channel, self.data1 & 0x7F, self.data2 & 0x7F]
            }
            EventKind::ProgramChange => vec![messages::PROGRAM_CHANGE | channel, self.data1 & 0x7F],
        }
    }
}

/// Ordered events ready for playback
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timeline {
    events: Vec<NoteEvent>,
    ticks_per_quarter: u32,
    loop_ticks: u64,
}

impl Timeline {
    /// Build a timeline, ordering events by tick.
    ///
    /// The sort is stable so events sharing a tick keep insertion order.
    pub fn new(mut events: Vec<NoteEvent>) -> Self {
        events.sort_by_key(|e| e.tick);
        Self {
            events,
            ticks_per_quarter: TICKS_PER_QUARTER,
            loop_ticks: LOOP_TICKS,
        }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn ticks_per_quarter(&self) -> u32 {
        self.ticks_per_quarter
    }

    /// Nominal loop length; events may sit on the boundary tick itself
    pub fn loop_ticks(&self) -> u64 {
        self.loop_ticks
    }

    /// Events scheduled exactly at `tick`
    pub fn events_at(&self, tick: u64) -> &[NoteEvent] {
        let start = self.events.partition_point(|e| e.tick < tick);
        let end = self.events.partition_point(|e| e.tick <= tick);
        &self.events[start..end]
    }

    /// Count of events of a given kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Channels used by any event, ascending
    pub fn channels(&self) -> Vec<u8> {
        let mut channels: Vec<u8> = self.events.iter().map(|e| e.channel & 0x0F).collect();
        channels.sort_unstable();
        channels.dedup();
        channels
    }

    /// Duration of one tick at the given tempo.
    ///
    /// Tempos too slow to represent saturate to `Duration::MAX`.
    pub fn tick_duration(&self, bpm: f64) -> Duration {
        Duration::try_from_secs_f64(60.0 / (bpm * self.ticks_per_quarter as f64))
            .unwrap_or(Duration::MAX)
    }

    /// Convert a tick position to microseconds at the given tempo
    pub fn ticks_to_micros(&self, ticks: u64, bpm: f64) -> u64 {
        let micros_per_beat = 60_000_000.0 / bpm;
        let micros_per_tick = micros_per_beat / self.ticks_per_quarter as f64;
        (ticks as f64 * micros_per_tick) as u64
    }

    /// Length of one loop pass at the given tempo
    pub fn loop_duration(&self, bpm: f64) -> Duration {
        Duration::from_micros(self.ticks_to_micros(self.loop_ticks, bpm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_ordering() {
        let timeline = Timeline::new(vec![
            NoteEvent::note_on(5, 9, 40, 100),
            NoteEvent::note_off(6, 9, 40, 100),
            NoteEvent::note_on(0, 9, 41, 100),
            NoteEvent::note_on(5, 9, 42, 100),
        ]);

        let notes: Vec<(u64, u8)> = timeline.events().iter().map(|e| (e.tick, e.data1)).collect();
        assert_eq!(notes, vec![(0, 41), (5, 40), (5, 42), (6, 40)]);
    }

    #[test]
    fn test_events_at() {
        let timeline = Timeline::new(vec![
            NoteEvent::note_on(0, 9, 35, 100),
            NoteEvent::note_off(1, 9, 35, 100),
            NoteEvent::control_change(16, 1, 127, 0),
            NoteEvent::control_change(16, 1, 127, 0),
        ]);

        assert_eq!(timeline.events_at(0).len(), 1);
        assert_eq!(timeline.events_at(16).len(), 2);
        assert!(timeline.events_at(7).is_empty());
        assert!(timeline.events_at(99).is_empty());
    }

    #[test]
    fn test_midi_bytes() {
        assert_eq!(NoteEvent::note_on(0, 9, 35, 100).to_midi_bytes(), vec![0x99, 35, 100]);
        assert_eq!(NoteEvent::note_off(1, 9, 35, 100).to_midi_bytes(), vec![0x89, 35, 100]);
        assert_eq!(NoteEvent::control_change(16, 1, 127, 0).to_midi_bytes(), vec![0xB1, 127, 0]);
        assert_eq!(NoteEvent::program_change(15, 9, 1).to_midi_bytes(), vec![0xC9, 1]);
    }

    #[test]
    fn test_timing_at_120() {
        let timeline = Timeline::new(Vec::new());
        // 120 BPM, 4 ticks per beat: 125ms per tick, 2s per loop
        assert_eq!(timeline.ticks_to_micros(1, 120.0), 125_000);
        assert_eq!(timeline.loop_duration(120.0), Duration::from_secs(2));
        assert_eq!(timeline.tick_duration(120.0), Duration::from_millis(125));
    }

    #[test]
    fn test_channels() {
        let timeline = Timeline::new(vec![
            NoteEvent::note_on(0, 9, 35, 100),
            NoteEvent::control_change(16, 1, 127, 0),
            NoteEvent::program_change(15, 9, 1),
        ]);
        assert_eq!(timeline.channels(), vec![1, 9]);
    }
}
