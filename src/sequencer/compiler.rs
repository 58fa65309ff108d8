// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Grid to timeline compiler.

use tracing::debug;

use super::timeline::{NoteEvent, Timeline, LOOP_TICKS};
use crate::grid::{GridState, INSTRUMENTS, STEPS};
use crate::instruments::InstrumentTable;

/// Channel carrying the drum notes (MIDI channel 10)
pub const DRUM_CHANNEL: u8 = 9;

/// Velocity of every note on and note off
pub const VELOCITY: u8 = 100;

/// Channel of the trailing per-instrument control change
pub const RESET_CHANNEL: u8 = 1;

/// Controller number of the trailing per-instrument control change
pub const RESET_CONTROLLER: u8 = 127;

/// Program selected on the drum channel
pub const DRUM_PROGRAM: u8 = 1;

/// Tick of the program select
pub const PROGRAM_TICK: u64 = 15;

/// Compile a grid into a playable timeline.
///
/// Rows are walked in instrument order. Each active step emits a note on at
/// the step's tick and a note off one tick later; every row ends with a
/// control change on the loop boundary. A program select on the drum
/// channel is appended last.
pub fn compile(grid: &GridState, instruments: &InstrumentTable) -> Timeline {
    let mut events = Vec::with_capacity(grid.active_count() * 2 + INSTRUMENTS + 1);

    for (row, instrument) in instruments.iter().enumerate().take(INSTRUMENTS) {
        for step in 0..STEPS {
            if grid.get(row, step) {
                let tick = step as u64;
                events.push(NoteEvent::note_on(tick, DRUM_CHANNEL, instrument.note, VELOCITY));
                events.push(NoteEvent::note_off(tick + 1, DRUM_CHANNEL, instrument.note, VELOCITY));
            }
        }

        events.push(NoteEvent::control_change(
            LOOP_TICKS,
            RESET_CHANNEL,
            RESET_CONTROLLER,
            0,
        ));
    }

    events.push(NoteEvent::program_change(PROGRAM_TICK, DRUM_CHANNEL, DRUM_PROGRAM));

    let timeline = Timeline::new(events);
    debug!(
        events = timeline.len(),
        active = grid.active_count(),
        "compiled pattern"
    );
    timeline
}
