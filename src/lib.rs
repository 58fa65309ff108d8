// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! BeatBox - a 16x16 step sequencer drum machine.
//!
//! The grid is compiled into a MIDI event timeline which a threaded clock
//! plays in a loop; patterns are saved and loaded as small binary records.

pub mod config;
pub mod error;
pub mod grid;
pub mod instruments;
pub mod midi;
pub mod persistence;
pub mod sequencer;
pub mod session;
pub mod timing;
pub mod transport;

pub use error::{Error, Result};
pub use grid::GridState;
pub use instruments::{Instrument, InstrumentTable};
pub use persistence::PersistenceService;
pub use sequencer::{compile, EventKind, NoteEvent, Timeline};
pub use session::{Command, Outcome, Session};
pub use timing::{Clock, LoopMode, SequencerClock};
pub use transport::{PlayState, Transport, TransportState};
