// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing and clock module.
//!
//! This module defines the playback clock contract the transport drives,
//! and a threaded implementation that plays timelines to a MIDI output.

pub mod clock;

pub use clock::{Connector, SequencerClock};

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sequencer::Timeline;

/// Tempo a fresh clock starts at
pub const DEFAULT_BPM: f64 = 120.0;

/// How playback behaves at the end of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play the timeline once and stop
    #[default]
    Once,
    /// Repeat until explicitly stopped
    Continuous,
}

/// Playback sink for compiled timelines.
///
/// Implementations own their synchronization: `stop` and `set_tempo` may be
/// called while a playback thread is advancing.
pub trait Clock {
    /// Acquire the underlying device. Idempotent once it succeeds.
    fn open(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Replace the timeline used by the next `start`
    fn load_timeline(&mut self, timeline: Arc<Timeline>) -> Result<()>;

    fn set_loop_mode(&mut self, mode: LoopMode);

    /// Change the effective tempo without moving the play position
    fn set_tempo(&mut self, bpm: f64);

    fn tempo(&self) -> f64;

    /// Begin playback of the loaded timeline from tick 0
    fn start(&mut self) -> Result<()>;

    /// Halt playback immediately
    fn stop(&mut self);

    /// False once playback ends, is stopped, or dies on a device error
    fn is_running(&self) -> bool;

    /// Error that ended playback on its own, if any. Cleared by reading it.
    fn take_failure(&mut self) -> Option<Error>;

    /// Tick most recently played
    fn position(&self) -> u64;
}
