// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback transport.
//!
//! The transport is a two-state machine (stopped, playing) that compiles the
//! grid on every start, hands the timeline to a [`Clock`] and scales a fixed
//! base tempo by a multiplicative tempo factor.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::grid::GridState;
use crate::instruments::InstrumentTable;
use crate::sequencer::{compile, Timeline};
use crate::timing::{Clock, LoopMode};

/// Base tempo the factor is applied to
pub const BASE_TEMPO_BPM: f64 = 120.0;

/// Factor applied by one tempo-up press
pub const TEMPO_UP: f64 = 1.03;

/// Factor applied by one tempo-down press
pub const TEMPO_DOWN: f64 = 0.97;

/// Transport play state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Transport parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    /// Whether playback is running
    pub running: bool,
    /// Multiplier on the base tempo (always positive, unbounded)
    pub tempo_factor: f64,
    /// Base tempo in BPM
    pub base_tempo: f64,
}

impl TransportState {
    /// Tempo the clock should run at
    pub fn effective_bpm(&self) -> f64 {
        self.base_tempo * self.tempo_factor
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            running: false,
            tempo_factor: 1.0,
            base_tempo: BASE_TEMPO_BPM,
        }
    }
}

/// Transport driving a playback clock
pub struct Transport<C: Clock> {
    clock: C,
    instruments: InstrumentTable,
    state: TransportState,
    timeline: Option<Arc<Timeline>>,
}

impl<C: Clock> Transport<C> {
    pub fn new(clock: C, instruments: InstrumentTable) -> Self {
        Self {
            clock,
            instruments,
            state: TransportState::default(),
            timeline: None,
        }
    }

    /// Compile `grid` and play it in a loop from tick 0.
    ///
    /// Acquires the clock first if needed. On any device failure the
    /// transport is left stopped with no timeline; calling `start` again
    /// retries the acquisition.
    pub fn start(&mut self, grid: &GridState) -> Result<()> {
        if let Err(e) = self.clock.open() {
            warn!(error = %e, "could not open clock");
            self.reset();
            return Err(e);
        }

        let timeline = Arc::new(compile(grid, &self.instruments));
        if let Err(e) = self.launch(Arc::clone(&timeline)) {
            warn!(error = %e, "could not start playback");
            self.clock.stop();
            self.reset();
            return Err(e);
        }

        self.timeline = Some(timeline);
        self.state.running = true;
        info!(bpm = self.state.effective_bpm(), "transport started");
        Ok(())
    }

    fn launch(&mut self, timeline: Arc<Timeline>) -> Result<()> {
        self.clock.load_timeline(timeline)?;
        self.clock.set_loop_mode(LoopMode::Continuous);
        self.clock.set_tempo(self.state.effective_bpm());
        self.clock.start()
    }

    fn reset(&mut self) {
        self.state.running = false;
        self.timeline = None;
    }

    /// Halt playback. Grid and tempo factor are kept.
    pub fn stop(&mut self) {
        if self.clock.is_open() {
            self.clock.stop();
        }
        if self.state.running {
            info!("transport stopped");
        }
        self.state.running = false;
    }

    /// Notice a clock that stopped on its own.
    ///
    /// If the transport believes it is playing but the clock has halted
    /// (a device failure mid-loop), the transport drops to Stopped with no
    /// timeline and the failure is returned once.
    pub fn check_playback(&mut self) -> Result<()> {
        if !self.state.running || self.clock.is_running() {
            return Ok(());
        }

        self.reset();
        let err = self
            .clock
            .take_failure()
            .unwrap_or_else(|| Error::device("playback ended unexpectedly"));
        warn!(error = %err, "playback lost");
        Err(err)
    }

    /// Speed up by 3%.
    ///
    /// The factor changes even when a dead clock is reported.
    pub fn tempo_up(&mut self) -> Result<()> {
        let health = self.check_playback();
        self.scale_tempo(TEMPO_UP);
        health
    }

    /// Slow down by 3%
    pub fn tempo_down(&mut self) -> Result<()> {
        let health = self.check_playback();
        self.scale_tempo(TEMPO_DOWN);
        health
    }

    fn scale_tempo(&mut self, factor: f64) {
        self.state.tempo_factor *= factor;
        if self.state.running {
            self.clock.set_tempo(self.state.effective_bpm());
        }
        debug!(
            factor = self.state.tempo_factor,
            bpm = self.state.effective_bpm(),
            "tempo changed"
        );
    }

    /// Playing only while the clock is actually advancing
    pub fn play_state(&self) -> PlayState {
        if self.is_playing() {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.running && self.clock.is_running()
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn tempo_factor(&self) -> f64 {
        self.state.tempo_factor
    }

    pub fn effective_bpm(&self) -> f64 {
        self.state.effective_bpm()
    }

    /// Timeline currently submitted to the clock
    pub fn timeline(&self) -> Option<&Arc<Timeline>> {
        self.timeline.as_ref()
    }

    pub fn instruments(&self) -> &InstrumentTable {
        &self.instruments
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
