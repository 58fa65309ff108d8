// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editing session.
//!
//! The session owns the grid, the transport and the persistence service.
//! Editor commands go through `&mut self`, so their effects on grid and
//! transport are strictly serialized on the control thread.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::grid::GridState;
use crate::instruments::InstrumentTable;
use crate::persistence::PersistenceService;
use crate::timing::Clock;
use crate::transport::{PlayState, Transport};

/// A command issued by the editor
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle { instrument: usize, step: usize },
    Clear,
    Start,
    Stop,
    TempoUp,
    TempoDown,
    SelectFolder(PathBuf),
    Save,
    Load(PathBuf),
}

/// What a successful command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    /// New value of a toggled cell
    Toggled(bool),
    /// Path a pattern was written to
    Saved(PathBuf),
}

/// Drum machine session
pub struct Session<C: Clock> {
    grid: GridState,
    transport: Transport<C>,
    persistence: PersistenceService,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C, instruments: InstrumentTable) -> Self {
        Self::with_persistence(clock, instruments, PersistenceService::new())
    }

    pub fn with_persistence(
        clock: C,
        instruments: InstrumentTable,
        persistence: PersistenceService,
    ) -> Self {
        Self {
            grid: GridState::new(),
            transport: Transport::new(clock, instruments),
            persistence,
        }
    }

    /// Run one editor command
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        let result = match command {
            Command::Toggle { instrument, step } => {
                Ok(Outcome::Toggled(self.toggle(instrument, step)))
            }
            Command::Clear => {
                self.grid.clear();
                Ok(Outcome::Done)
            }
            Command::Start => self.start().map(|_| Outcome::Done),
            Command::Stop => {
                self.stop();
                Ok(Outcome::Done)
            }
            Command::TempoUp => self.tempo_up().map(|_| Outcome::Done),
            Command::TempoDown => self.tempo_down().map(|_| Outcome::Done),
            Command::SelectFolder(folder) => self.select_folder(folder).map(|_| Outcome::Done),
            Command::Save => self.save().map(Outcome::Saved),
            Command::Load(path) => self.load(path).map(|_| Outcome::Done),
        };

        if let Err(ref e) = result {
            warn!(error = %e, "command failed");
        }
        result
    }

    /// Flip one cell; takes effect on the next start
    pub fn toggle(&mut self, instrument: usize, step: usize) -> bool {
        self.grid.toggle(instrument, step)
    }

    /// Current grid for rendering
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn start(&mut self) -> Result<()> {
        self.transport.start(&self.grid)
    }

    pub fn stop(&mut self) {
        self.transport.stop();
    }

    pub fn tempo_up(&mut self) -> Result<()> {
        self.transport.tempo_up()
    }

    pub fn tempo_down(&mut self) -> Result<()> {
        self.transport.tempo_down()
    }

    /// Report a playback that died since the last command
    pub fn check_playback(&mut self) -> Result<()> {
        self.transport.check_playback()
    }

    pub fn select_folder(&mut self, folder: impl AsRef<Path>) -> Result<()> {
        self.persistence.select_folder(folder)
    }

    /// Save into the chosen folder under a timestamped name
    pub fn save(&self) -> Result<PathBuf> {
        self.persistence.save(&self.grid)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.persistence.save_to(path, &self.grid)
    }

    /// Load a pattern and restart playback with it.
    ///
    /// A failed read or a malformed file leaves the current grid and the
    /// transport untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let loaded = self.persistence.load(path)?;
        self.grid.restore(loaded.cells())?;
        self.transport.stop();
        self.transport.start(&self.grid)
    }

    pub fn play_state(&self) -> PlayState {
        self.transport.play_state()
    }

    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport<C> {
        &mut self.transport
    }

    pub fn persistence(&self) -> &PersistenceService {
        &self.persistence
    }
}
