// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pattern save and load.
//!
//! Patterns are stored one per file using the grid codec. Saving into the
//! chosen folder names the file after the minute and second of the save so
//! quick successive saves don't overwrite each other.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{self, GridState};

/// Default file name prefix
pub const DEFAULT_PREFIX: &str = "BeatBox";

/// Default file extension
pub const DEFAULT_EXTENSION: &str = "bbx";

/// Saves and loads patterns independent of any dialog mechanism
#[derive(Debug, Clone)]
pub struct PersistenceService {
    folder: Option<PathBuf>,
    prefix: String,
    extension: String,
}

impl PersistenceService {
    pub fn new() -> Self {
        Self {
            folder: None,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a custom file name prefix and extension
    pub fn with_naming(mut self, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.extension = extension.into();
        self
    }

    /// Choose the destination folder for `save`.
    ///
    /// The folder must already exist; otherwise the previous choice is kept.
    pub fn select_folder(&mut self, folder: impl AsRef<Path>) -> Result<()> {
        let folder = folder.as_ref();
        let meta = fs::metadata(folder).map_err(|e| Error::io(folder, e))?;
        if !meta.is_dir() {
            return Err(Error::io(
                folder,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }
        self.folder = Some(folder.to_path_buf());
        Ok(())
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// File name for a save made at `time`, e.g. `BeatBox_07_42.bbx`.
    ///
    /// Minute and second are taken from UTC so the name does not depend on
    /// the host's time zone. In zones offset by a fraction of an hour the
    /// minute differs from the local wall clock.
    pub fn file_name_at(&self, time: SystemTime) -> String {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let minute = (secs / 60) % 60;
        let second = secs % 60;
        format!(
            "{}_{:02}_{:02}.{}",
            self.prefix, minute, second, self.extension
        )
    }

    /// Save into the chosen folder under a timestamped name
    pub fn save(&self, grid: &GridState) -> Result<PathBuf> {
        let folder = self.folder.as_ref().ok_or(Error::NoFolder)?;
        let path = folder.join(self.file_name_at(SystemTime::now()));
        self.save_to(&path, grid)?;
        Ok(path)
    }

    /// Save to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>, grid: &GridState) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, grid::encode(grid)).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), cells = grid.active_count(), "pattern saved");
        Ok(())
    }

    /// Load a pattern file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<GridState> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let grid = grid::decode(&bytes)?;
        debug!(path = %path.display(), cells = grid.active_count(), "pattern loaded");
        Ok(grid)
    }
}

impl Default for PersistenceService {
    fn default() -> Self {
        Self::new()
    }
}
