// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types shared by the grid, transport and persistence layers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced to the editor collaborator
#[derive(Debug, Error)]
pub enum Error {
    /// Persisted or restored pattern data is malformed
    #[error("malformed pattern data: {0}")]
    Format(String),

    /// Filesystem failure while saving or loading
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The clock or MIDI output could not be opened or driven
    #[error("MIDI device error: {0}")]
    Device(String),

    /// Save was requested before a destination folder was chosen
    #[error("choose a folder to save into first")]
    NoFolder,
}

impl Error {
    /// Wrap an I/O error together with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Error::Device(msg.into())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::format("expected 256 cells, got 12");
        assert_eq!(
            err.to_string(),
            "malformed pattern data: expected 256 cells, got 12"
        );

        let err = Error::device("no ports");
        assert_eq!(err.to_string(), "MIDI device error: no ports");

        assert_eq!(Error::NoFolder.to_string(), "choose a folder to save into first");
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::io(
            "/nowhere/pattern.bbx",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("pattern.bbx"));
        assert!(err.source().is_some());
    }
}
