// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pattern grid for the drum machine.
//!
//! The grid is a fixed 16 instrument by 16 step matrix of on/off cells.
//! Its canonical form is a flat sequence of 256 booleans where the cell
//! for `(instrument, step)` lives at `instrument * STEPS + step`.

pub mod codec;

pub use codec::{decode, encode, RECORD_LEN};

use crate::error::{Error, Result};

/// Number of instrument rows
pub const INSTRUMENTS: usize = 16;

/// Number of steps per row
pub const STEPS: usize = 16;

/// Total number of cells in the grid
pub const CELLS: usize = INSTRUMENTS * STEPS;

/// The 16x16 step grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    cells: [bool; CELLS],
}

impl GridState {
    /// Create an empty grid (every cell off)
    pub fn new() -> Self {
        Self {
            cells: [false; CELLS],
        }
    }

    fn index(instrument: usize, step: usize) -> Option<usize> {
        if instrument < INSTRUMENTS && step < STEPS {
            Some(instrument * STEPS + step)
        } else {
            None
        }
    }

    /// Read a single cell. Out-of-range coordinates read as off.
    pub fn get(&self, instrument: usize, step: usize) -> bool {
        Self::index(instrument, step)
            .map(|i| self.cells[i])
            .unwrap_or(false)
    }

    /// Write a single cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, instrument: usize, step: usize, value: bool) {
        if let Some(i) = Self::index(instrument, step) {
            self.cells[i] = value;
        }
    }

    /// Flip a single cell and return its new value
    pub fn toggle(&mut self, instrument: usize, step: usize) -> bool {
        match Self::index(instrument, step) {
            Some(i) => {
                self.cells[i] = !self.cells[i];
                self.cells[i]
            }
            None => false,
        }
    }

    /// Turn every cell off
    pub fn clear(&mut self) {
        self.cells = [false; CELLS];
    }

    /// Canonical flat copy of the grid
    pub fn snapshot(&self) -> Vec<bool> {
        self.cells.to_vec()
    }

    /// Borrow the canonical cells without copying
    pub fn cells(&self) -> &[bool; CELLS] {
        &self.cells
    }

    /// Replace the whole grid from a canonical sequence.
    ///
    /// The sequence must hold exactly `CELLS` entries. On error the
    /// current grid is left as it was.
    pub fn restore(&mut self, cells: &[bool]) -> Result<()> {
        let cells: [bool; CELLS] = cells.try_into().map_err(|_| {
            Error::format(format!("expected {} cells, got {}", CELLS, cells.len()))
        })?;
        self.cells = cells;
        Ok(())
    }

    /// Build a grid from a canonical sequence
    pub fn from_cells(cells: &[bool]) -> Result<Self> {
        let mut grid = Self::new();
        grid.restore(cells)?;
        Ok(grid)
    }

    /// The active steps of one instrument row, in step order
    pub fn active_steps(&self, instrument: usize) -> impl Iterator<Item = usize> + '_ {
        (0..STEPS).filter(move |&step| self.get(instrument, step))
    }

    /// Number of active cells
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = GridState::new();
        assert_eq!(grid.snapshot().len(), CELLS);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut grid = GridState::new();
        assert!(grid.toggle(3, 5));
        assert!(grid.get(3, 5));
        assert!(grid.snapshot()[3 * STEPS + 5]);

        assert!(!grid.toggle(3, 5));
        assert!(!grid.get(3, 5));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut grid = GridState::new();
        assert!(!grid.toggle(16, 0));
        assert!(!grid.toggle(0, 16));
        grid.set(20, 20, true);
        assert!(grid.is_empty());
        assert!(!grid.get(99, 0));
    }

    #[test]
    fn test_restore_round_trip() {
        let mut grid = GridState::new();
        grid.toggle(0, 0);
        grid.toggle(15, 15);
        grid.toggle(7, 3);

        let mut other = GridState::new();
        other.restore(&grid.snapshot()).unwrap();
        assert_eq!(other, grid);
    }

    #[test]
    fn test_restore_wrong_length_keeps_state() {
        let mut grid = GridState::new();
        grid.toggle(2, 9);
        let before = grid.clone();

        let short = vec![true; 255];
        assert!(matches!(grid.restore(&short), Err(Error::Format(_))));
        assert_eq!(grid, before);

        let long = vec![true; 257];
        assert!(matches!(grid.restore(&long), Err(Error::Format(_))));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_active_steps() {
        let mut grid = GridState::new();
        grid.set(4, 1, true);
        grid.set(4, 9, true);
        grid.set(5, 2, true);

        let steps: Vec<usize> = grid.active_steps(4).collect();
        assert_eq!(steps, vec![1, 9]);
        assert_eq!(grid.active_count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut grid = GridState::from_cells(&[true; CELLS]).unwrap();
        assert_eq!(grid.active_count(), CELLS);
        grid.clear();
        assert!(grid.is_empty());
    }
}
