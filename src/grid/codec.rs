// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Binary pattern record.
//!
//! Layout (37 bytes):
//! - `0..4`  magic `BBOX`
//! - `4`     format version
//! - `5..37` the 256 cells bit-packed in flat index order, LSB first

use super::{GridState, CELLS};
use crate::error::{Error, Result};

/// Record magic
pub const MAGIC: [u8; 4] = *b"BBOX";

/// Current format version
pub const VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;
const PAYLOAD_LEN: usize = CELLS / 8;

/// Size of an encoded pattern in bytes
pub const RECORD_LEN: usize = HEADER_LEN + PAYLOAD_LEN;

/// Encode a grid into its fixed-size record
pub fn encode(grid: &GridState) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];
    record[..MAGIC.len()].copy_from_slice(&MAGIC);
    record[MAGIC.len()] = VERSION;

    for (i, &active) in grid.cells().iter().enumerate() {
        if active {
            record[HEADER_LEN + i / 8] |= 1 << (i % 8);
        }
    }

    record
}

/// Decode a record back into a grid
pub fn decode(bytes: &[u8]) -> Result<GridState> {
    if bytes.len() != RECORD_LEN {
        return Err(Error::format(format!(
            "expected {} bytes, got {}",
            RECORD_LEN,
            bytes.len()
        )));
    }

    if bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::format("not a pattern file (bad magic)"));
    }

    let version = bytes[MAGIC.len()];
    if version != VERSION {
        return Err(Error::format(format!(
            "unsupported pattern version {}",
            version
        )));
    }

    let payload = &bytes[HEADER_LEN..];
    let cells: Vec<bool> = (0..CELLS)
        .map(|i| payload[i / 8] & (1 << (i % 8)) != 0)
        .collect();

    GridState::from_cells(&cells)
}
