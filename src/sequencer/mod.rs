// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence compilation.
//!
//! This module turns the pattern grid into a playable timeline:
//! - Timeline and event types with tick-to-time conversion
//! - A pure compiler from grid and instrument table to timeline

pub mod compiler;
pub mod timeline;

pub use compiler::{compile, DRUM_CHANNEL, VELOCITY};
pub use timeline::{EventKind, NoteEvent, Timeline, LOOP_TICKS, TICKS_PER_QUARTER};
