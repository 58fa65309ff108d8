// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument table mapping grid rows to percussion notes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::INSTRUMENTS;

/// A named percussion voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name
    pub name: String,
    /// MIDI note number (0-127)
    pub note: u8,
}

impl Instrument {
    pub fn new(name: impl Into<String>, note: u8) -> Self {
        Self {
            name: name.into(),
            note,
        }
    }
}

/// General MIDI percussion kit, one entry per grid row
pub const GM_KIT: [(&str, u8); INSTRUMENTS] = [
    ("Bass Drum", 35),
    ("Closed Hi-Hat", 42),
    ("Open Hi-Hat", 46),
    ("Acoustic Snare", 38),
    ("Crash Cymbal", 49),
    ("Hand Clap", 39),
    ("High Tom", 50),
    ("Hi Bongo", 60),
    ("Maracas", 70),
    ("Whistle", 72),
    ("Low Conga", 64),
    ("Cowbell", 56),
    ("Vibraslap", 58),
    ("Low-mid Tom", 47),
    ("High Agogo", 67),
    ("Open Hi Conga", 63),
];

/// Ordered, immutable table of exactly 16 instruments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTable {
    instruments: Vec<Instrument>,
}

impl InstrumentTable {
    /// Build a table, checking the row count and note range
    pub fn new(instruments: Vec<Instrument>) -> Result<Self> {
        if instruments.len() != INSTRUMENTS {
            return Err(Error::format(format!(
                "instrument table needs {} entries, got {}",
                INSTRUMENTS,
                instruments.len()
            )));
        }

        if let Some(bad) = instruments.iter().find(|i| i.note > 127) {
            return Err(Error::format(format!(
                "instrument '{}' has note {} outside 0-127",
                bad.name, bad.note
            )));
        }

        Ok(Self { instruments })
    }

    /// The default General MIDI kit
    pub fn general_midi() -> Self {
        Self {
            instruments: GM_KIT
                .iter()
                .map(|&(name, note)| Instrument::new(name, note))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    /// Note number for a row
    pub fn note(&self, index: usize) -> Option<u8> {
        self.get(index).map(|i| i.note)
    }

    /// Row labels for rendering
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|i| i.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn as_slice(&self) -> &[Instrument] {
        &self.instruments
    }
}

impl Default for InstrumentTable {
    fn default() -> Self {
        Self::general_midi()
    }
}

impl<'a> IntoIterator for &'a InstrumentTable {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_midi_table() {
        let table = InstrumentTable::general_midi();
        assert_eq!(table.len(), 16);
        assert_eq!(table.note(0), Some(35));
        assert_eq!(table.note(3), Some(38));
        assert_eq!(table.note(15), Some(63));
        assert_eq!(table.names().next(), Some("Bass Drum"));
        assert_eq!(table.note(16), None);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = vec![Instrument::new("Kick", 36); 15];
        assert!(matches!(InstrumentTable::new(short), Err(Error::Format(_))));
    }

    #[test]
    fn test_rejects_note_out_of_range() {
        let mut instruments = InstrumentTable::general_midi().as_slice().to_vec();
        instruments[7].note = 200;
        let err = InstrumentTable::new(instruments).unwrap_err();
        assert!(err.to_string().contains("Hi Bongo"));
    }

    #[test]
    fn test_custom_table() {
        let instruments: Vec<Instrument> = (0..16)
            .map(|i| Instrument::new(format!("Pad {}", i), 36 + i as u8))
            .collect();
        let table = InstrumentTable::new(instruments).unwrap();
        assert_eq!(table.note(15), Some(51));
    }
}
