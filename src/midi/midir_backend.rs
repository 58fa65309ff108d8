// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform MIDI output backed by midir.

use midir::{MidiOutput as MidirClient, MidiOutputConnection};

use super::MidiOutput;
use crate::error::{Error, Result};

const CLIENT_NAME: &str = "BeatBox";

/// midir output connected to one port
pub struct MidirOutput {
    connection: MidiOutputConnection,
}

impl MidirOutput {
    /// Connect to the port at `port_index` in the system's port list.
    pub fn new(port_index: usize) -> Result<Self> {
        let client = MidirClient::new(CLIENT_NAME)
            .map_err(|e| Error::device(format!("Failed to create MIDI client: {}", e)))?;

        let ports = client.ports();
        let port = ports.get(port_index).ok_or_else(|| {
            Error::device(format!(
                "MIDI port {} not found (only {} available)",
                port_index,
                ports.len()
            ))
        })?;

        let connection = client
            .connect(port, "beatbox-out")
            .map_err(|e| Error::device(format!("Failed to connect: {}", e)))?;

        Ok(Self { connection })
    }

    /// Connect to the first port whose name contains `name` (case-insensitive)
    pub fn new_by_name(name: &str) -> Result<Self> {
        let index = list_ports()
            .into_iter()
            .find(|(_, n)| n.to_lowercase().contains(&name.to_lowercase()))
            .map(|(i, _)| i)
            .ok_or_else(|| Error::device(format!("No MIDI port matching '{}' found", name)))?;

        Self::new(index)
    }
}

impl MidiOutput for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| Error::device(format!("Failed to send MIDI message: {}", e)))
    }
}

/// List available output ports as (index, name) pairs
pub fn list_ports() -> Vec<(usize, String)> {
    let Ok(client) = MidirClient::new(CLIENT_NAME) else {
        return Vec::new();
    };

    client
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = client
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_ports() {
        // Port lists vary by machine; listing must simply not panic
        let ports = list_ports();
        println!("Found {} ports", ports.len());
    }

    #[test]
    fn test_missing_port_is_device_error() {
        let result = MidirOutput::new(usize::MAX);
        assert!(matches!(result, Err(Error::Device(_))));
    }
}
