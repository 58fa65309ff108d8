// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output abstraction layer.
//!
//! This module provides a trait-based abstraction for MIDI output so the
//! playback clock can drive a real device (midir, behind the `midir`
//! feature), a logging sink, or a test double interchangeably.

#[cfg(feature = "midir")]
pub mod midir_backend;

#[cfg(feature = "midir")]
pub use midir_backend::{list_ports, MidirOutput};

use tracing::trace;

use crate::error::Result;

/// Trait for MIDI output implementations.
pub trait MidiOutput: Send {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x99, 35, 100]` for a drum Note On)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(Error::Device)` if the message could not be sent
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

impl<T: MidiOutput + ?Sized> MidiOutput for Box<T> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        (**self).send(message)
    }
}

/// Output that only traces messages. Used when no device is configured.
#[derive(Debug, Default)]
pub struct LogOutput;

impl LogOutput {
    pub fn new() -> Self {
        Self
    }
}

impl MidiOutput for LogOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        trace!(bytes = ?message, "midi out");
        Ok(())
    }
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;

    // Channel Mode controllers
    pub const ALL_NOTES_OFF: u8 = 123;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock MIDI output for testing
    struct MockMidiOutput {
        messages: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl MidiOutput for MockMidiOutput {
        fn send(&mut self, message: &[u8]) -> Result<()> {
            self.messages.lock().unwrap().push(message.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_boxed_output_forwards() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut output: Box<dyn MidiOutput> = Box::new(MockMidiOutput {
            messages: Arc::clone(&log),
        });

        output.send(&[messages::NOTE_ON | 9, 35, 100]).unwrap();

        let sent = log.lock().unwrap().clone();
        assert_eq!(sent, vec![vec![0x99, 35, 100]]);
    }

    #[test]
    fn test_log_output_accepts_everything() {
        let mut output: Box<dyn MidiOutput> = Box::new(LogOutput::new());
        assert!(output.send(&[messages::NOTE_OFF | 9, 35, 100]).is_ok());
        assert!(output.send(&[messages::CONTROL_CHANGE | 1, 127, 0]).is_ok());
        assert!(output.send(&[]).is_ok());
    }

    #[test]
    fn test_midi_message_constants() {
        assert_eq!(messages::NOTE_ON, 0x90);
        assert_eq!(messages::NOTE_OFF, 0x80);
        assert_eq!(messages::CONTROL_CHANGE, 0xB0);
        assert_eq!(messages::PROGRAM_CHANGE, 0xC0);
    }
}
