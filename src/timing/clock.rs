// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Threaded playback clock.
//!
//! `SequencerClock` plays a shared timeline through a `MidiOutput` on its
//! own thread. The tempo lives in an atomic so it can change mid-loop
//! without moving the play position; the next tick is always due one tick
//! length (at the current tempo) after the previous one, so a tempo change
//! wakes the thread and reschedules the pending tick. Every start bumps a generation
//! counter; the playback thread re-checks it under the output lock before
//! each send, so once `stop` returns nothing from the previous timeline can
//! reach the device.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{Clock, LoopMode, DEFAULT_BPM};
use crate::error::{Error, Result};
use crate::midi::{messages, MidiOutput};
use crate::sequencer::{NoteEvent, Timeline};

/// Wait used when the tick length does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400);

/// Opens the MIDI output on demand; called again after a failed open
pub type Connector = Box<dyn FnMut() -> Result<Box<dyn MidiOutput>> + Send>;

/// State guarded by the clock mutex
struct Playback {
    /// Connected output (None until opened)
    output: Option<Box<dyn MidiOutput>>,
    /// Incremented on every start and stop
    generation: u64,
    /// Whether a playback thread is currently live
    running: bool,
    /// Channels of the playing timeline, silenced on stop
    channels: Vec<u8>,
    /// Device failure that ended the last playback thread
    failure: Option<Error>,
}

impl Playback {
    fn send_events(&mut self, events: &[NoteEvent]) -> Result<()> {
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| Error::device("output closed during playback"))?;
        for event in events {
            output.send(&event.to_midi_bytes())?;
        }
        Ok(())
    }

    fn silence(&mut self) {
        let channels = std::mem::take(&mut self.channels);
        if let Some(output) = self.output.as_mut() {
            for channel in channels {
                let message = [messages::CONTROL_CHANGE | channel, messages::ALL_NOTES_OFF, 0];
                if let Err(e) = output.send(&message) {
                    warn!(channel, error = %e, "failed to send all notes off");
                }
            }
        }
    }
}

struct Shared {
    playback: Mutex<Playback>,
    wake: Condvar,
    tempo_bits: AtomicU64,
    position: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.playback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tempo(&self) -> f64 {
        f64::from_bits(self.tempo_bits.load(Ordering::Acquire))
    }
}

/// Timeline player driving a MIDI output from a background thread
pub struct SequencerClock {
    connector: Connector,
    shared: Arc<Shared>,
    timeline: Option<Arc<Timeline>>,
    loop_mode: LoopMode,
    worker: Option<JoinHandle<()>>,
}

impl SequencerClock {
    /// Create a clock that opens its output through `connector`
    pub fn new<F>(connector: F) -> Self
    where
        F: FnMut() -> Result<Box<dyn MidiOutput>> + Send + 'static,
    {
        Self {
            connector: Box::new(connector),
            shared: Arc::new(Shared {
                playback: Mutex::new(Playback {
                    output: None,
                    generation: 0,
                    running: false,
                    channels: Vec::new(),
                    failure: None,
                }),
                wake: Condvar::new(),
                tempo_bits: AtomicU64::new(DEFAULT_BPM.to_bits()),
                position: AtomicU64::new(0),
            }),
            timeline: None,
            loop_mode: LoopMode::Once,
            worker: None,
        }
    }

    /// Create a clock around an output that is already connected
    pub fn with_output<O: MidiOutput + 'static>(output: O) -> Self {
        let mut slot: Option<Box<dyn MidiOutput>> = Some(Box::new(output));
        Self::new(move || {
            slot.take()
                .ok_or_else(|| Error::device("output already handed to the clock"))
        })
    }

    /// Loop mode applied on the next start
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Invalidate the current playback thread and wait for it to exit
    fn halt(&mut self) -> bool {
        let was_running = {
            let mut playback = self.shared.lock();
            let was_running = playback.running;
            playback.generation += 1;
            playback.running = false;
            if was_running {
                playback.silence();
            }
            was_running
        };
        self.shared.wake.notify_all();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("playback thread panicked");
            }
        }
        was_running
    }
}

impl Clock for SequencerClock {
    fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let output = (self.connector)()?;
        self.shared.lock().output = Some(output);
        info!("clock output opened");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.shared.lock().output.is_some()
    }

    fn load_timeline(&mut self, timeline: Arc<Timeline>) -> Result<()> {
        debug!(events = timeline.len(), "timeline loaded");
        self.timeline = Some(timeline);
        Ok(())
    }

    fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    fn set_tempo(&mut self, bpm: f64) {
        // Stored under the lock so a waiting thread cannot miss the wakeup
        let playback = self.shared.lock();
        self.shared.tempo_bits.store(bpm.to_bits(), Ordering::Release);
        drop(playback);
        self.shared.wake.notify_all();
    }

    fn tempo(&self) -> f64 {
        self.shared.tempo()
    }

    fn start(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(Error::device("clock is not open"));
        }
        let timeline = self
            .timeline
            .clone()
            .ok_or_else(|| Error::device("no timeline loaded"))?;

        self.halt();

        let generation = {
            let mut playback = self.shared.lock();
            playback.running = true;
            playback.channels = timeline.channels();
            playback.failure = None;
            playback.generation
        };
        self.shared.position.store(0, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let mode = self.loop_mode;
        let worker = thread::Builder::new()
            .name("beatbox-clock".into())
            .spawn(move || run(shared, timeline, generation, mode))
            .map_err(|e| {
                self.shared.lock().running = false;
                Error::device(format!("failed to spawn playback thread: {}", e))
            })?;
        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) {
        if self.halt() {
            debug!("clock stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    fn take_failure(&mut self) -> Option<Error> {
        self.shared.lock().failure.take()
    }

    fn position(&self) -> u64 {
        self.shared.position.load(Ordering::Acquire)
    }
}

impl Drop for SequencerClock {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Playback thread body
fn run(shared: Arc<Shared>, timeline: Arc<Timeline>, generation: u64, mode: LoopMode) {
    let loop_ticks = timeline.loop_ticks();
    let mut tick = 0u64;
    let mut previous: Option<Instant> = None;

    loop {
        let mut playback = shared.lock();

        // Sleep until the tick is due, bailing out if superseded. The due
        // time is recomputed after every wake so tempo changes apply at once.
        let fired = loop {
            if playback.generation != generation || !playback.running {
                return;
            }
            let now = Instant::now();
            let Some(last) = previous else {
                break now;
            };
            let interval = timeline.tick_duration(shared.tempo());
            let due = last.checked_add(interval).unwrap_or(now + FAR_FUTURE);
            if now >= due {
                // A tick more than one interval late restarts the grid from
                // now instead of bursting to catch up
                let late = now - due;
                break if late > interval { now } else { due };
            }
            playback = shared
                .wake
                .wait_timeout(playback, due - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        };
        previous = Some(fired);

        let mut result = playback.send_events(timeline.events_at(tick));
        shared.position.store(tick, Ordering::Release);

        if result.is_ok() && tick == loop_ticks {
            match mode {
                LoopMode::Once => {
                    playback.running = false;
                    playback.channels.clear();
                    return;
                }
                LoopMode::Continuous => {
                    tick = 0;
                    shared.position.store(0, Ordering::Release);
                    result = playback.send_events(timeline.events_at(0));
                }
            }
        }

        if let Err(e) = result {
            warn!(error = %e, "playback halted by device failure");
            playback.running = false;
            playback.channels.clear();
            playback.failure = Some(e);
            return;
        }
        drop(playback);

        tick += 1;
    }
}
