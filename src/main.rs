// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, Context, Result};
use beatbox::config::{AppConfig, MidiDeviceConfig};
use beatbox::grid::{INSTRUMENTS, STEPS};
use beatbox::midi::{LogOutput, MidiOutput};
use beatbox::{compile, InstrumentTable, PersistenceService, SequencerClock, Session};
use std::env;
use std::thread;
use std::time::{Duration, Instant};
#[cfg(not(feature = "midir"))]
use tracing::warn;
use tracing::info;

/// How often `--play` checks that the clock is still running
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn print_usage() {
    println!("BeatBox - 16x16 Step Sequencer Drum Machine");
    println!();
    println!("Usage: beatbox [--config <PATH>] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --list-midi              List available MIDI output ports");
    println!("  --show <FILE>            Print a saved pattern and its compiled timeline");
    println!("  --play <FILE> [SECONDS]  Loop a saved pattern (default 8 seconds)");
    println!("  --help                   Show this help message");
}

#[cfg(feature = "midir")]
fn print_ports() {
    let ports = beatbox::midi::list_ports();
    if ports.is_empty() {
        println!("No MIDI output ports found.");
    } else {
        println!("Available MIDI output ports:");
        for (i, name) in ports {
            println!("  {}: {}", i, name);
        }
    }
}

#[cfg(not(feature = "midir"))]
fn print_ports() {
    println!("Built without the `midir` feature; only the log output is available.");
}

/// Build the output opener for the configured device
fn connector(
    midi: MidiDeviceConfig,
) -> impl FnMut() -> beatbox::Result<Box<dyn MidiOutput>> + Send + 'static {
    move || {
        #[cfg(feature = "midir")]
        {
            use beatbox::midi::MidirOutput;
            if let Some(name) = &midi.device {
                return Ok(Box::new(MidirOutput::new_by_name(name)?) as Box<dyn MidiOutput>);
            }
            if let Some(port) = midi.port {
                return Ok(Box::new(MidirOutput::new(port)?) as Box<dyn MidiOutput>);
            }
        }

        #[cfg(not(feature = "midir"))]
        {
            if midi.device.is_some() || midi.port.is_some() {
                warn!("MIDI device configured but built without `midir`; logging events instead");
            }
        }

        Ok(Box::new(LogOutput::new()) as Box<dyn MidiOutput>)
    }
}

fn show_pattern(path: &str, instruments: &InstrumentTable) -> Result<()> {
    let grid = PersistenceService::new()
        .load(path)
        .with_context(|| format!("Failed to load pattern {}", path))?;

    let width = instruments.names().map(str::len).max().unwrap_or(0);
    for (row, name) in instruments.names().enumerate().take(INSTRUMENTS) {
        let cells: String = (0..STEPS)
            .map(|step| if grid.get(row, step) { 'x' } else { '.' })
            .collect();
        println!("{:>width$}  {}", name, cells, width = width);
    }

    println!();
    let timeline = compile(&grid, instruments);
    println!("{} events:", timeline.len());
    for event in timeline.events() {
        println!(
            "  tick {:>2}  {:?} ch {} {} {}",
            event.tick, event.kind, event.channel, event.data1, event.data2
        );
    }
    Ok(())
}

fn play_pattern(path: &str, seconds: u64, config: &AppConfig) -> Result<()> {
    let clock = SequencerClock::new(connector(config.midi.clone()));
    let mut session = Session::with_persistence(
        clock,
        config.instrument_table()?,
        config.persistence()?,
    );

    session
        .load(path)
        .with_context(|| format!("Failed to play pattern {}", path))?;
    info!(
        path,
        bpm = session.transport().effective_bpm(),
        cells = session.grid().active_count(),
        "playing"
    );

    let deadline = Instant::now() + Duration::from_secs(seconds);
    while Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
        if let Err(e) = session.check_playback() {
            return Err(e).context("Playback stopped early");
        }
    }
    session.stop();
    Ok(())
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            return Err(anyhow!("--config requires a path"));
        }
        let path = args.remove(1);
        args.remove(0);
        AppConfig::load(&path)?
    } else {
        AppConfig::default()
    };

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .init();

    let Some(command) = args.first() else {
        println!("BeatBox - 16x16 Step Sequencer Drum Machine");
        println!("Run with --help for usage information");
        return Ok(());
    };

    match command.as_str() {
        "--list-midi" => print_ports(),
        "--show" => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow!("--show requires a pattern file"))?;
            show_pattern(path, &config.instrument_table()?)?;
        }
        "--play" => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow!("--play requires a pattern file"))?;
            let seconds = match args.get(2) {
                Some(s) => s
                    .parse()
                    .map_err(|_| anyhow!("Invalid number of seconds: {}", s))?,
                None => 8,
            };
            play_pattern(path, seconds, &config)?;
        }
        "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
