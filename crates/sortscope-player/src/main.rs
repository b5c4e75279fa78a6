//! Sortscope Player - headless sorting demonstration with procedural audio
//!
//! This is the main entry point. It:
//! 1. Loads the YAML config and opens the audio output
//! 2. Runs the demonstration on a background worker thread
//! 3. Prints the status line until the worker reports it is done
//!
//! ## Command line flags
//!
//! - `--config <path>`: Read the config from `<path>` instead of the default location
//! - `--no-audio`: Run silently without opening an output device
//! - `--list-devices`: Print the available output devices and exit
//! - `--save-default-config`: Write a default config file and exit

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossbeam::channel::RecvTimeoutError;

use sortscope_core::audio::{self, AudioError};
use sortscope_core::config::ConfigSource;
use sortscope_core::show::{ShowEvent, SortShow};
use sortscope_core::sound::SoundRegistry;

/// How often the status line is refreshed
const STATUS_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    no_audio: bool,
    list_devices: bool,
    save_default_config: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config_path = Some(PathBuf::from(path));
            }
            "--no-audio" => args.no_audio = true,
            "--list-devices" => args.list_devices = true,
            "--save-default-config" => args.save_default_config = true,
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(args)
}

fn list_devices() -> Result<()> {
    match audio::get_output_devices() {
        Ok(devices) => {
            println!("Available output devices:");
            for device in devices {
                println!(
                    "  {} - {} channel(s), rates {:?}",
                    device, device.max_channels, device.sample_rates
                );
            }
            Ok(())
        }
        Err(AudioError::NoDevices) => {
            println!("No audio output devices found");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;

    if args.list_devices {
        return list_devices();
    }

    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(config::default_config_path);

    if args.save_default_config {
        config::save_config(&config::PlayerConfig::default(), &config_path)?;
        println!("Default config written to {}", config_path.display());
        return Ok(());
    }

    let loaded = config::load_config(&config_path);
    match &loaded.source {
        ConfigSource::File => log::info!("Config loaded from {:?}", config_path),
        ConfigSource::Missing => log::info!(
            "No config at {:?}, using defaults (write one with --save-default-config)",
            config_path
        ),
        ConfigSource::Fallback(e) => log::warn!("{}; using defaults", e),
    }
    let config = loaded.config;
    let shuffle = config.shuffle_algorithm();
    let sort = config.sort_algorithm();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Sortscope Player                        ║");
    println!("║            sorting algorithms you can listen to              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let registry = Arc::new(SoundRegistry::with_sample_rate(config.audio.sample_rate));

    // Keep the handle alive for the whole run; dropping it stops playback
    let _audio = if args.no_audio {
        log::info!("Audio disabled via --no-audio");
        None
    } else {
        match audio::start_audio_output(&config.audio, Arc::clone(&registry)) {
            Ok(handle) => {
                println!(
                    "Audio output: {} ({} Hz)",
                    handle.device_name(),
                    handle.sample_rate()
                );
                Some(handle)
            }
            Err(e) => {
                eprintln!("Warning: Could not start audio output: {}", e);
                eprintln!("Running in silent mode");
                None
            }
        }
    };

    let (show, events) = SortShow::new(config.show.clone(), registry);
    let show = Arc::new(show);

    let worker = {
        let show = Arc::clone(&show);
        thread::Builder::new()
            .name("sort-worker".to_string())
            .spawn(move || show.run(&shuffle, &sort))
            .context("Failed to spawn sort worker")?
    };

    loop {
        match events.recv_timeout(STATUS_INTERVAL) {
            Ok(ShowEvent::PhaseStarted { phase, algorithm }) => {
                println!();
                println!("== {}: {} ==", phase, algorithm);
            }
            Ok(ShowEvent::PhaseFinished {
                phase,
                reads,
                writes,
                elapsed,
            }) => {
                println!(
                    "{} done in {:.2?}: {} reads, {} writes",
                    phase, elapsed, reads, writes
                );
            }
            Ok(ShowEvent::Finished) | Ok(ShowEvent::Failed(_)) => break,
            Err(RecvTimeoutError::Timeout) => println!("{}", show.status()),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let result = match worker.join() {
        Ok(result) => result,
        Err(_) => bail!("Sort worker panicked"),
    };
    let array = result?;

    let snapshot = show.snapshot();
    println!();
    println!(
        "Finished: {} elements in {} run{}",
        array.len(),
        snapshot.runs,
        if snapshot.runs == 1 { "" } else { "s" }
    );

    // Let the last sounds ring out
    thread::sleep(Duration::from_secs_f32(config.show.sound_sustain_s.min(10.0).max(0.0)));

    Ok(())
}
