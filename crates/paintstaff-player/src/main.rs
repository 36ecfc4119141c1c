//! paintstaff-player: headless music staff playback

mod config;
mod console;
mod driver;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use console::{ConsoleButton, ConsoleMarker};
use paintstaff_core::{NoteGrid, PlaybackController};
use paintstaff_services::{voice_bank::DEFAULT_QUEUE, VoiceBank};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 120 BPM until the configured tempo is applied
const DEFAULT_SECONDS_PER_STEP: f64 = 0.25;

/// Roughly one display frame
const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("paintstaff=debug".parse()?))
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load_config(path.as_deref())?;
    tracing::info!(bpm = config.bpm, notes = config.notes.len(), "Starting paintstaff player");

    let (bank, rx) = VoiceBank::with_queue(DEFAULT_QUEUE);
    let consumer = thread::spawn(move || {
        for cmd in rx {
            tracing::info!(?cmd, "Sound");
        }
    });

    let grid: NoteGrid = config.notes.iter().copied().collect();
    let mut controller = PlaybackController::new(bank, grid, DEFAULT_SECONDS_PER_STEP)?;
    controller.set_bpm(config.bpm)?;
    controller.set_visual_mode(config.visual_mode);
    controller.set_loop_enabled(config.loop_enabled);
    controller.attach_display(
        ConsoleMarker::default(),
        ConsoleButton::new("play"),
        ConsoleButton::new("stop"),
        config.sprites.clone(),
    );

    let steps = config.step_positions()?;
    let loops = driver::run(
        &mut controller,
        &steps,
        config.start_margin,
        config.max_loops,
        || thread::sleep(FRAME),
    )?;
    tracing::info!(loops, "Playback finished");

    // Dropping the controller closes the sound queue
    drop(controller);
    consumer
        .join()
        .map_err(|_| anyhow!("sound consumer thread panicked"))?;
    Ok(())
}
