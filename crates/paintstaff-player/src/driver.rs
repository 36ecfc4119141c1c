//! Frame loop that drives the controller until playback ends

use paintstaff_core::{NoteProvider, PlaybackController, Result, SoundService, TickOutcome};
use tracing::info;

/// Start playback and tick once per frame until it stops.
///
/// `frame` runs between ticks (sleeps in the binary). A looping run is
/// stopped after `max_loops` wraps unless `max_loops` is 0. Returns the
/// number of wraps.
pub fn run<S, N>(
    controller: &mut PlaybackController<S, N>,
    step_positions: &[i32],
    start_margin: i32,
    max_loops: u32,
    mut frame: impl FnMut(),
) -> Result<u32>
where
    S: SoundService,
    N: NoteProvider,
{
    controller.start(start_margin)?;

    let mut loops = 0;
    while controller.is_playing() {
        if let TickOutcome::Advanced { wrapped: true, .. } = controller.tick(step_positions)? {
            loops += 1;
            info!(loops, "Looped to first step");
            if max_loops > 0 && loops >= max_loops {
                controller.stop()?;
                break;
            }
        }
        frame();
    }
    Ok(loops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paintstaff_core::{ManualClock, NoteEvent, NoteGrid};
    use paintstaff_services::{SoundCommand, VoiceBank};
    use std::time::Duration;

    #[test]
    fn test_run_plays_through_and_stops() {
        let clock = ManualClock::new();
        let (bank, rx) = VoiceBank::with_queue(64);
        let grid: NoteGrid = [NoteEvent::new(25, 40, 60, 0), NoteEvent::new(50, 40, 64, 0)]
            .into_iter()
            .collect();
        let mut controller =
            PlaybackController::with_clock(bank, grid, 0.25, clock.clone()).unwrap();

        let frame_clock = clock.clone();
        let loops = run(&mut controller, &[25, 50, 75], 25, 0, || {
            frame_clock.advance(Duration::from_millis(50))
        })
        .unwrap();

        assert_eq!(loops, 0);
        assert!(!controller.is_playing());
        let on: Vec<_> = rx
            .try_iter()
            .filter(|c| matches!(c, SoundCommand::NoteOn { .. }))
            .collect();
        assert_eq!(
            on,
            vec![
                SoundCommand::NoteOn { channel: 0, pitch: 60 },
                SoundCommand::NoteOn { channel: 0, pitch: 64 },
            ]
        );
        assert_eq!(controller.sound().active_voices(), 0);
    }

    #[test]
    fn test_run_bounds_looping() {
        let clock = ManualClock::new();
        let (bank, _rx) = VoiceBank::with_queue(64);
        let mut controller =
            PlaybackController::with_clock(bank, NoteGrid::new(), 0.25, clock.clone()).unwrap();
        controller.set_loop_enabled(true);

        let frame_clock = clock.clone();
        let loops = run(&mut controller, &[25, 50], 25, 3, || {
            frame_clock.advance_secs(0.25)
        })
        .unwrap();

        assert_eq!(loops, 3);
        assert!(!controller.is_playing());
    }
}
