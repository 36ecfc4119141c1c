//! Playback controller: sweeps the playhead across the step columns and
//! sounds every note sitting on the current column.
//!
//! The controller never spawns a timer. Call [`PlaybackController::tick`]
//! from the frame loop; the playhead only moves once a full step duration
//! has elapsed on the clock, so the tempo does not depend on frame rate.

use tracing::{debug, info, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::display::{
    ButtonKind, ButtonSprites, ButtonState, ButtonView, PlayheadMarker, VisualMode,
};
use crate::error::{PlaybackError, Result};
use crate::note::{NoteEvent, NoteProvider, SoundService};
use crate::transport::{
    bpm_to_seconds_per_step, validate_seconds_per_step, PlaybackState, TransportState,
};

/// Notes closer than this to a step column play on that step
const NOTE_TOLERANCE: i32 = 2;
/// Marker sits this far left of the first column while waiting to start
const START_MARKER_OFFSET: i32 = 5;
/// Marker sits this far left of the column being played
const STEP_MARKER_OFFSET: i32 = 1;
const OFFSCREEN_X: i32 = -10;

/// What a call to [`PlaybackController::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing
    Idle,
    /// Playing, but the current step has not run its full duration
    Waiting,
    /// Moved to `step` and dispatched `notes` coincident notes
    Advanced { step: usize, notes: usize, wrapped: bool },
    /// Ran off the end without looping; playback stopped
    Finished,
}

struct Display {
    playhead: Box<dyn PlayheadMarker>,
    play_button: Box<dyn ButtonView>,
    stop_button: Box<dyn ButtonView>,
    sprites: Option<ButtonSprites>,
}

pub struct PlaybackController<S, N> {
    sound: S,
    notes: N,
    clock: Box<dyn Clock>,
    state: PlaybackState,
    display: Option<Display>,
    visual_mode: VisualMode,
}

impl<S: SoundService, N: NoteProvider> PlaybackController<S, N> {
    pub fn new(sound: S, notes: N, seconds_per_step: f64) -> Result<Self> {
        Self::with_clock(sound, notes, seconds_per_step, MonotonicClock)
    }

    pub fn with_clock(
        sound: S,
        notes: N,
        seconds_per_step: f64,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        let state = PlaybackState::new(seconds_per_step, clock.now())?;
        Ok(Self {
            sound,
            notes,
            clock: Box::new(clock),
            state,
            display: None,
            visual_mode: VisualMode::default(),
        })
    }

    /// Bind the on-screen playhead and transport buttons.
    ///
    /// Until this is called, start/stop only change playback state.
    pub fn attach_display(
        &mut self,
        playhead: impl PlayheadMarker + 'static,
        play_button: impl ButtonView + 'static,
        stop_button: impl ButtonView + 'static,
        sprites: Option<ButtonSprites>,
    ) {
        self.display = Some(Display {
            playhead: Box::new(playhead),
            play_button: Box::new(play_button),
            stop_button: Box::new(stop_button),
            sprites,
        });
    }

    pub fn set_visual_mode(&mut self, mode: VisualMode) {
        self.visual_mode = mode;
    }

    pub fn visual_mode(&self) -> VisualMode {
        self.visual_mode
    }

    /// Start playing from the first step.
    ///
    /// The first due tick plays step 0. In strict visual mode with a display
    /// but no sprites this fails and playback stays stopped.
    pub fn start(&mut self, start_margin: i32) -> Result<()> {
        if self.visual_mode == VisualMode::Strict
            && self.display.as_ref().is_some_and(|d| d.sprites.is_none())
        {
            return Err(PlaybackError::MissingButtonSprites);
        }

        self.state.state = TransportState::Playing;
        self.state.playhead_position = None;
        self.state.last_tick_time = self.clock.now();

        self.move_marker(start_margin - START_MARKER_OFFSET);
        self.show_buttons(ButtonState::Down, ButtonState::Up)?;

        info!("Playback started");
        Ok(())
    }

    /// Silence everything and stop. Always reaches the sound service, even
    /// when already stopped.
    pub fn stop(&mut self) -> Result<()> {
        self.sound.stop_all_notes();
        self.state.state = TransportState::Stopped;
        self.move_marker(OFFSCREEN_X);

        let shown = self.show_buttons(ButtonState::Up, ButtonState::Down);
        info!("Playback stopped");
        shown
    }

    /// Start if stopped, stop if playing
    pub fn toggle(&mut self, start_margin: i32) -> Result<()> {
        if self.state.is_playing() {
            self.stop()
        } else {
            self.start(start_margin)
        }
    }

    /// Change the step duration. The playhead stays where it is.
    pub fn set_tempo(&mut self, seconds_per_step: f64) -> Result<()> {
        validate_seconds_per_step(seconds_per_step)?;
        self.state.seconds_per_step = seconds_per_step;
        info!(bpm = self.state.bpm(), "Playback tempo updated");
        Ok(())
    }

    /// Change the tempo in BPM, counting each step as an eighth note
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        self.set_tempo(bpm_to_seconds_per_step(bpm)?)
    }

    /// Advance the playhead if a step is due.
    pub fn tick(&mut self, step_positions: &[i32]) -> Result<TickOutcome> {
        if !self.state.is_playing() {
            return Ok(TickOutcome::Idle);
        }

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.state.last_tick_time);
        if elapsed < self.state.step_duration() {
            return Ok(TickOutcome::Waiting);
        }

        self.sound.stop_all_notes();
        let mut step = self.state.advance(now);
        let mut wrapped = false;

        if step >= step_positions.len() {
            // An empty step list has no first column to wrap to
            if !self.state.loop_enabled || step_positions.is_empty() {
                self.stop()?;
                return Ok(TickOutcome::Finished);
            }
            step = 0;
            self.state.playhead_position = Some(0);
            wrapped = true;
        }

        let x = step_positions[step];
        self.move_marker(x - STEP_MARKER_OFFSET);

        let batch: Vec<NoteEvent> = self.notes.with_notes(|notes| {
            notes
                .iter()
                .filter(|note| note.is_at(x, NOTE_TOLERANCE))
                .copied()
                .collect()
        });
        if !batch.is_empty() {
            self.sound.play_notes_at_position(&batch);
        }

        debug!(step, x, notes = batch.len(), wrapped, "Playhead advanced");
        Ok(TickOutcome::Advanced {
            step,
            notes: batch.len(),
            wrapped,
        })
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.state.loop_enabled = enabled;
    }

    pub fn is_loop_enabled(&self) -> bool {
        self.state.loop_enabled
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Current step index; `None` before the first step plays
    pub fn playhead_position(&self) -> Option<usize> {
        self.state.playhead_position
    }

    pub fn seconds_per_step(&self) -> f64 {
        self.state.seconds_per_step
    }

    pub fn bpm(&self) -> f64 {
        self.state.bpm()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn notes(&self) -> &N {
        &self.notes
    }

    fn move_marker(&mut self, x: i32) {
        if let Some(display) = self.display.as_mut() {
            display.playhead.set_x(x);
        }
    }

    fn show_buttons(&mut self, play: ButtonState, stop: ButtonState) -> Result<()> {
        let Some(display) = self.display.as_mut() else {
            warn!("No display attached, leaving buttons unchanged");
            return Ok(());
        };
        let Some(sprites) = display.sprites.as_ref() else {
            return match self.visual_mode {
                VisualMode::Degraded => {
                    warn!("Button sprites not attached, leaving buttons unchanged");
                    Ok(())
                }
                VisualMode::Strict => Err(PlaybackError::MissingButtonSprites),
            };
        };

        display.play_button.set_face(sprites.face(ButtonKind::Play, play));
        display.stop_button.set_face(sprites.face(ButtonKind::Stop, stop));
        Ok(())
    }
}
