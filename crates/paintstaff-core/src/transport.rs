//! Transport state and tempo conversion

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{PlaybackError, Result};

/// Transport playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
}

/// Playhead bookkeeping owned by the controller
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub state: TransportState,
    /// Index into the step positions; `None` until the first step plays
    pub playhead_position: Option<usize>,
    /// When the playhead last advanced (or playback started)
    pub last_tick_time: Instant,
    pub loop_enabled: bool,
    /// Duration of one step (an eighth note)
    pub seconds_per_step: f64,
}

impl PlaybackState {
    pub fn new(seconds_per_step: f64, now: Instant) -> Result<Self> {
        validate_seconds_per_step(seconds_per_step)?;
        Ok(Self {
            state: TransportState::Stopped,
            playhead_position: None,
            last_tick_time: now,
            loop_enabled: false,
            seconds_per_step,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn step_duration(&self) -> Duration {
        // Validated on every write, so this is representable
        Duration::try_from_secs_f64(self.seconds_per_step).unwrap_or(Duration::MAX)
    }

    /// Tempo in BPM, counting each step as an eighth note
    pub fn bpm(&self) -> f64 {
        seconds_per_step_to_bpm(self.seconds_per_step)
    }

    /// Move to the next step, returning the new index
    pub fn advance(&mut self, now: Instant) -> usize {
        let next = self.playhead_position.map_or(0, |p| p + 1);
        self.playhead_position = Some(next);
        self.last_tick_time = now;
        next
    }
}

/// BPM for a step duration; two steps per beat
pub fn seconds_per_step_to_bpm(seconds_per_step: f64) -> f64 {
    60.0 / (seconds_per_step * 2.0)
}

/// Step duration for a BPM; two steps per beat
pub fn bpm_to_seconds_per_step(bpm: f64) -> Result<f64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(PlaybackError::InvalidTempo(bpm));
    }
    let seconds_per_step = 60.0 / (bpm * 2.0);
    validate_seconds_per_step(seconds_per_step).map_err(|_| PlaybackError::InvalidTempo(bpm))?;
    Ok(seconds_per_step)
}

/// A step duration must be positive and fit in a `Duration`
pub(crate) fn validate_seconds_per_step(seconds_per_step: f64) -> Result<()> {
    let representable = Duration::try_from_secs_f64(seconds_per_step).is_ok();
    if seconds_per_step > 0.0 && representable {
        Ok(())
    } else {
        Err(PlaybackError::InvalidTempo(seconds_per_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_conversion() {
        assert_eq!(seconds_per_step_to_bpm(0.25), 120.0);
        assert_eq!(seconds_per_step_to_bpm(0.5), 60.0);
        assert_eq!(bpm_to_seconds_per_step(120.0), Ok(0.25));
        assert!(bpm_to_seconds_per_step(0.0).is_err());
    }

    #[test]
    fn test_bpm_matches_formula_across_tempos() {
        for t in [0.05, 0.1, 0.125, 0.2, 0.25, 0.3, 0.75, 1.0, 2.5] {
            let state = PlaybackState::new(t, Instant::now()).unwrap();
            assert_eq!(state.bpm(), 60.0 / (t * 2.0));
        }
    }

    #[test]
    fn test_rejects_bad_step_duration() {
        let now = Instant::now();
        assert!(PlaybackState::new(0.0, now).is_err());
        assert!(PlaybackState::new(-0.25, now).is_err());
        assert!(PlaybackState::new(f64::NAN, now).is_err());
        assert!(PlaybackState::new(f64::INFINITY, now).is_err());
        assert!(PlaybackState::new(1e20, now).is_err());
    }

    #[test]
    fn test_huge_step_duration_is_rejected_not_panicking() {
        assert_eq!(validate_seconds_per_step(1e20), Err(PlaybackError::InvalidTempo(1e20)));
        assert!(validate_seconds_per_step(1e9).is_ok());
        assert_eq!(bpm_to_seconds_per_step(1e-300), Err(PlaybackError::InvalidTempo(1e-300)));
    }

    #[test]
    fn test_advance_from_sentinel() {
        let now = Instant::now();
        let mut state = PlaybackState::new(0.25, now).unwrap();
        assert_eq!(state.playhead_position, None);
        assert_eq!(state.advance(now), 0);
        assert_eq!(state.advance(now), 1);
    }
}
