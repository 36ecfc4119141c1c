//! Player configuration, read from TOML

use std::path::{Path, PathBuf};

use paintstaff_core::{ButtonSprites, NoteEvent, VisualMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Step columns overflow: {count} steps of {spacing} from {margin}")]
    StepOverflow { count: usize, spacing: i32, margin: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Tempo in BPM; each step is an eighth note
    pub bpm: f64,
    pub loop_enabled: bool,
    /// X of the first step column
    pub start_margin: i32,
    pub step_count: usize,
    pub step_spacing: i32,
    pub visual_mode: VisualMode,
    /// Stop a looping run after this many passes (0 = never)
    pub max_loops: u32,
    pub notes: Vec<NoteEvent>,
    pub sprites: Option<ButtonSprites>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let start_margin = 25;
        let step_spacing = 12;
        // C major arpeggio up and back down
        let notes = [60, 64, 67, 72, 67, 64, 60]
            .into_iter()
            .enumerate()
            .map(|(i, pitch)| {
                NoteEvent::new(start_margin + i as i32 * step_spacing * 2, 40, pitch, 0)
            })
            .collect();
        Self {
            bpm: 120.0,
            loop_enabled: false,
            start_margin,
            step_count: 16,
            step_spacing,
            visual_mode: VisualMode::Degraded,
            max_loops: 2,
            notes,
            sprites: None,
        }
    }
}

impl PlayerConfig {
    /// Horizontal coordinate of every step column
    pub fn step_positions(&self) -> Result<Vec<i32>, ConfigError> {
        let overflow = || ConfigError::StepOverflow {
            count: self.step_count,
            spacing: self.step_spacing,
            margin: self.start_margin,
        };
        (0..self.step_count)
            .map(|i| {
                i32::try_from(i)
                    .ok()
                    .and_then(|i| i.checked_mul(self.step_spacing))
                    .and_then(|offset| offset.checked_add(self.start_margin))
                    .ok_or_else(overflow)
            })
            .collect()
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paintstaff")
        .join("config.toml")
}

pub fn parse_config(text: &str) -> Result<PlayerConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Load an explicit config file, or the per-user one if present.
///
/// Only an explicit path is required to exist and parse.
pub fn load_config(path: Option<&Path>) -> Result<PlayerConfig, ConfigError> {
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        return parse_config(&text);
    }

    Ok(std::fs::read_to_string(config_path())
        .ok()
        .and_then(|s| parse_config(&s).ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
bpm = 90.0
loop_enabled = true
visual_mode = "strict"

[[notes]]
x = 49
y = 30
pitch = 62
channel = 1
"#,
        )
        .unwrap();

        assert_eq!(config.bpm, 90.0);
        assert!(config.loop_enabled);
        assert_eq!(config.visual_mode, VisualMode::Strict);
        assert_eq!(config.start_margin, 25);
        assert_eq!(config.notes, vec![NoteEvent::new(49, 30, 62, 1)]);
        assert!(config.sprites.is_none());
    }

    #[test]
    fn test_parse_sprites_table() {
        let config = parse_config(
            r#"
[sprites.play.up]
image = "play_up.bmp"
shader = "play_up"

[sprites.play.down]
image = "play_down.bmp"
shader = "play_down"

[sprites.stop.up]
image = "stop_up.bmp"
shader = "stop_up"

[sprites.stop.down]
image = "stop_down.bmp"
shader = "stop_down"
"#,
        )
        .unwrap();

        let sprites = config.sprites.unwrap();
        assert_eq!(sprites.stop.down.image, "stop_down.bmp");
    }

    #[test]
    fn test_parse_rejects_bad_visual_mode() {
        assert!(matches!(
            parse_config("visual_mode = \"fancy\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_step_positions() {
        let config = PlayerConfig {
            step_count: 4,
            start_margin: 25,
            step_spacing: 25,
            ..Default::default()
        };
        assert_eq!(config.step_positions().unwrap(), vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_oversized_step_layout_is_rejected() {
        let config = parse_config("step_count = 100\nstep_spacing = 2147483647").unwrap();
        assert!(matches!(
            config.step_positions(),
            Err(ConfigError::StepOverflow { count: 100, .. })
        ));

        let config = PlayerConfig {
            step_count: 2,
            start_margin: i32::MAX,
            step_spacing: 1,
            ..Default::default()
        };
        assert!(config.step_positions().is_err());
    }

    #[test]
    fn test_default_notes_land_on_columns() {
        let config = PlayerConfig::default();
        let steps = config.step_positions().unwrap();
        for note in &config.notes {
            assert!(steps.iter().any(|&x| note.is_at(x, 2)));
        }
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let path = Path::new("/nonexistent/paintstaff/config.toml");
        assert!(matches!(load_config(Some(path)), Err(ConfigError::Io(_))));
    }
}
