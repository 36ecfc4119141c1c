//! paintstaff-core: Playback domain for the painted music staff

mod clock;
mod display;
mod error;
mod note;
mod playback;
mod transport;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use display::{
    ButtonFace, ButtonKind, ButtonPair, ButtonSprites, ButtonState, ButtonView, PlayheadMarker,
    VisualMode,
};
pub use error::{PlaybackError, Result};
pub use note::{NoteEvent, NoteGrid, NoteProvider, SoundService};
pub use playback::{PlaybackController, TickOutcome};
pub use transport::{
    bpm_to_seconds_per_step, seconds_per_step_to_bpm, PlaybackState, TransportState,
};
