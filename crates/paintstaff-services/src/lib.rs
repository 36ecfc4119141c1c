//! paintstaff-services: Sound output for the playback controller

pub mod voice_bank;

pub use voice_bank::{SoundCommand, VoiceBank};
