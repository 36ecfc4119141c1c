//! Voice tracking sound service
//!
//! Turns controller calls into note-on/note-off commands on a channel, so
//! a synth thread (or a logger) can consume them without the frame loop
//! ever blocking.

use std::collections::BTreeSet;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use paintstaff_core::{NoteEvent, SoundService};
use tracing::warn;

/// Default command queue depth
pub const DEFAULT_QUEUE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    NoteOn { channel: u8, pitch: u8 },
    NoteOff { channel: u8, pitch: u8 },
}

/// Tracks sounding (channel, pitch) voices and forwards commands
pub struct VoiceBank {
    tx: Sender<SoundCommand>,
    active: BTreeSet<(u8, u8)>,
    dropped: usize,
    disconnected: bool,
}

impl VoiceBank {
    pub fn new(tx: Sender<SoundCommand>) -> Self {
        Self {
            tx,
            active: BTreeSet::new(),
            dropped: 0,
            disconnected: false,
        }
    }

    /// Voice bank plus the receiving end of its command queue
    pub fn with_queue(capacity: usize) -> (Self, Receiver<SoundCommand>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }

    /// Number of voices currently sounding
    pub fn active_voices(&self) -> usize {
        self.active.len()
    }

    pub fn is_sounding(&self, channel: u8, pitch: u8) -> bool {
        self.active.contains(&(channel, pitch))
    }

    /// Commands that could not be queued
    pub fn dropped_commands(&self) -> usize {
        self.dropped
    }

    /// True once a send found the consumer gone
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn send(&mut self, cmd: SoundCommand) {
        match self.tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                warn!(?cmd, "Sound queue full, dropping command");
            }
            Err(TrySendError::Disconnected(_)) => {
                if !self.disconnected {
                    warn!("Sound consumer disconnected, commands will be dropped");
                    self.disconnected = true;
                }
                self.dropped += 1;
            }
        }
    }
}

impl SoundService for VoiceBank {
    fn stop_all_notes(&mut self) {
        let voices = std::mem::take(&mut self.active);
        for (channel, pitch) in voices {
            self.send(SoundCommand::NoteOff { channel, pitch });
        }
    }

    fn play_notes_at_position(&mut self, notes: &[NoteEvent]) {
        for note in notes {
            if self.active.insert((note.channel, note.pitch)) {
                self.send(SoundCommand::NoteOn {
                    channel: note.channel,
                    pitch: note.pitch,
                });
            }
        }
    }
}
