//! Placed notes and the collaborators that read and sound them

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A note painted onto the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Horizontal position in screen units
    pub x: i32,
    /// Vertical position in screen units
    pub y: i32,
    /// MIDI note number (0-127, 60 = middle C)
    pub pitch: u8,
    /// Sound channel (instrument slot)
    pub channel: u8,
}

impl NoteEvent {
    pub fn new(x: i32, y: i32, pitch: u8, channel: u8) -> Self {
        Self { x, y, pitch, channel }
    }

    /// True if the note sits on column `x` within `tolerance` (exclusive)
    pub fn is_at(&self, x: i32, tolerance: i32) -> bool {
        (self.x - x).abs() < tolerance
    }
}

/// Triggers and silences notes
pub trait SoundService {
    /// Silence every note that is currently sounding
    fn stop_all_notes(&mut self);
    /// Sound a batch of coincident notes together
    fn play_notes_at_position(&mut self, notes: &[NoteEvent]);
}

impl<T: SoundService + ?Sized> SoundService for &mut T {
    fn stop_all_notes(&mut self) {
        (**self).stop_all_notes();
    }

    fn play_notes_at_position(&mut self, notes: &[NoteEvent]) {
        (**self).play_notes_at_position(notes);
    }
}

impl<T: SoundService + ?Sized> SoundService for Rc<RefCell<T>> {
    fn stop_all_notes(&mut self) {
        self.borrow_mut().stop_all_notes();
    }

    fn play_notes_at_position(&mut self, notes: &[NoteEvent]) {
        self.borrow_mut().play_notes_at_position(notes);
    }
}

impl<T: SoundService + ?Sized> SoundService for Box<T> {
    fn stop_all_notes(&mut self) {
        (**self).stop_all_notes();
    }

    fn play_notes_at_position(&mut self, notes: &[NoteEvent]) {
        (**self).play_notes_at_position(notes);
    }
}

/// Read-only view of the placed notes, in placement order
pub trait NoteProvider {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R;
}

impl NoteProvider for [NoteEvent] {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R {
        f(self)
    }
}

impl NoteProvider for Vec<NoteEvent> {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R {
        f(self)
    }
}

impl<T: NoteProvider + ?Sized> NoteProvider for &T {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R {
        (**self).with_notes(f)
    }
}

impl<T: NoteProvider + ?Sized> NoteProvider for Rc<RefCell<T>> {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R {
        self.borrow().with_notes(f)
    }
}

/// Editable note collection in placement order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteGrid {
    notes: Vec<NoteEvent>,
}

impl NoteGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_note(&mut self, note: NoteEvent) {
        self.notes.push(note);
    }

    /// Remove note at index
    pub fn remove_note(&mut self, index: usize) -> Option<NoteEvent> {
        if index < self.notes.len() {
            Some(self.notes.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }
}

impl FromIterator<NoteEvent> for NoteGrid {
    fn from_iter<I: IntoIterator<Item = NoteEvent>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}

impl NoteProvider for NoteGrid {
    fn with_notes<R>(&self, f: impl FnOnce(&[NoteEvent]) -> R) -> R {
        f(&self.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_at_tolerance_is_exclusive() {
        let note = NoteEvent::new(50, 10, 60, 0);
        assert!(note.is_at(50, 2));
        assert!(note.is_at(51, 2));
        assert!(note.is_at(49, 2));
        assert!(!note.is_at(52, 2));
        assert!(!note.is_at(48, 2));
    }

    #[test]
    fn test_note_grid_edits() {
        let mut grid = NoteGrid::new();
        grid.add_note(NoteEvent::new(25, 40, 60, 0));
        grid.add_note(NoteEvent::new(50, 30, 64, 1));
        assert_eq!(grid.len(), 2);

        assert_eq!(grid.remove_note(0), Some(NoteEvent::new(25, 40, 60, 0)));
        assert_eq!(grid.remove_note(5), None);
        assert_eq!(grid.notes(), &[NoteEvent::new(50, 30, 64, 1)]);

        grid.clear();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_shared_grid_sees_later_edits() {
        let grid = Rc::new(RefCell::new(NoteGrid::new()));
        let provider = grid.clone();

        grid.borrow_mut().add_note(NoteEvent::new(75, 20, 67, 2));

        assert_eq!(provider.with_notes(|notes| notes.len()), 1);
    }
}
