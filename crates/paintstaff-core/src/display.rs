//! Display capabilities the controller drives: a playhead marker and
//! two sprite buttons.
//!
//! Nothing here knows about a rendering system. A widget only has to
//! accept a horizontal coordinate or a button face.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Anything with a settable horizontal coordinate
pub trait PlayheadMarker {
    fn set_x(&mut self, x: i32);
}

/// A button whose image can be swapped
pub trait ButtonView {
    fn set_face(&mut self, face: &ButtonFace);
}

impl<T: PlayheadMarker + ?Sized> PlayheadMarker for Rc<RefCell<T>> {
    fn set_x(&mut self, x: i32) {
        self.borrow_mut().set_x(x);
    }
}

impl<T: ButtonView + ?Sized> ButtonView for Rc<RefCell<T>> {
    fn set_face(&mut self, face: &ButtonFace) {
        self.borrow_mut().set_face(face);
    }
}

/// Image plus the palette/shader it is drawn with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonFace {
    pub image: String,
    pub shader: String,
}

impl ButtonFace {
    pub fn new(image: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            shader: shader.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Play,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Up,
    Down,
}

/// Faces for one button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPair {
    pub up: ButtonFace,
    pub down: ButtonFace,
}

/// Sprite table for the transport buttons, indexed by button and state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSprites {
    pub play: ButtonPair,
    pub stop: ButtonPair,
}

impl ButtonSprites {
    pub fn face(&self, kind: ButtonKind, state: ButtonState) -> &ButtonFace {
        let pair = match kind {
            ButtonKind::Play => &self.play,
            ButtonKind::Stop => &self.stop,
        };
        match state {
            ButtonState::Up => &pair.up,
            ButtonState::Down => &pair.down,
        }
    }
}

/// How start/stop react when no sprites were attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    /// Log a warning and leave the buttons untouched
    #[default]
    Degraded,
    /// Report `PlaybackError::MissingButtonSprites`
    Strict,
}
