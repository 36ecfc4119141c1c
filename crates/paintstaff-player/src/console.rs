//! Log-only stand-ins for the on-screen playhead and buttons

use paintstaff_core::{ButtonFace, ButtonView, PlayheadMarker};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConsoleMarker {
    x: i32,
}

impl PlayheadMarker for ConsoleMarker {
    fn set_x(&mut self, x: i32) {
        if x != self.x {
            debug!(x, "Playhead moved");
        }
        self.x = x;
    }
}

#[derive(Debug)]
pub struct ConsoleButton {
    name: &'static str,
}

impl ConsoleButton {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl ButtonView for ConsoleButton {
    fn set_face(&mut self, face: &ButtonFace) {
        debug!(
            button = self.name,
            image = %face.image,
            shader = %face.shader,
            "Button face changed"
        );
    }
}
