//! Input intents
//!
//! Pointer and touch handlers only record what happened. Nothing touches the
//! simulation until [`InputIntents::take`] hands the batch to the next tick.

use crate::sim::TickInput;

/// Gestures buffered between two ticks
#[derive(Debug, Clone, Default)]
pub struct InputIntents {
    press: bool,
    moves: u32,
    release: bool,
    cancel: bool,
    /// Pointer currently down
    held: bool,
    /// Let the autopilot play (demo mode)
    pub autopilot: bool,
}

impl InputIntents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down / touch start
    pub fn begin_charge(&mut self) {
        self.press = true;
        self.held = true;
    }

    /// Pointer moved while held
    pub fn continue_charge(&mut self) {
        if self.held {
            self.moves += 1;
        }
    }

    /// Pointer up / touch end
    pub fn release_jump(&mut self) {
        if self.held {
            self.release = true;
        }
        self.held = false;
    }

    /// Touch cancelled by the system
    pub fn cancel_charge(&mut self) {
        self.cancel = true;
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Drain the buffered gestures into one tick's input
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            press: self.press,
            moves: self.moves,
            release: self.release,
            cancel: self.cancel,
            autopilot: self.autopilot,
        };
        self.press = false;
        self.moves = 0;
        self.release = false;
        self.cancel = false;
        input
    }
}
