// Single-pointer drag tracking for the card host element.
use crate::model::{CardAction, Delta, Point};

/// Which input started the active drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointer {
    Mouse,
    Touch(i32),
}

#[derive(Default, Debug, Clone)]
pub struct TouchState {
    pub active: Option<Pointer>,
    pub last_x: f64,
    pub last_y: f64,
}

impl TouchState {
    /// Begins a drag unless one is already running; later touches are ignored.
    pub fn begin(&mut self, pointer: Pointer, x: f64, y: f64) -> Option<CardAction> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(pointer);
        self.last_x = x;
        self.last_y = y;
        Some(CardAction::DragStart(Point { x, y }))
    }

    /// Delta since the previous point of the same pointer.
    pub fn advance(&mut self, pointer: Pointer, x: f64, y: f64) -> Option<CardAction> {
        if self.active != Some(pointer) {
            return None;
        }
        let delta = Delta {
            dx: x - self.last_x,
            dy: y - self.last_y,
        };
        self.last_x = x;
        self.last_y = y;
        Some(CardAction::Drag(delta))
    }

    /// Moves the last point into a new pixel scale (device pixel ratio change mid-drag).
    pub fn rescale(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.last_x *= factor;
            self.last_y *= factor;
        }
    }

    /// Returns true if this ended the active drag.
    pub fn end(&mut self, pointer: Pointer) -> bool {
        if self.active == Some(pointer) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
