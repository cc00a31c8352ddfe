//! Card interaction state.
//! `CardState` is driven by `CardAction`s through yew's `Reducible`, which is where drag
//! input gets mapped to a bounded offset and tilt.

use std::rc::Rc;
use yew::Reducible;

/// Largest tilt in either direction, in degrees.
pub const MAX_TILT_DEG: f64 = 10.0;
/// Tilt around the vertical axis per pixel of horizontal offset.
pub const TILT_Y_SLOPE: f64 = 0.1;
/// Tilt around the horizontal axis per pixel of vertical offset.
pub const TILT_X_SLOPE: f64 = -0.07;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardAction {
    /// A drag begins at a card-local point.
    DragStart(Point),
    /// The active drag moved by a delta since the previous event.
    Drag(Delta),
    /// Card bounds changed (device pixel ratio or config).
    Resize { width: f64, height: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardState {
    /// Last touch point, card-local device pixels.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Tilt in degrees around the horizontal (x) and vertical (y) axes.
    pub rotation_x: f64,
    pub rotation_y: f64,
    /// Card bounds in device pixels.
    pub width: f64,
    pub height: f64,
}

impl CardState {
    /// Rest pose for a card of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Moves the touch point to `(x, y)` (clamped to the bounds) and re-derives the tilt.
    fn place(&mut self, x: f64, y: f64) {
        self.offset_x = x.clamp(0.0, self.width);
        self.offset_y = y.clamp(0.0, self.height);
        self.rotation_y = rotation_y_for(self.offset_x);
        self.rotation_x = rotation_x_for(self.offset_y);
    }

    pub fn on_drag_start(&self, point: Point) -> Self {
        let mut next = self.clone();
        next.place(point.x, point.y);
        next
    }

    pub fn on_drag(&self, delta: Delta) -> Self {
        let mut next = self.clone();
        next.place(self.offset_x + delta.dx, self.offset_y + delta.dy);
        next
    }

    pub fn on_resize(&self, width: f64, height: f64) -> Self {
        let mut next = self.clone();
        next.width = width.max(0.0);
        next.height = height.max(0.0);
        // Rest pose stays at rest until the next drag.
        if *self != CardState::new(self.width, self.height) {
            next.place(self.offset_x, self.offset_y);
        }
        next
    }
}

pub fn rotation_y_for(offset_x: f64) -> f64 {
    (TILT_Y_SLOPE * offset_x - MAX_TILT_DEG).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

pub fn rotation_x_for(offset_y: f64) -> f64 {
    (TILT_X_SLOPE * offset_y + MAX_TILT_DEG).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

impl Reducible for CardState {
    type Action = CardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let new = match action {
            CardAction::DragStart(p) => self.on_drag_start(p),
            CardAction::Drag(d) => self.on_drag(d),
            CardAction::Resize { width, height } => self.on_resize(width, height),
        };
        if new == *self {
            return self;
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn started() -> CardState {
        CardState::new(200.0, 300.0).on_drag_start(Point { x: 100.0, y: 150.0 })
    }

    #[test]
    fn rest_state_is_all_zero() {
        let s = CardState::new(200.0, 300.0);
        assert_eq!(
            s,
            CardState {
                offset_x: 0.0,
                offset_y: 0.0,
                rotation_x: 0.0,
                rotation_y: 0.0,
                width: 200.0,
                height: 300.0,
            }
        );
    }

    #[test]
    fn drag_right_tilts_proportionally() {
        let s = started().on_drag(Delta { dx: 50.0, dy: 0.0 });
        assert_eq!(s.offset_x, 150.0);
        assert!(close(s.rotation_y, 5.0), "rotation_y = {}", s.rotation_y);
    }

    #[test]
    fn drag_past_right_edge_clamps() {
        let s = started().on_drag(Delta { dx: 500.0, dy: 0.0 });
        assert_eq!(s.offset_x, 200.0);
        assert_eq!(s.rotation_y, 10.0);
    }

    #[test]
    fn drag_past_top_edge_clamps() {
        let s = started().on_drag(Delta { dx: 0.0, dy: -500.0 });
        assert_eq!(s.offset_y, 0.0);
        assert_eq!(s.rotation_x, 10.0);
    }

    #[test]
    fn drag_to_bottom_saturates_negative_tilt() {
        let s = started().on_drag(Delta { dx: 0.0, dy: 1000.0 });
        assert_eq!(s.offset_y, 300.0);
        assert_eq!(s.rotation_x, -10.0);
    }

    #[test]
    fn further_push_at_bound_is_noop() {
        let at_edge = started().on_drag(Delta { dx: 500.0, dy: 0.0 });
        let pushed = at_edge.on_drag(Delta { dx: 40.0, dy: 0.0 });
        assert_eq!(pushed, at_edge);
    }

    #[test]
    fn drag_start_outside_bounds_is_clamped() {
        let s = CardState::new(200.0, 300.0).on_drag_start(Point { x: -5.0, y: 320.0 });
        assert_eq!((s.offset_x, s.offset_y), (0.0, 300.0));
        assert_eq!(s.rotation_y, -10.0);
        assert_eq!(s.rotation_x, -10.0);
    }

    #[test]
    fn reducer_keeps_rc_on_zero_delta() {
        let s = Rc::new(started());
        let next = s.clone().reduce(CardAction::Drag(Delta::default()));
        assert!(Rc::ptr_eq(&s, &next));
    }

    #[test]
    fn reducer_applies_drag() {
        let s = Rc::new(started());
        let next = s.reduce(CardAction::Drag(Delta { dx: -100.0, dy: 0.0 }));
        assert_eq!(next.offset_x, 0.0);
        assert_eq!(next.rotation_y, -10.0);
    }

    #[test]
    fn shrinking_bounds_reclamps_offsets() {
        let s = started()
            .on_drag(Delta { dx: 100.0, dy: 150.0 })
            .on_resize(100.0, 150.0);
        assert_eq!((s.offset_x, s.offset_y), (100.0, 150.0));
        assert!(close(s.rotation_y, 0.0));
        assert!(close(s.rotation_x, -0.5));
    }

    #[test]
    fn resize_at_rest_stays_at_rest() {
        let s = CardState::new(200.0, 300.0).on_resize(400.0, 600.0);
        assert_eq!(s, CardState::new(400.0, 600.0));
    }

    fn delta_strategy() -> impl Strategy<Value = Delta> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(dx, dy)| Delta { dx, dy })
    }

    proptest! {
        /// Offsets and tilt stay within their bounds under any drag sequence.
        #[test]
        fn drags_stay_in_bounds(
            start in (0.0f64..=200.0, 0.0f64..=300.0),
            deltas in prop::collection::vec(delta_strategy(), 0..50),
        ) {
            let mut s = CardState::new(200.0, 300.0).on_drag_start(Point { x: start.0, y: start.1 });
            for d in deltas {
                s = s.on_drag(d);
                prop_assert!((0.0..=200.0).contains(&s.offset_x));
                prop_assert!((0.0..=300.0).contains(&s.offset_y));
                prop_assert!((-MAX_TILT_DEG..=MAX_TILT_DEG).contains(&s.rotation_x));
                prop_assert!((-MAX_TILT_DEG..=MAX_TILT_DEG).contains(&s.rotation_y));
            }
        }

        /// Tilt is exactly the clamped linear function of the offset.
        #[test]
        fn tilt_follows_offset(
            start in (0.0f64..=200.0, 0.0f64..=300.0),
            d in delta_strategy(),
        ) {
            let s = CardState::new(200.0, 300.0)
                .on_drag_start(Point { x: start.0, y: start.1 })
                .on_drag(d);
            prop_assert_eq!(s.rotation_y, (0.1 * s.offset_x - 10.0).clamp(-10.0, 10.0));
            prop_assert_eq!(s.rotation_x, (-0.07 * s.offset_y + 10.0).clamp(-10.0, 10.0));
        }

        #[test]
        fn zero_delta_is_identity(start in (0.0f64..=200.0, 0.0f64..=300.0)) {
            let s = CardState::new(200.0, 300.0).on_drag_start(Point { x: start.0, y: start.1 });
            prop_assert_eq!(s.on_drag(Delta::default()), s);
        }
    }
}
