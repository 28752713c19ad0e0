//! Drag gestures as directional input.
//!
//! Terminals report mouse presses and releases in cell coordinates. A drag
//! longer than the threshold along its dominant axis becomes one move.

use crate::types::{Direction, SWIPE_THRESHOLD};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Decode a displacement into a direction.
///
/// The longer axis wins; ties go to the vertical axis. Displacements whose
/// dominant component does not exceed `threshold` decode to nothing.
pub fn decode_swipe(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() <= threshold {
            return None;
        }
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else {
        if dy.abs() <= threshold {
            return None;
        }
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    }
}

/// Tracks a left-button drag from press to release.
///
/// Terminal cells are far coarser than touch pixels, so `scale` converts
/// cell deltas into swipe units before the threshold is applied.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    origin: Option<(i32, i32)>,
    threshold: i32,
    scale_x: i32,
    scale_y: i32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        // A cell is roughly 8px wide and 16px tall.
        Self::new(SWIPE_THRESHOLD, 8, 16)
    }
}

impl SwipeTracker {
    pub fn new(threshold: i32, scale_x: i32, scale_y: i32) -> Self {
        Self {
            origin: None,
            threshold,
            scale_x,
            scale_y,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Feed a mouse event; returns a direction when a drag completes.
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        let at = (i32::from(event.column), i32::from(event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some(at);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.origin.take()?;
                decode_swipe(
                    (at.0 - x0) * self.scale_x,
                    (at.1 - y0) * self.scale_y,
                    self.threshold,
                )
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.origin = None;
    }
}
