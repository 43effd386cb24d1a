//! Middle-mouse drag scrolling — a continuous scroll mode with its own
//! velocity model, independent of the command queue.
//!
//! Session lifecycle: Idle → Armed (qualifying press) → Dragging (cursor
//! left the dead zone) → Idle.  The Armed/Dragging split exists because the
//! press that starts the session is immediately followed by its own
//! mouseup; only after the cursor has moved far enough does a release end
//! the session.

use std::time::Instant;

use crate::host::ElementId;

/// Cursor displacement that commits the session to an explicit release.
const COMMIT_THRESHOLD: f64 = 10.0;

/// Cursor-displacement-to-velocity factor: pixels/ms per pixel of offset.
const SPEED_PER_OFFSET: f64 = 10.0 / 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Session started; an accidental release still terminates nothing.
    Armed,
    /// Cursor moved past the dead zone; release now ends the session.
    Dragging,
}

#[derive(Debug)]
struct Session {
    target: ElementId,
    reference_x: f64,
    reference_y: f64,
    /// Velocity in pixels per millisecond, per axis.
    velocity_x: f64,
    velocity_y: f64,
    phase: Phase,
    last_tick: Instant,
}

/// The drag-scroll controller.  At most one session is active at a time.
#[derive(Debug, Default)]
pub struct DragScroll {
    session: Option<Session>,
}

impl DragScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session against `target` with the reference point at the
    /// press position.  The caller has already qualified the press.
    pub fn begin(&mut self, target: ElementId, x: f64, y: f64, now: Instant) {
        self.session = Some(Session {
            target,
            reference_x: x,
            reference_y: y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            phase: Phase::Armed,
            last_tick: now,
        });
    }

    /// Update velocity from the cursor's displacement off the reference
    /// point; commits the session once the dead zone is left.
    pub fn on_move(&mut self, x: f64, y: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let offset_x = x - session.reference_x;
        let offset_y = y - session.reference_y;
        if session.phase == Phase::Armed
            && offset_x.abs().max(offset_y.abs()) > COMMIT_THRESHOLD
        {
            session.phase = Phase::Dragging;
        }
        session.velocity_x = offset_x * SPEED_PER_OFFSET;
        session.velocity_y = offset_y * SPEED_PER_OFFSET;
    }

    /// Mouse released.  Ends the session only after it committed; returns
    /// whether it ended.
    pub fn on_up(&mut self) -> bool {
        match &self.session {
            Some(session) if session.phase == Phase::Dragging => {
                self.session = None;
                true
            }
            _ => false,
        }
    }

    /// Unconditional termination (key press, second mouse press,
    /// teardown).  Returns whether a session was active.
    pub fn end(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Integrate velocity over the time since the last tick.  Returns the
    /// target and the whole-pixel deltas to apply this frame.
    pub fn tick(&mut self, now: Instant) -> Option<(ElementId, i32, i32)> {
        let session = self.session.as_mut()?;
        let elapsed_ms = now.saturating_duration_since(session.last_tick).as_secs_f64() * 1000.0;
        session.last_tick = now;
        let dx = (session.velocity_x * elapsed_ms) as i32;
        let dy = (session.velocity_y * elapsed_ms) as i32;
        Some((session.target, dx, dy))
    }
}
