//! Scroll animation — a queue of in-flight scroll commands advanced by an
//! eased position function on every frame tick.
//!
//! Each discrete input (one wheel notch, one key press) becomes one
//! [`ScrollCommand`]; concurrently active commands blend, their per-frame
//! increments summed into a single application against the target.

use std::time::Instant;

use crate::config::ScrollConfig;
use crate::core::pulse::PulseEaser;
use crate::host::ElementId;

/// Where a frame's summed delta gets applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    /// The window scroller (`window.scrollBy` semantics).
    Window,
    /// A specific element's scroll offsets.
    Element(ElementId),
}

/// One discrete scroll request in flight.
#[derive(Debug, Clone)]
struct ScrollCommand {
    dx: f64,
    dy: f64,
    /// How much of the eased target has been applied so far.  Starts at a
    /// small epsilon opposing the delta's sign so the first frame always
    /// contributes at least one pixel.
    applied_x: f64,
    applied_y: f64,
    start: Instant,
}

/// A frame's combined output: the summed increments of every active
/// command, already truncated to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameScroll {
    pub target: ScrollTarget,
    pub dx: i32,
    pub dy: i32,
}

/// The command queue plus the per-instance direction and acceleration
/// clocks.
#[derive(Debug)]
pub struct ScrollAnimator {
    queue: Vec<ScrollCommand>,
    easer: PulseEaser,
    /// Last-known scroll sign per axis; a reversal flushes the queue.
    direction: (i8, i8),
    /// Previous enqueue time, the acceleration baseline.  `None` after a
    /// reversal, which also disarms acceleration for the next command.
    last_enqueue: Option<Instant>,
    /// Target of the currently running tick loop.  Commands arriving while
    /// a loop is pending join it and inherit this target.
    active: Option<ScrollTarget>,
}

impl ScrollAnimator {
    pub fn new(cfg: &ScrollConfig) -> Self {
        Self {
            queue: Vec::new(),
            easer: PulseEaser::new(cfg.pulse_scale),
            direction: (0, 0),
            last_enqueue: None,
            active: None,
        }
    }

    /// Whether a tick loop is running and the embedder should keep
    /// scheduling frames.
    pub fn is_pending(&self) -> bool {
        self.active.is_some()
    }

    /// Queue one scroll request.  Applies the acceleration factor for
    /// rapid repeated input, flushes the queue on direction reversal, and
    /// starts a tick loop if none is pending.
    pub fn enqueue(
        &mut self,
        cfg: &ScrollConfig,
        target: ScrollTarget,
        mut dx: f64,
        mut dy: f64,
        now: Instant,
    ) {
        self.check_direction(dx, dy);

        if cfg.acceleration_max != 1.0 {
            if let Some(prev) = self.last_enqueue {
                let elapsed_ms = now.saturating_duration_since(prev).as_secs_f64() * 1000.0;
                if elapsed_ms < cfg.acceleration_delta_ms as f64 {
                    let factor = ((1.0 + 30.0 / elapsed_ms) / 2.0).min(cfg.acceleration_max);
                    if factor > 1.0 {
                        dx *= factor;
                        dy *= factor;
                    }
                }
            }
            self.last_enqueue = Some(now);
        }

        self.queue.push(ScrollCommand {
            dx,
            dy,
            applied_x: if dx < 0.0 { 0.99 } else { -0.99 },
            applied_y: if dy < 0.0 { 0.99 } else { -0.99 },
            start: now,
        });

        if self.active.is_none() {
            self.active = Some(target);
        }
    }

    /// Advance every queued command to `now` and return the frame's summed
    /// delta.  Finished commands contribute their final increment and are
    /// removed; the loop stops once the queue drains.  `None` when no loop
    /// is pending.
    pub fn tick(&mut self, cfg: &ScrollConfig, now: Instant) -> Option<FrameScroll> {
        let target = self.active?;
        let duration_ms = cfg.animation_time_ms as f64;
        let pulse = cfg.pulse_algorithm;
        let easer = &mut self.easer;

        let mut sum_x = 0i32;
        let mut sum_y = 0i32;

        self.queue.retain_mut(|item| {
            let elapsed_ms = now.saturating_duration_since(item.start).as_secs_f64() * 1000.0;
            let finished = elapsed_ms >= duration_ms;

            // scroll position: [0, 1]
            let mut position = if finished { 1.0 } else { elapsed_ms / duration_ms };
            if pulse {
                position = easer.ease(position);
            }

            // Only the difference matters, truncated toward zero — the
            // sub-pixel remainder intentionally stays behind.
            let x = (item.dx * position - item.applied_x) as i32;
            let y = (item.dy * position - item.applied_y) as i32;

            sum_x += x;
            sum_y += y;
            item.applied_x += f64::from(x);
            item.applied_y += f64::from(y);

            !finished
        });

        if self.queue.is_empty() {
            self.active = None;
        }

        Some(FrameScroll {
            target,
            dx: sum_x,
            dy: sum_y,
        })
    }

    /// Drop every pending command and stop the loop.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.active = None;
        self.last_enqueue = None;
    }

    /// Compare the new command's sign against the stored direction; a flip
    /// on either axis discards the whole queue and resets the acceleration
    /// baseline.
    fn check_direction(&mut self, dx: f64, dy: f64) {
        let x = if dx > 0.0 { 1 } else { -1 };
        let y = if dy > 0.0 { 1 } else { -1 };
        if self.direction != (x, y) {
            self.direction = (x, y);
            self.queue.clear();
            self.last_enqueue = None;
        }
    }
}
