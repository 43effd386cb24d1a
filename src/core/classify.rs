//! Input classification — wheel delta normalization, the touchpad
//! heuristic, and keyboard-to-delta mapping.

use crate::config::ScrollConfig;
use crate::host::{ScrollKey, WheelEvent};

// ───────────────────────────────────────── wheel ─────────────

/// Rolling history of recent wheel delta magnitudes, used to tell
/// touchpads from notched wheels.
///
/// Discrete wheel hardware produces runs of identical deltas, almost
/// always multiples of 120; touchpads produce a jittery stream of
/// arbitrary magnitudes.  Three samples are enough to separate the two.
#[derive(Debug, Clone)]
pub struct DeltaTracker {
    buffer: [f64; 3],
}

impl Default for DeltaTracker {
    fn default() -> Self {
        // Seeded with the classic notch value so the first real ticks of a
        // wheel are not misread as a touchpad.
        Self {
            buffer: [120.0, 120.0, 120.0],
        }
    }
}

impl DeltaTracker {
    /// Record `delta_y` and classify the current input source.
    /// A zero delta records nothing and is never a touchpad.
    pub fn is_touchpad(&mut self, delta_y: f64) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        self.buffer.rotate_left(1);
        self.buffer[2] = delta_y.abs();

        let all_equal = self.buffer[0] == self.buffer[1] && self.buffer[1] == self.buffer[2];
        let all_divisible = self.buffer.iter().all(|&d| is_divisible(d, 120.0));
        !(all_equal || all_divisible)
    }
}

fn is_divisible(n: f64, divisor: f64) -> bool {
    (n / divisor).floor() == n / divisor
}

/// Pick the per-axis deltas off a wheel event, falling back to the legacy
/// scalar on the Y axis when neither axis field is set.
pub fn wheel_deltas(ev: &WheelEvent) -> (f64, f64) {
    let dx = ev.wheel_delta_x;
    let mut dy = ev.wheel_delta_y;
    if dx == 0.0 && dy == 0.0 {
        dy = ev.wheel_delta;
    }
    (dx, dy)
}

/// Scale a delta to the configured step size.
///
/// Notched wheels report 120 per tick; Synaptics-style drivers sometimes
/// send ±1.  Magnitudes at or below 1.2 are assumed pre-scaled and pass
/// through untouched.
pub fn scale_delta(delta: f64, step_size: f64) -> f64 {
    if delta.abs() > 1.2 {
        delta * step_size / 120.0
    } else {
        delta
    }
}

// ───────────────────────────────────────── keyboard ──────────

/// Geometry of the resolved scroll target, gathered by the caller.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext {
    pub client_height: f64,
    pub scroll_top: f64,
    pub scroll_height: f64,
}

/// Map a recognized key to signed `(x, y)` scroll deltas.
/// `None` means the key is not ours and native behavior should proceed.
pub fn key_deltas(
    key: ScrollKey,
    shift: bool,
    ctx: KeyContext,
    cfg: &ScrollConfig,
) -> Option<(f64, f64)> {
    let page = ctx.client_height * 0.9;
    let deltas = match key {
        ScrollKey::Up => (0.0, -cfg.arrow_scroll),
        ScrollKey::Down => (0.0, cfg.arrow_scroll),
        ScrollKey::Left => (-cfg.arrow_scroll, 0.0),
        ScrollKey::Right => (cfg.arrow_scroll, 0.0),
        ScrollKey::Space => (0.0, if shift { -page } else { page }),
        ScrollKey::PageUp => (0.0, -page),
        ScrollKey::PageDown => (0.0, page),
        ScrollKey::Home => (0.0, -ctx.scroll_top),
        ScrollKey::End => {
            let remaining = ctx.scroll_height - ctx.scroll_top - ctx.client_height;
            // The 10px overshoot guarantees the very bottom is reached even
            // after truncation; nothing to do when already there.
            (0.0, if remaining > 0.0 { remaining + 10.0 } else { 0.0 })
        }
        ScrollKey::Other => return None,
    };
    Some(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(client_height: f64, scroll_top: f64, scroll_height: f64) -> KeyContext {
        KeyContext {
            client_height,
            scroll_top,
            scroll_height,
        }
    }

    #[test]
    fn notched_wheel_is_not_a_touchpad() {
        let mut t = DeltaTracker::default();
        for _ in 0..3 {
            assert!(!t.is_touchpad(120.0));
        }
        assert_eq!(t.buffer, [120.0, 120.0, 120.0]);
    }

    #[test]
    fn equal_runs_are_wheels_even_off_notch() {
        // 121 is not divisible by 120, but three equal samples still read
        // as discrete hardware via the equality branch.
        let mut t = DeltaTracker::default();
        t.is_touchpad(121.0);
        t.is_touchpad(121.0);
        assert!(!t.is_touchpad(121.0));

        let mut t = DeltaTracker::default();
        t.is_touchpad(60.0);
        t.is_touchpad(60.0);
        assert!(!t.is_touchpad(60.0));
    }

    #[test]
    fn jittery_magnitudes_are_a_touchpad() {
        let mut t = DeltaTracker::default();
        t.is_touchpad(17.0);
        t.is_touchpad(33.0);
        assert!(t.is_touchpad(29.0));
    }

    #[test]
    fn zero_delta_is_ignored() {
        let mut t = DeltaTracker::default();
        t.is_touchpad(17.0);
        t.is_touchpad(33.0);
        assert!(!t.is_touchpad(0.0));
        // The buffer kept its previous contents.
        assert!(t.is_touchpad(29.0));
    }

    #[test]
    fn legacy_scalar_falls_back_to_y_axis() {
        let ev = WheelEvent {
            target: 0,
            wheel_delta_x: 0.0,
            wheel_delta_y: 0.0,
            wheel_delta: -120.0,
            default_prevented: false,
        };
        assert_eq!(wheel_deltas(&ev), (0.0, -120.0));
    }

    #[test]
    fn axis_fields_win_over_legacy_scalar() {
        let ev = WheelEvent {
            target: 0,
            wheel_delta_x: 0.0,
            wheel_delta_y: 240.0,
            wheel_delta: -120.0,
            default_prevented: false,
        };
        assert_eq!(wheel_deltas(&ev), (0.0, 240.0));
    }

    #[test]
    fn scale_normalizes_notches_and_passes_fine_deltas() {
        assert_eq!(scale_delta(120.0, 60.0), 60.0);
        assert_eq!(scale_delta(-240.0, 120.0), -240.0);
        assert_eq!(scale_delta(1.0, 120.0), 1.0);
        assert_eq!(scale_delta(-1.2, 120.0), -1.2);
    }

    #[test]
    fn arrows_scroll_by_configured_step() {
        let cfg = ScrollConfig::default();
        let c = ctx(400.0, 0.0, 1000.0);
        assert_eq!(key_deltas(ScrollKey::Up, false, c, &cfg), Some((0.0, -50.0)));
        assert_eq!(key_deltas(ScrollKey::Down, false, c, &cfg), Some((0.0, 50.0)));
        assert_eq!(key_deltas(ScrollKey::Left, false, c, &cfg), Some((-50.0, 0.0)));
        assert_eq!(key_deltas(ScrollKey::Right, false, c, &cfg), Some((50.0, 0.0)));
    }

    #[test]
    fn space_pages_down_and_shift_reverses() {
        let cfg = ScrollConfig::default();
        let c = ctx(400.0, 0.0, 1000.0);
        assert_eq!(key_deltas(ScrollKey::Space, false, c, &cfg), Some((0.0, 360.0)));
        assert_eq!(key_deltas(ScrollKey::Space, true, c, &cfg), Some((0.0, -360.0)));
        assert_eq!(key_deltas(ScrollKey::PageDown, false, c, &cfg), Some((0.0, 360.0)));
        assert_eq!(key_deltas(ScrollKey::PageUp, false, c, &cfg), Some((0.0, -360.0)));
    }

    #[test]
    fn home_returns_to_top() {
        let cfg = ScrollConfig::default();
        assert_eq!(
            key_deltas(ScrollKey::Home, false, ctx(400.0, 250.0, 1000.0), &cfg),
            Some((0.0, -250.0))
        );
    }

    #[test]
    fn end_overshoots_by_ten_unless_at_bottom() {
        let cfg = ScrollConfig::default();
        assert_eq!(
            key_deltas(ScrollKey::End, false, ctx(400.0, 200.0, 1000.0), &cfg),
            Some((0.0, 410.0))
        );
        assert_eq!(
            key_deltas(ScrollKey::End, false, ctx(400.0, 600.0, 1000.0), &cfg),
            Some((0.0, 0.0))
        );
    }

    #[test]
    fn unrecognized_keys_are_not_ours() {
        let cfg = ScrollConfig::default();
        assert_eq!(key_deltas(ScrollKey::Other, false, ctx(400.0, 0.0, 1000.0), &cfg), None);
    }
}
