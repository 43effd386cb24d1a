//! Pulse easing — viscous fluid with a pulse for part and decay for the rest.
//!
//! Applies a fixed force over an interval (a damped acceleration), then lets
//! the exponential bleed away the velocity over a longer interval.  Maps
//! normalized time in [0, 1] to normalized progress in [0, 1].

/// The easing curve with its memoized normalization constant.
///
/// The raw curve does not reach 1.0 at `x = 1`; the first call computes
/// `raw(1)` once and divides every subsequent sample by it so the animation
/// always lands exactly on its target.
#[derive(Debug, Clone)]
pub struct PulseEaser {
    /// Ratio of "tail" to "acceleration" — rescales the input.
    scale: f64,
    /// `raw(1)` for this scale, computed on first use.
    normalize: Option<f64>,
}

impl PulseEaser {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            normalize: None,
        }
    }

    /// Eased progress for `x` in [0, 1]; clamps outside the domain.
    pub fn ease(&mut self, x: f64) -> f64 {
        if x >= 1.0 {
            return 1.0;
        }
        if x <= 0.0 {
            return 0.0;
        }
        let normalize = *self
            .normalize
            .get_or_insert_with(|| raw(self.scale, 1.0));
        raw(self.scale, x) / normalize
    }
}

/// The unnormalized curve.
fn raw(scale: f64, x: f64) -> f64 {
    let x = x * scale;
    if x < 1.0 {
        // acceleration phase
        x - (1.0 - (-x).exp())
    } else {
        // tail: the acceleration ended here, simple viscous drag remains
        let start = (-1.0f64).exp();
        let expx = 1.0 - (-(x - 1.0)).exp();
        start + expx * (1.0 - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let mut p = PulseEaser::new(4.0);
        assert_eq!(p.ease(0.0), 0.0);
        assert_eq!(p.ease(1.0), 1.0);
    }

    #[test]
    fn clamps_outside_domain() {
        let mut p = PulseEaser::new(4.0);
        assert_eq!(p.ease(-0.5), 0.0);
        assert_eq!(p.ease(1.5), 1.0);
    }

    #[test]
    fn monotonically_non_decreasing() {
        let mut p = PulseEaser::new(4.0);
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = p.ease(f64::from(i) / 100.0);
            assert!(v >= prev, "dipped at i={i}: {v} < {prev}");
            assert!((0.0..=1.0).contains(&v));
            prev = v;
        }
    }

    #[test]
    fn approaches_one_near_the_end() {
        // Normalization guarantees the curve actually spans the full range.
        let mut p = PulseEaser::new(4.0);
        assert!(p.ease(0.999) > 0.99);
    }
}
