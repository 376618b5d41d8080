//! Time-to-value easing curves.

use std::time::Duration;

/// Ease-in-out quadratic.
///
/// `t` is elapsed time, `b` the start value, `c` the total change and `d`
/// the duration (same unit as `t`).  Accelerates through the first half,
/// decelerates through the second, zero velocity at both ends.
pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

/// Sample the curve between `from` and `to` after `elapsed` of `duration`.
/// `elapsed` is clamped to `[0, duration]`; a zero duration yields `to`.
pub fn sample(from: f64, to: f64, elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return to;
    }
    let t = millis(elapsed.min(duration));
    let d = millis(duration);
    ease_in_out_quad(t, from, to - from, d)
}

fn millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn midpoint_bisects_start_and_target() {
        assert_eq!(ease_in_out_quad(350.0, 1000.0, -1000.0, 700.0), 500.0);
        assert_eq!(sample(1000.0, 0.0, ms(350), ms(700)), 500.0);
        assert_eq!(sample(0.0, 80.0, ms(100), ms(200)), 40.0);
    }

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(sample(1000.0, 0.0, ms(0), ms(700)), 1000.0);
        assert_eq!(sample(1000.0, 0.0, ms(700), ms(700)), 0.0);
        // Past the end clamps to the target.
        assert_eq!(sample(1000.0, 0.0, ms(5000), ms(700)), 0.0);
    }

    #[test]
    fn monotonic_when_moving_forward() {
        let mut prev = f64::MIN;
        for t in 0..=700 {
            let v = sample(10.0, 900.0, ms(t), ms(700));
            assert!(v >= prev, "t={t}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn symmetric_about_midpoint() {
        let (b, target, d) = (0.0, 600.0, 700u64);
        for t in 0..=d {
            let left = sample(b, target, ms(t), ms(d)) - b;
            let right = target - sample(b, target, ms(d - t), ms(d));
            assert!((left - right).abs() < 1e-9, "t={t}: {left} vs {right}");
        }
    }

    #[test]
    fn no_change_when_already_at_target() {
        for t in [0, 1, 123, 350, 699, 700] {
            assert_eq!(sample(42.0, 42.0, ms(t), ms(700)), 42.0);
        }
    }

    #[test]
    fn zero_duration_jumps() {
        assert_eq!(sample(1000.0, 3.0, ms(0), Duration::ZERO), 3.0);
    }
}
