//! Capacity alert edge detection.

use venuepulse_congestion::ratio;

/// Whether the occupancy ratio crossed the alert threshold from below.
///
/// Fires only on the upward edge: the previous count must sit strictly
/// below the threshold and the new count at or above it. Staying above the
/// threshold does not re-fire, so a space filling past its alert line
/// produces exactly one notification.
pub fn crossed_threshold(
    previous_count: i64,
    current_count: i64,
    max_capacity: i64,
    threshold: f64,
) -> bool {
    if max_capacity <= 0 {
        return false;
    }
    ratio(previous_count, max_capacity) < threshold
        && ratio(current_count, max_capacity) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_exactly_on_upward_crossing() {
        // 39/50 = 0.78 → 40/50 = 0.8 crosses the 0.8 line.
        assert!(crossed_threshold(39, 40, 50, 0.8));
        // Already above: 40 → 41 must not re-fire.
        assert!(!crossed_threshold(40, 41, 50, 0.8));
        // Still below: 30 → 31 must not fire.
        assert!(!crossed_threshold(30, 31, 50, 0.8));
    }

    #[test]
    fn test_downward_movement_never_fires() {
        assert!(!crossed_threshold(41, 40, 50, 0.8));
        assert!(!crossed_threshold(40, 39, 50, 0.8));
    }

    #[test]
    fn test_unknown_capacity_never_fires() {
        assert!(!crossed_threshold(39, 40, 0, 0.8));
        assert!(!crossed_threshold(39, 40, -1, 0.8));
    }

    #[test]
    fn test_large_jump_over_threshold_fires_once() {
        // A batch apply that skips the exact threshold value still fires.
        assert!(crossed_threshold(10, 45, 50, 0.8));
    }
}
