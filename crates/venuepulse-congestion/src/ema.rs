//! Exponential moving average smoothing.

/// Blend a new congestion sample into the running average.
///
/// `alpha` is the weight of the newest sample (0.2 by default from
/// configuration). Used for stable display trends only; the smoothed value
/// never feeds back into ratio calculation.
pub fn apply_ema(previous_ema: f64, new_value: f64, alpha: f64) -> f64 {
    new_value * alpha + previous_ema * (1.0 - alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_blends_towards_new_value() {
        let smoothed = apply_ema(0.5, 1.0, 0.2);
        assert!((smoothed - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_ema_identity_cases() {
        // alpha 0 keeps the old value; alpha 1 takes the new one.
        assert_eq!(apply_ema(0.4, 0.9, 0.0), 0.4);
        assert_eq!(apply_ema(0.4, 0.9, 1.0), 0.9);
        // A steady signal is a fixed point.
        assert!((apply_ema(0.7, 0.7, 0.2) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_ema_converges_under_repeated_samples() {
        let mut value = 0.0;
        for _ in 0..100 {
            value = apply_ema(value, 1.0, 0.2);
        }
        assert!(value > 0.99);
    }
}
