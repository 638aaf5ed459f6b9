//! Congestion ratio calculation.

use venuepulse_core::config::congestion::HourWeightingConfig;
use venuepulse_core::error::AppError;
use venuepulse_core::result::AppResult;

/// Raw occupancy ratio, clamped to [0.0, 1.0].
///
/// Returns 0.0 for any non-positive capacity rather than dividing by zero.
pub fn ratio(current_count: i64, max_capacity: i64) -> f64 {
    if max_capacity <= 0 {
        return 0.0;
    }
    (current_count as f64 / max_capacity as f64).clamp(0.0, 1.0)
}

/// Hour-of-day weighting applied to the raw ratio.
///
/// The policy is chosen once at construction from configuration. Older
/// deployments disagreed on whether weighting should exist at all, so it is
/// an explicit toggle rather than a silent default.
#[derive(Debug, Clone, PartialEq)]
pub enum HourWeightPolicy {
    /// Report the raw ratio unchanged.
    Disabled,
    /// Multiply the raw ratio by the weight for the given hour.
    Table([f64; 24]),
}

impl HourWeightPolicy {
    /// Build a policy from configuration.
    ///
    /// Fails if weighting is enabled with a table that is not exactly 24
    /// entries long.
    pub fn from_config(config: &HourWeightingConfig) -> AppResult<Self> {
        if !config.enabled {
            return Ok(Self::Disabled);
        }

        let table: [f64; 24] = config.table.as_slice().try_into().map_err(|_| {
            AppError::configuration(format!(
                "hour_weighting.table must have 24 entries, got {}",
                config.table.len()
            ))
        })?;
        Ok(Self::Table(table))
    }

    /// The multiplier for a given hour (1.0 when disabled).
    pub fn weight(&self, hour: u32) -> f64 {
        match self {
            Self::Disabled => 1.0,
            Self::Table(table) => table[hour as usize % 24],
        }
    }
}

/// Capability interface for congestion calculation.
///
/// The concrete implementation is bound at construction time; callers never
/// inspect or downcast at the call site.
pub trait CongestionEstimator: Send + Sync {
    /// Compute the congestion ratio for the given counts at the given hour.
    fn calculate(&self, current_count: i64, max_capacity: i64, hour: u32) -> f64;
}

/// The shipped estimator: raw ratio, optionally hour-weighted, clamped.
#[derive(Debug, Clone)]
pub struct RealTimeEstimator {
    /// Hour weighting policy.
    policy: HourWeightPolicy,
}

impl RealTimeEstimator {
    /// Create an estimator with the given policy.
    pub fn new(policy: HourWeightPolicy) -> Self {
        Self { policy }
    }
}

impl CongestionEstimator for RealTimeEstimator {
    fn calculate(&self, current_count: i64, max_capacity: i64, hour: u32) -> f64 {
        if max_capacity <= 0 {
            return 0.0;
        }
        let base = current_count as f64 / max_capacity as f64;
        (base * self.policy.weight(hour)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_or_negative_capacity_yields_zero() {
        assert_eq!(ratio(10, 0), 0.0);
        assert_eq!(ratio(10, -5), 0.0);
        let est = RealTimeEstimator::new(HourWeightPolicy::Disabled);
        assert_eq!(est.calculate(10, 0, 12), 0.0);
    }

    #[test]
    fn test_ratio_is_clamped_to_unit_interval() {
        // 45 of 50 → 0.9; five more entries → 1.0; one past capacity stays 1.0.
        assert!((ratio(45, 50) - 0.9).abs() < f64::EPSILON);
        assert!((ratio(50, 50) - 1.0).abs() < f64::EPSILON);
        assert_eq!(ratio(51, 50), 1.0);
    }

    #[test]
    fn test_ratio_monotone_in_count_and_capacity() {
        for c in 0..100 {
            assert!(ratio(c, 50) <= ratio(c + 1, 50));
        }
        for m in 1..100 {
            assert!(ratio(30, m) >= ratio(30, m + 1));
        }
    }

    #[test]
    fn test_ratio_stays_in_bounds() {
        for c in 0..200 {
            for m in 1..80 {
                let r = ratio(c, m);
                assert!((0.0..=1.0).contains(&r), "ratio({c}, {m}) = {r}");
            }
        }
    }

    #[test]
    fn test_hour_weighting_multiplies_and_clamps() {
        let mut table = [1.0; 24];
        table[18] = 1.5;
        table[3] = 0.5;
        let est = RealTimeEstimator::new(HourWeightPolicy::Table(table));

        // 0.6 * 1.5 = 0.9
        assert!((est.calculate(30, 50, 18) - 0.9).abs() < 1e-9);
        // 0.6 * 0.5 = 0.3
        assert!((est.calculate(30, 50, 3) - 0.3).abs() < 1e-9);
        // 0.9 * 1.5 = 1.35 → clamped
        assert_eq!(est.calculate(45, 50, 18), 1.0);
    }

    #[test]
    fn test_disabled_policy_reports_raw_ratio() {
        let est = RealTimeEstimator::new(HourWeightPolicy::Disabled);
        for hour in 0..24 {
            assert!((est.calculate(45, 50, hour) - 0.9).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_policy_from_config_rejects_short_table() {
        let config = HourWeightingConfig {
            enabled: true,
            table: vec![1.0; 23],
        };
        assert!(HourWeightPolicy::from_config(&config).is_err());

        let config = HourWeightingConfig {
            enabled: true,
            table: vec![1.0; 24],
        };
        assert!(HourWeightPolicy::from_config(&config).is_ok());
    }

    #[test]
    fn test_policy_from_config_disabled_ignores_table() {
        let config = HourWeightingConfig {
            enabled: false,
            table: vec![],
        };
        assert_eq!(
            HourWeightPolicy::from_config(&config).expect("should build"),
            HourWeightPolicy::Disabled
        );
    }
}
