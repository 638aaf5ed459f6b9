//! Congestion estimator configuration.

use serde::{Deserialize, Serialize};

/// Settings for congestion ratio calculation and smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionConfig {
    /// Hour-of-day weighting policy.
    #[serde(default)]
    pub hour_weighting: HourWeightingConfig,
    /// Smoothing factor for the exponential moving average.
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,
}

impl Default for CongestionConfig {
    fn default() -> Self {
        Self {
            hour_weighting: HourWeightingConfig::default(),
            ema_alpha: default_ema_alpha(),
        }
    }
}

/// Hour-of-day weighting of the congestion ratio.
///
/// Disabled by default: the raw occupancy ratio is reported as-is. When
/// enabled, the ratio is multiplied by the weight for the current hour
/// before clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourWeightingConfig {
    /// Whether hour weighting is applied at all.
    #[serde(default)]
    pub enabled: bool,
    /// One multiplier per hour of day, index 0 = midnight.
    #[serde(default = "default_hour_weights")]
    pub table: Vec<f64>,
}

impl Default for HourWeightingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            table: default_hour_weights(),
        }
    }
}

fn default_ema_alpha() -> f64 {
    0.2
}

fn default_hour_weights() -> Vec<f64> {
    vec![
        0.5, 0.4, 0.3, 0.3, 0.4, 0.6, // 00-05
        0.8, 1.1, 1.2, 1.0, 0.8, 0.7, // 06-11
        0.8, 0.8, 0.7, 0.7, 0.9, 1.1, // 12-17
        1.4, 1.5, 1.4, 1.2, 0.9, 0.7, // 18-23
    ]
}
