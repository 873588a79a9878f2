//! Display helpers for lengths and wastage. Calculation never rounds; these
//! are applied only when a value is shown.

use crate::types::MM_PER_FOOT;
use serde::{Deserialize, Serialize};

/// Feet with two decimals, e.g. `1000.0` -> `"3.28"`.
pub fn mm_to_feet(mm: f64) -> String {
    format!("{:.2}", mm / MM_PER_FOOT)
}

pub fn feet_to_mm(feet: f64) -> f64 {
    feet * MM_PER_FOOT
}

/// Millimetres with three decimals.
pub fn format_mm(mm: f64) -> String {
    format!("{:.3}", mm)
}

/// Wastage rating shown next to a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WastageBand {
    /// Below 5%
    Low,
    /// 5% up to 10%
    Moderate,
    High,
}

impl WastageBand {
    pub fn classify(percent: f64) -> Self {
        if percent < 5.0 {
            WastageBand::Low
        } else if percent < 10.0 {
            WastageBand::Moderate
        } else {
            WastageBand::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(mm_to_feet(1000.0), "3.28");
        assert_eq!(mm_to_feet(3657.6), "12.00");
        assert!((feet_to_mm(16.0) - 4876.8).abs() < 1e-9);
        assert_eq!(format_mm(496.825), "496.825");
    }

    #[test]
    fn test_wastage_bands() {
        assert_eq!(WastageBand::classify(0.0), WastageBand::Low);
        assert_eq!(WastageBand::classify(4.99), WastageBand::Low);
        assert_eq!(WastageBand::classify(5.0), WastageBand::Moderate);
        assert_eq!(WastageBand::classify(12.5), WastageBand::High);
    }
}
