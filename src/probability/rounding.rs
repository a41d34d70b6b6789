//! Percentage rounding: 2-decimal accumulation rounding and the optional
//! nearest-0.5 presentation pass. Ties round to even.

use indexmap::IndexMap;
use log::trace;

pub const PERCENT_DECIMALS: i32 = 2;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round to [PERCENT_DECIMALS] places. Applied at every accumulation step.
pub fn round2(value: f64) -> f64 {
    round_to(value, PERCENT_DECIMALS)
}

/// Snap to the nearest 0.5.
pub fn snap_to_half(value: f64) -> f64 {
    (value * 2.0).round_ties_even() / 2.0
}

/// A result document entry that carries a percentage map.
pub trait PercentageTable {
    fn percentages_mut(&mut self) -> &mut IndexMap<String, f64>;
}

/// Presentation pass: snap every leaf percentage of every container to the nearest 0.5.
pub fn snap_percentages<T: PercentageTable>(results: &mut IndexMap<String, T>) {
    for (container, result) in results.iter_mut() {
        for (key, value) in result.percentages_mut().iter_mut() {
            let snapped = snap_to_half(*value);
            trace!("{container}: snapping {key} {value} -> {snapped}");
            *value = snapped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn round2_breaks_exact_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn snap_to_half_picks_nearest_half() {
        assert_eq!(snap_to_half(37.3), 37.5);
        assert_eq!(snap_to_half(37.2), 37.0);
        assert_eq!(snap_to_half(37.75), 38.0);
        assert_eq!(snap_to_half(100.0), 100.0);
    }

    #[test]
    fn snap_to_half_breaks_ties_to_even() {
        assert_eq!(snap_to_half(37.25), 37.0);
        assert_eq!(snap_to_half(0.75), 1.0);
    }
}
