//! Precision policies.
//!
//! A deterministic float ordering for sorting data columns that may contain
//! NaN and signed zeros.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

#[cfg(test)]
mod tests {
    use super::{canonical_f64, stable_total_cmp_f64};
    use core::cmp::Ordering;

    #[test]
    fn signed_zeros_compare_equal() {
        assert_eq!(canonical_f64(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn sorting_a_column_is_deterministic() {
        let mut column = vec![3.1, f64::NAN, -0.0, 2.5, 0.0, 60.0];
        column.sort_by(|a, b| stable_total_cmp_f64(*a, *b));
        assert_eq!(&column[..5], &[0.0, 0.0, 2.5, 3.1, 60.0]);
        assert!(column[5].is_nan());
    }
}
