use foundation::math::stable_total_cmp_f64;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

pub struct Statistics;

impl Statistics {
    /// Finite values only, ascending.
    pub fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
        let mut out: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        out.sort_by(|a, b| stable_total_cmp_f64(*a, *b));
        out
    }

    /// `p`-quantile of an ascending slice, interpolating linearly between the
    /// two nearest order statistics (R-7 / D3 convention).
    pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
        let first = *sorted.first()?;
        if p.is_nan() {
            return None;
        }
        let n = sorted.len();
        if p <= 0.0 || n < 2 {
            return Some(first);
        }
        if p >= 1.0 {
            return Some(sorted[n - 1]);
        }
        let i = (n - 1) as f64 * p;
        let i0 = i.floor() as usize;
        let v0 = sorted[i0];
        let v1 = sorted[i0 + 1];
        Some(v0 + (v1 - v0) * (i - i0 as f64))
    }

    /// Up to roughly `count` "nice" values (1, 2 or 5 × 10ⁿ apart) covering
    /// `[start, stop]`.
    pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
        let count = count as f64;
        if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = stop < start;
        let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
        let (i1, i2, inc) = tick_spec(lo, hi, count);
        if !(i2 >= i1) {
            return Vec::new();
        }

        let n = (i2 - i1) as usize + 1;
        let value = |k: f64| if inc < 0.0 { k / -inc } else { k * inc };
        let mut out: Vec<f64> = (0..n).map(|i| value(i1 + i as f64)).collect();
        if reverse {
            out.reverse();
        }
        out
    }

    /// Distance between consecutive values returned by [`Statistics::ticks`].
    pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
        let reverse = stop < start;
        let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
        let (_, _, inc) = tick_spec(lo, hi, count as f64);
        let step = if inc < 0.0 { 1.0 / -inc } else { inc };
        if reverse { -step } else { step }
    }
}

fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Returns `(i1, i2, inc)`: ticks are `i * inc` for `i` in `i1..=i2`, or
/// `i / -inc` when `inc` is negative (keeps decimal steps exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = js_round(start * inv);
        i2 = js_round(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let fwd = 10f64.powf(power) * factor;
        i1 = js_round(start / fwd);
        i2 = js_round(stop / fwd);
        if i1 * fwd < start {
            i1 += 1.0;
        }
        if i2 * fwd > stop {
            i2 -= 1.0;
        }
        inc = fwd;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

#[cfg(test)]
mod tests {
    use super::Statistics;
    use pretty_assertions::assert_eq;

    #[test]
    fn sorted_finite_drops_nan() {
        let v = Statistics::sorted_finite([3.0, f64::NAN, -0.0, 1.0, f64::INFINITY]);
        assert_eq!(v, vec![-0.0, 1.0, 3.0]);
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let v: Vec<f64> = (0..=100).map(f64::from).collect();
        assert_eq!(Statistics::quantile_sorted(&v, 0.99), Some(99.0));

        let v = [0.02, 0.03, 1.2, 2.5, 2.7, 2.9, 3.1, 45.5, 50.0, 60.0];
        let q = Statistics::quantile_sorted(&v, 0.99).unwrap();
        assert!((q - 59.1).abs() < 1e-9, "q = {q}");
    }

    #[test]
    fn quantile_edge_cases() {
        assert_eq!(Statistics::quantile_sorted(&[], 0.99), None);
        assert_eq!(Statistics::quantile_sorted(&[4.0], 0.99), Some(4.0));
        assert_eq!(Statistics::quantile_sorted(&[1.0, 2.0], 0.0), Some(1.0));
        assert_eq!(Statistics::quantile_sorted(&[1.0, 2.0], 1.0), Some(2.0));
        assert_eq!(Statistics::quantile_sorted(&[1.0, 2.0], f64::NAN), None);
    }

    #[test]
    fn unit_interval_in_tenths() {
        let t = Statistics::ticks(0.0, 1.0, 10);
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[3], 0.3);
        assert_eq!(t[10], 1.0);
        assert_eq!(Statistics::tick_step(0.0, 1.0, 10), 0.1);
    }

    #[test]
    fn nice_ticks_stay_inside_the_domain() {
        assert_eq!(
            Statistics::ticks(0.0, 59.1, 5),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]
        );
        assert_eq!(Statistics::tick_step(0.0, 59.1, 5), 10.0);
        assert_eq!(
            Statistics::ticks(0.0, 23.4, 5),
            vec![0.0, 5.0, 10.0, 15.0, 20.0]
        );
        assert_eq!(Statistics::ticks(0.0, 1.7, 5), vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn degenerate_tick_requests() {
        assert_eq!(Statistics::ticks(2.0, 2.0, 5), vec![2.0]);
        assert!(Statistics::ticks(0.0, 1.0, 0).is_empty());
        assert_eq!(Statistics::ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
    }
}
