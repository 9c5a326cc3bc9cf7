//! Percentiles over sorted samples
//!
//! Linear interpolation between closest ranks: for `n` sorted values the
//! q-th percentile sits at fractional rank `q / 100 * (n - 1)`.

/// q-th percentile (0..=100) of ascending `sorted` values; NaN when empty
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    percentile_mapped(sorted, q, |v| v)
}

/// q-th percentile of `map(sorted[i])`, for a non-decreasing `map`
///
/// A non-decreasing map preserves the sample order, so the mapped values never
/// need re-sorting. Only the two neighbouring ranks are mapped.
pub fn percentile_mapped<F>(sorted: &[f64], q: f64, map: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;

    let a = map(sorted[lo]);
    let b = map(sorted[hi]);
    // Clamp keeps the result inside its segment so percentiles stay monotone in q
    (a + (b - a) * frac).max(a).min(b)
}
