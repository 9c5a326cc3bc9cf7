//! Year-indexed series and percentile bands

use serde::{Deserialize, Serialize};

/// Ordered mapping from calendar year to a value, for a contiguous year range
///
/// Every per-year quantity in the pipeline lives in one of these; column
/// names are only built when a table is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries<T> {
    start_year: i32,
    values: Vec<T>,
}

impl<T> YearSeries<T> {
    /// Build a series for `start_year..=end_year` from a per-year function
    pub fn from_fn<F>(start_year: i32, end_year: i32, mut f: F) -> Self
    where
        F: FnMut(i32) -> T,
    {
        Self {
            start_year,
            values: (start_year..=end_year).map(&mut f).collect(),
        }
    }

    /// Wrap values already ordered by year, the first belonging to `start_year`
    pub fn from_values(start_year: i32, values: Vec<T>) -> Self {
        Self { start_year, values }
    }

    pub fn get(&self, year: i32) -> Option<&T> {
        if year < self.start_year {
            return None;
        }
        self.values.get((year - self.start_year) as usize)
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.start_year + i as i32)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> + '_ {
        self.years().zip(self.values.iter())
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Median with the 5th/95th percentile band of one sampled quantity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Band {
    pub median: f64,
    pub p05: f64,
    pub p95: f64,
}

impl Band {
    pub fn new(median: f64, p05: f64, p95: f64) -> Self {
        Self { median, p05, p95 }
    }

    /// Degenerate band with all three variants equal
    pub fn point(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Multiply every variant by the same factor
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.median * factor, self.p05 * factor, self.p95 * factor)
    }

    /// p05 <= median <= p95
    pub fn is_ordered(&self) -> bool {
        self.p05 <= self.median && self.median <= self.p95
    }

    /// All three variants in [lo, hi]
    pub fn within(&self, lo: f64, hi: f64) -> bool {
        [self.median, self.p05, self.p95]
            .iter()
            .all(|v| (lo..=hi).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_lookup_by_year() {
        let series = YearSeries::from_fn(2024, 2027, |y| (y - 2024) as f64 * 0.1);

        assert_eq!(series.len(), 4);
        assert_eq!(series.get(2024), Some(&0.0));
        assert_eq!(series.get(2026), Some(&0.2));
        assert_eq!(series.get(2023), None);
        assert_eq!(series.get(2028), None);
        assert_eq!(series.years().collect::<Vec<_>>(), vec![2024, 2025, 2026, 2027]);
    }

    #[test]
    fn test_band_scale_and_order() {
        let band = Band::new(0.5, 0.4, 0.6).scale(0.5);
        assert_eq!(band, Band::new(0.25, 0.2, 0.3));
        assert!(band.is_ordered());
        assert!(band.within(0.0, 1.0));
        assert!(!Band::new(0.5, 0.6, 0.7).is_ordered());
    }
}
