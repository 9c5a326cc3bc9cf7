//! Similarity-weighted growth synthesis for a single skill row

use super::benchmarks::BenchmarkTable;
use crate::skills::BenchmarkLink;

/// Synthesized growth for one row, with what had to fall back
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthEstimate {
    /// Annual growth in percentage points per year
    pub growth_pts: f64,

    /// True when no association had positive similarity
    pub used_fallback: bool,

    /// Weighted benchmark names missing from the table (`None` = unnamed)
    pub unmatched: Vec<Option<String>>,
}

/// Weighted average of benchmark growth rates, weights = similarities
///
/// Associations with similarity <= 0 are ignored. A weighted benchmark that is
/// not in the table contributes the table's fallback rate. With no positive
/// similarity at all the result is exactly the fallback.
pub fn synthesize_growth(links: &[BenchmarkLink], table: &BenchmarkTable) -> GrowthEstimate {
    let mut weighted_sum = 0.0;
    let mut total_similarity = 0.0;
    let mut unmatched = Vec::new();

    for link in links.iter().filter(|l| l.similarity > 0.0) {
        let rate = match link.name.as_deref().and_then(|name| table.rate(name)) {
            Some(rate) => rate,
            None => {
                unmatched.push(link.name.clone());
                table.fallback()
            }
        };
        weighted_sum += link.similarity * rate;
        total_similarity += link.similarity;
    }

    if total_similarity > 0.0 {
        GrowthEstimate {
            growth_pts: weighted_sum / total_similarity,
            used_fallback: false,
            unmatched,
        }
    } else {
        GrowthEstimate {
            growth_pts: table.fallback(),
            used_fallback: true,
            unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn link(name: &str, similarity: f64) -> BenchmarkLink {
        BenchmarkLink::new(Some(name), Some(similarity))
    }

    #[test]
    fn test_equal_weights_average_rates() {
        let table = BenchmarkTable::new([("alpha", 10.0), ("beta", 20.0)], 9.0);
        let estimate = synthesize_growth(&[link("alpha", 0.5), link("beta", 0.5)], &table);
        assert_relative_eq!(estimate.growth_pts, 15.0);
        assert!(!estimate.used_fallback);
        assert!(estimate.unmatched.is_empty());
    }

    #[test]
    fn test_no_positive_similarity_is_exact_fallback() {
        let table = BenchmarkTable::default();
        let links = vec![
            link("HumanEval", 0.0),
            BenchmarkLink::new(Some("MATH"), Some(f64::NAN)),
            link("MMLU", -1.0),
        ];
        let estimate = synthesize_growth(&links, &table);
        assert_eq!(estimate.growth_pts, 9.0);
        assert!(estimate.used_fallback);

        let empty = synthesize_growth(&[], &table);
        assert_eq!(empty.growth_pts, 9.0);
        assert!(empty.used_fallback);
    }

    #[test]
    fn test_single_benchmark_takes_its_rate() {
        let table = BenchmarkTable::default();
        let estimate = synthesize_growth(&[link("HumanEval", 0.8)], &table);
        assert_relative_eq!(estimate.growth_pts, 16.2, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_benchmark_weighs_in_at_fallback() {
        let table = BenchmarkTable::new([("alpha", 20.0)], 10.0);
        let estimate = synthesize_growth(&[link("alpha", 0.5), link("gamma", 0.5)], &table);
        assert_relative_eq!(estimate.growth_pts, 15.0);
        assert_eq!(estimate.unmatched, vec![Some("gamma".to_string())]);
    }
}
