//! Two-sided Mann-Whitney U rank-sum test.
//!
//! Normal approximation with average ranks for ties, the tie variance
//! correction and a 0.5 continuity correction. The reported statistic is U
//! for the first sample. Exact small-sample p-values are not computed;
//! window counts in practice are far past the regime where that matters.

use anyhow::{anyhow, Result};
use statrs::distribution::{ContinuousCDF, Normal};

#[derive(Debug, Clone, Copy)]
pub struct RankSumTest {
    /// U statistic of the first sample.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Average ranks (1-based) of the combined sample, plus the tie term
/// `sum(t^3 - t)` over tie groups.
fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j share the average of ranks i+1 ..= j+1.
        let avg = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }
    (ranks, tie_term)
}

/// Two-sided Mann-Whitney U test of `x` against `y`.
///
/// Errors on an empty sample. With zero variance (all values tied across
/// both samples) the p-value is 1.0.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<RankSumTest> {
    let n1 = x.len();
    let n2 = y.len();
    if n1 == 0 || n2 == 0 {
        return Err(anyhow!("rank-sum test requires two non-empty samples"));
    }

    let combined: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let (ranks, tie_term) = average_ranks(&combined);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    let n = (n1 + n2) as f64;
    let mu = (n1 * n2) as f64 / 2.0;
    let var = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    if var <= 0.0 {
        return Ok(RankSumTest {
            statistic: u1,
            p_value: 1.0,
        });
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| anyhow!("normal distribution: {}", e))?;
    let z = (u1.max(u2) - mu - 0.5) / var.sqrt();
    let p = (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0);

    Ok(RankSumTest {
        statistic: u1,
        p_value: p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tie_free_hand_computed() {
        // x ranks 1-3, y ranks 4-6: U1 = 0, U2 = 9, mu = 4.5,
        // var = 9 * 7 / 12 = 5.25, z = (9 - 4.5 - 0.5) / sqrt(5.25),
        // p = 2 * sf(1.74574...) ~= 0.0809.
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        let t = mann_whitney_u(&x, &y).unwrap();
        assert_relative_eq!(t.statistic, 0.0);
        assert_relative_eq!(t.p_value, 0.0809, epsilon = 1e-3);
    }

    #[test]
    fn test_symmetry_of_p() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        let a = mann_whitney_u(&x, &y).unwrap();
        let b = mann_whitney_u(&y, &x).unwrap();
        assert_relative_eq!(a.p_value, b.p_value);
        assert_relative_eq!(a.statistic + b.statistic, 9.0);
    }

    #[test]
    fn test_all_tied_is_one() {
        let x = [2.0, 2.0, 2.0];
        let y = [2.0, 2.0];
        let t = mann_whitney_u(&x, &y).unwrap();
        assert_relative_eq!(t.p_value, 1.0);
        // Average ranks make U1 = n1*n2/2.
        assert_relative_eq!(t.statistic, 3.0);
    }

    #[test]
    fn test_clear_separation_is_small() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let t = mann_whitney_u(&x, &y).unwrap();
        assert!(t.p_value < 1e-6);
        assert_relative_eq!(t.statistic, 0.0);
    }

    #[test]
    fn test_partial_ties_use_average_ranks() {
        let x = [1.0, 2.0, 2.0];
        let y = [2.0, 3.0];
        // Ranks: 1, (2+3+4)/3 = 3 for each 2.0, 5. R1 = 1 + 3 + 3 = 7,
        // U1 = 7 - 6 = 1.
        let t = mann_whitney_u(&x, &y).unwrap();
        assert_relative_eq!(t.statistic, 1.0);
        assert!(t.p_value > 0.0 && t.p_value <= 1.0);
    }

    #[test]
    fn test_empty_sample_errors() {
        assert!(mann_whitney_u(&[], &[1.0]).is_err());
    }
}
