//! Pairwise-difference nucleotide diversity (pi).

use crate::genotype::Genotype;
use crate::site::Site;

/// Difference fraction between two genotypes under the all-copies
/// comparison: every copy of `a` is compared against every copy of `b`, and
/// the mismatch count is divided by the number of comparisons
/// (`ploidy_a * ploidy_b`). A fully divergent diploid pair (e.g. `0/0` vs
/// `1/1`) scores 1.0.
///
/// This is deliberately not the phase-free genotype distance: a het/het pair
/// (`0/1` vs `0/1`) scores 2/4 = 0.5 even though the genotypes are
/// identical.
fn pair_diff_fraction(a: &Genotype, b: &Genotype) -> f64 {
    let comparisons = a.ploidy() * b.ploidy();
    if comparisons == 0 {
        return 0.0;
    }
    let mut mismatches = 0usize;
    for x in a.alleles() {
        for y in b.alleles() {
            if x != y {
                mismatches += 1;
            }
        }
    }
    mismatches as f64 / comparisons as f64
}

/// Compute (pi, contributing-site count) for one window's sites.
///
/// For each site and each unordered sample pair, the pair is skipped when
/// either genotype carries a missing copy; valid pairs contribute their
/// [difference fraction](pair_diff_fraction). A site counts as contributing
/// as soon as at least one pair is valid, and its total is the plain sum
/// over valid pairs — it is NOT renormalized by how many pairs were valid,
/// while the window denominator always uses C(n, 2) over the full sample
/// count. Sites with partial missingness are therefore pulled toward zero
/// relative to fully genotyped sites; this asymmetry is intentional and
/// kept from the method this estimator reproduces.
///
/// Returns (0.0, 0) for fewer than two samples or when no site contributed.
pub fn window_pi(sites: &[Site], n_samples: usize) -> (f64, usize) {
    if n_samples < 2 {
        return (0.0, 0);
    }
    let total_pairs = (n_samples * (n_samples - 1)) as f64 / 2.0;

    let mut contributing_sites = 0usize;
    let mut total_diff = 0.0f64;

    for site in sites {
        let mut site_diff = 0.0f64;
        let mut valid_pairs = 0usize;

        for i in 0..n_samples {
            for j in (i + 1)..n_samples {
                let gi = &site.genotypes[i];
                let gj = &site.genotypes[j];
                if gi.has_missing() || gj.has_missing() {
                    continue;
                }
                site_diff += pair_diff_fraction(gi, gj);
                valid_pairs += 1;
            }
        }

        if valid_pairs > 0 {
            total_diff += site_diff;
            contributing_sites += 1;
        }
    }

    if contributing_sites == 0 {
        return (0.0, 0);
    }
    let pi = total_diff / (contributing_sites as f64 * total_pairs);
    (pi, contributing_sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn site(tokens: &[&str]) -> Site {
        Site {
            pos: 1,
            ref_allele: "A".to_string(),
            alt_allele: "T".to_string(),
            genotypes: tokens.iter().map(|t| Genotype::from_token(t)).collect(),
        }
    }

    #[test]
    fn test_fully_divergent_pair_is_one() {
        // 0/0 vs 1/1: 4 of 4 cross-copy comparisons mismatch.
        let sites = vec![site(&["0/0", "1/1"])];
        let (pi, n) = window_pi(&sites, 2);
        assert_relative_eq!(pi, 1.0);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_identical_genotypes_are_zero() {
        let sites = vec![site(&["0/1", "0/1"]), site(&["1/1", "1/1"])];
        // 0/1 vs 0/1 is NOT zero under all-copies comparison; use hom sites.
        let hom = vec![site(&["0/0", "0/0"]), site(&["1/1", "1/1"])];
        let (pi, n) = window_pi(&hom, 2);
        assert_relative_eq!(pi, 0.0);
        assert_eq!(n, 2);
        // And the het/het case documents the cruder semantic: 2/4 = 0.5.
        let (pi_het, _) = window_pi(&sites[..1], 2);
        assert_relative_eq!(pi_het, 0.5);
    }

    #[test]
    fn test_missing_pair_skipped() {
        // Three samples; sample 2 missing, so only the (0, 1) pair is valid.
        // Site still contributes, total stays the raw sum over valid pairs,
        // denominator stays C(3, 2) = 3.
        let sites = vec![site(&["0/0", "1/1", "./."])];
        let (pi, n) = window_pi(&sites, 3);
        assert_eq!(n, 1);
        assert_relative_eq!(pi, 1.0 / 3.0);
    }

    #[test]
    fn test_all_missing_site_does_not_contribute() {
        let sites = vec![site(&["./.", "./."]), site(&["0/0", "1/1"])];
        let (pi, n) = window_pi(&sites, 2);
        assert_eq!(n, 1);
        assert_relative_eq!(pi, 1.0);
    }

    #[test]
    fn test_single_sample_undefined() {
        let sites = vec![site(&["0/1"])];
        assert_eq!(window_pi(&sites, 1), (0.0, 0));
    }

    #[test]
    fn test_empty_window() {
        assert_eq!(window_pi(&[], 4), (0.0, 0));
    }

    #[test]
    fn test_haploid_calls() {
        // Haploid fallback tokens: 1 vs 0 -> 1 mismatch over 1 comparison.
        let sites = vec![site(&["0", "1"])];
        let (pi, n) = window_pi(&sites, 2);
        assert_relative_eq!(pi, 1.0);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_pi_non_negative_mixed_window() {
        let sites = vec![
            site(&["0/0", "0/1", "1/1"]),
            site(&["0/0", "0/0", "./."]),
            site(&["0/1", "0/1", "0/1"]),
        ];
        let (pi, n) = window_pi(&sites, 3);
        assert!(pi >= 0.0);
        assert_eq!(n, 3);
    }
}
