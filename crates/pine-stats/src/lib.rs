//! pine-stats: effective-population-size (Ne) ratio statistics.
//!
//! Consumes a long table of windowed pi and divergence values keyed by
//! (species, chromosome type) and derives, per species and focus chromosome
//! type:
//! - the ratio of Ne relative to the species' autosomes,
//!   `R = (pi_Q / pi_A) * (div_A / div_Q)`
//! - propagated standard errors for R, both delta-method (group standard
//!   deviations) and block-based (jackknife-style block means)
//! - pairwise two-sided Mann-Whitney rank-sum tests on window-level Ne
//!   ratios between species
//!
//! No multiple-testing correction is applied.

pub mod ranksum;
pub mod ratio;
pub mod table;

use anyhow::Result;
use std::collections::BTreeSet;

pub use ranksum::{mann_whitney_u, RankSumTest};
pub use ratio::{aggregate, block_se, ne_ratio, window_ne_ratios, GroupStats, NeRatio};
pub use table::{load_windows, WindowRow};

/// Analysis settings; defaults mirror the great-ape X/Y/MT study the tool
/// was written for.
#[derive(Debug, Clone)]
pub struct NeConfig {
    /// Block count for the block-based standard error.
    pub n_blocks: usize,
    /// chr_type label of the autosomal baseline group.
    pub autosome: String,
    /// chr_type labels to compare against the baseline, in output order.
    pub focus: Vec<String>,
}

impl Default for NeConfig {
    fn default() -> Self {
        NeConfig {
            n_blocks: 20,
            autosome: "Autosome".to_string(),
            focus: vec!["X".to_string(), "Y".to_string(), "MT".to_string()],
        }
    }
}

/// One pairwise rank-sum comparison of window-level Ne ratios.
#[derive(Debug, Clone)]
pub struct PairTest {
    pub chr_type: String,
    pub species1: String,
    pub species2: String,
    pub n1: usize,
    pub n2: usize,
    pub statistic: f64,
    pub p_value: f64,
}

/// Full analysis output: the ratio/SE table and the rank-sum table.
#[derive(Debug, Clone, Default)]
pub struct NeReport {
    pub ratios: Vec<NeRatio>,
    pub tests: Vec<PairTest>,
}

/// Run the full Ne-ratio analysis over a windows table.
///
/// Species are discovered from the data (sorted). Groups missing either the
/// focus or the autosome side of a ratio are skipped rather than failing,
/// so a partial input still yields the rows it can support.
pub fn analyze(rows: &[WindowRow], config: &NeConfig) -> Result<NeReport> {
    let species: Vec<String> = rows
        .iter()
        .map(|r| r.species.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let stats = aggregate(rows, config.n_blocks);

    let mut ratios = Vec::new();
    for sp in &species {
        for chr_type in &config.focus {
            let q = stats.get(&(sp.clone(), chr_type.clone()));
            let a = stats.get(&(sp.clone(), config.autosome.clone()));
            if let (Some(q), Some(a)) = (q, a) {
                ratios.push(ne_ratio(sp, chr_type, q, a));
            }
        }
    }

    let per_group = window_ne_ratios(rows, &species, &config.focus, &config.autosome);

    let mut tests = Vec::new();
    for chr_type in &config.focus {
        for (i, sp1) in species.iter().enumerate() {
            for sp2 in &species[i + 1..] {
                let x = per_group.get(&(sp1.clone(), chr_type.clone()));
                let y = per_group.get(&(sp2.clone(), chr_type.clone()));
                let (Some(x), Some(y)) = (x, y) else { continue };
                if x.is_empty() || y.is_empty() {
                    continue;
                }
                let test = mann_whitney_u(x, y)?;
                tests.push(PairTest {
                    chr_type: chr_type.clone(),
                    species1: sp1.clone(),
                    species2: sp2.clone(),
                    n1: x.len(),
                    n2: y.len(),
                    statistic: test.statistic,
                    p_value: test.p_value,
                });
            }
        }
    }

    Ok(NeReport { ratios, tests })
}
