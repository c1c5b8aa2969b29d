//! Group aggregation and Ne-ratio error propagation.
//!
//! The ratio of effective population sizes between a focus chromosome type
//! Q and the autosomes A of the same species is estimated as
//! `R = (pi_Q / pi_A) * (div_A / div_Q)`, the diversity ratio corrected for
//! mutation-rate differences via divergence. The relative variance of R is
//! approximated by the sum of the four squared coefficients of variation
//! (delta method for a product/quotient of independent means).

use crate::table::WindowRow;
use std::collections::HashMap;

/// Per-(species, chr_type) summary of the windows table.
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub n: usize,
    pub pi_mean: f64,
    /// Sample standard deviation (ddof 1); NaN when n < 2.
    pub pi_sd: f64,
    pub div_mean: f64,
    pub div_sd: f64,
    /// Block-based standard errors of the mean.
    pub pi_block_se: f64,
    pub div_block_se: f64,
}

/// One row of the output ratio table.
#[derive(Debug, Clone)]
pub struct NeRatio {
    pub species: String,
    pub chr_type: String,
    pub ratio: f64,
    /// Delta-method SE from group standard deviations.
    pub se_delta: f64,
    /// SE from block-based standard errors of the group means.
    pub se_block: f64,
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation with ddof 1; NaN for fewer than two values.
pub fn sd(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

/// Block-based (jackknife-style) standard error of the mean.
///
/// Values are split in input order into chunks of `max(1, len / n_blocks)`;
/// the trailing partial chunk stays its own block. SE is the sample
/// standard deviation of the block means divided by sqrt(#blocks).
pub fn block_se(xs: &[f64], n_blocks: usize) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let block_size = (xs.len() / n_blocks.max(1)).max(1);
    let means: Vec<f64> = xs.chunks(block_size).map(mean).collect();
    sd(&means) / (means.len() as f64).sqrt()
}

/// Aggregate the windows table per (species, chr_type).
pub fn aggregate(
    rows: &[WindowRow],
    n_blocks: usize,
) -> HashMap<(String, String), GroupStats> {
    let mut groups: HashMap<(String, String), (Vec<f64>, Vec<f64>)> = HashMap::new();
    for r in rows {
        let entry = groups
            .entry((r.species.clone(), r.chr_type.clone()))
            .or_default();
        entry.0.push(r.pi);
        entry.1.push(r.div);
    }

    groups
        .into_iter()
        .map(|(key, (pis, divs))| {
            let stats = GroupStats {
                n: pis.len(),
                pi_mean: mean(&pis),
                pi_sd: sd(&pis),
                div_mean: mean(&divs),
                div_sd: sd(&divs),
                pi_block_se: block_se(&pis, n_blocks),
                div_block_se: block_se(&divs, n_blocks),
            };
            (key, stats)
        })
        .collect()
}

fn propagate(ratio: f64, terms: [(f64, f64); 4]) -> f64 {
    let rel_var: f64 = terms
        .iter()
        .map(|(spread, center)| (spread / center) * (spread / center))
        .sum();
    ratio * rel_var.sqrt()
}

/// Ne ratio of a focus group against the species' autosome group, with both
/// SE variants. NaN propagates when a group mean is zero or a spread is
/// undefined.
pub fn ne_ratio(species: &str, chr_type: &str, q: &GroupStats, a: &GroupStats) -> NeRatio {
    let ratio = (q.pi_mean / a.pi_mean) * (a.div_mean / q.div_mean);
    NeRatio {
        species: species.to_string(),
        chr_type: chr_type.to_string(),
        ratio,
        se_delta: propagate(
            ratio,
            [
                (q.pi_sd, q.pi_mean),
                (a.pi_sd, a.pi_mean),
                (a.div_sd, a.div_mean),
                (q.div_sd, q.div_mean),
            ],
        ),
        se_block: propagate(
            ratio,
            [
                (q.pi_block_se, q.pi_mean),
                (a.pi_block_se, a.pi_mean),
                (a.div_block_se, a.div_mean),
                (q.div_block_se, q.div_mean),
            ],
        ),
    }
}

/// Window-level Ne ratios per (species, focus chr_type): each focus window's
/// pi and divergence against the species' autosome means. Windows whose
/// ratio is non-finite (zero divergence, NaN inputs) are dropped.
pub fn window_ne_ratios(
    rows: &[WindowRow],
    species: &[String],
    focus: &[String],
    autosome: &str,
) -> HashMap<(String, String), Vec<f64>> {
    let mut out: HashMap<(String, String), Vec<f64>> = HashMap::new();
    for sp in species {
        let auto: Vec<&WindowRow> = rows
            .iter()
            .filter(|r| &r.species == sp && r.chr_type == autosome)
            .collect();
        if auto.is_empty() {
            continue;
        }
        let pi_a = mean(&auto.iter().map(|r| r.pi).collect::<Vec<_>>());
        let div_a = mean(&auto.iter().map(|r| r.div).collect::<Vec<_>>());

        for r in rows.iter().filter(|r| &r.species == sp) {
            if !focus.contains(&r.chr_type) {
                continue;
            }
            let ne = (r.pi / pi_a) * (div_a / r.div);
            if ne.is_finite() {
                out.entry((sp.clone(), r.chr_type.clone()))
                    .or_default()
                    .push(ne);
            }
        }
    }
    out
}
