//! Coordinate-window partitioning over one contig's sites.

use crate::diversity::window_pi;
use crate::site::ContigSites;

/// One emitted window: a half-open coordinate interval with its statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub chrom: String,
    pub start: u64,
    /// Always `start + size`, even when no site reaches it.
    pub end: u64,
    pub pi: f64,
    /// Sites in `[start, end)` that produced at least one valid pair.
    pub sites: usize,
}

/// Tile a contig with windows of `size`, advancing by `step` (`step == size`
/// gives non-overlapping tiling; smaller steps overlap).
///
/// The origin is the minimum observed coordinate, and starts are generated
/// while strictly below the maximum observed coordinate — so a contig whose
/// sites share a single coordinate yields no windows, and a site at exactly
/// the maximum coordinate only appears in windows opened earlier. Windows
/// with zero qualifying sites are still emitted here (pi 0.0, sites 0); the
/// caller applies any minimum-site filter.
///
/// `sites` must already be sorted by coordinate.
pub fn contig_windows(contig: &ContigSites, n_samples: usize, size: u64, step: u64) -> Vec<Window> {
    assert!(size > 0 && step > 0, "window size and step must be positive");

    let (min_pos, max_pos) = match (contig.min_pos(), contig.max_pos()) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Vec::new(),
    };

    let mut windows = Vec::new();
    let mut start = min_pos;
    while start < max_pos {
        let end = start + size;
        let lo = contig.sites.partition_point(|s| s.pos < start);
        let hi = contig.sites.partition_point(|s| s.pos < end);
        let (pi, n_sites) = window_pi(&contig.sites[lo..hi], n_samples);
        windows.push(Window {
            chrom: contig.name.clone(),
            start,
            end,
            pi,
            sites: n_sites,
        });
        start += step;
    }
    windows
}
