//! Per-contig site tables.

use crate::genotype::Genotype;
use crate::SampleId;

/// One biallelic variant position on one contig.
///
/// Created during parsing and immutable afterwards. The genotype vector has
/// exactly one entry per retained sample, in the table's sample order.
#[derive(Debug, Clone)]
pub struct Site {
    /// 1-based coordinate.
    pub pos: u64,
    pub ref_allele: String,
    /// Empty string when the ALT column was `.`.
    pub alt_allele: String,
    pub genotypes: Vec<Genotype>,
}

/// All sites observed on one contig, sorted by ascending coordinate.
///
/// An explicit ordered sequence keyed by coordinate; ordering is maintained
/// by [`VariantTable::sort_sites`], not by insertion order.
#[derive(Debug, Clone)]
pub struct ContigSites {
    pub name: String,
    pub sites: Vec<Site>,
}

impl ContigSites {
    pub fn min_pos(&self) -> Option<u64> {
        self.sites.first().map(|s| s.pos)
    }

    pub fn max_pos(&self) -> Option<u64> {
        self.sites.last().map(|s| s.pos)
    }
}

/// Parsed variant data: the resolved ordered sample list and one
/// [`ContigSites`] per contig, in file order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    pub samples: Vec<SampleId>,
    pub contigs: Vec<ContigSites>,
}

impl VariantTable {
    pub fn new(samples: Vec<SampleId>) -> Self {
        VariantTable {
            samples,
            contigs: Vec::new(),
        }
    }

    /// Append a site to its contig, creating the contig entry on first use.
    /// Contigs keep file order; call [`sort_sites`](Self::sort_sites) once
    /// parsing is done.
    pub fn push_site(&mut self, chrom: &str, site: Site) {
        // Data lines for one contig are normally consecutive, so check the
        // most recent contig before scanning.
        if let Some(last) = self.contigs.last_mut() {
            if last.name == chrom {
                last.sites.push(site);
                return;
            }
        }
        if let Some(contig) = self.contigs.iter_mut().find(|c| c.name == chrom) {
            contig.sites.push(site);
        } else {
            self.contigs.push(ContigSites {
                name: chrom.to_string(),
                sites: vec![site],
            });
        }
    }

    /// Sort every contig's sites by coordinate. Stable, so duplicate
    /// coordinates keep file order.
    pub fn sort_sites(&mut self) {
        for contig in &mut self.contigs {
            contig.sites.sort_by_key(|s| s.pos);
        }
    }

    pub fn n_sites(&self) -> usize {
        self.contigs.iter().map(|c| c.sites.len()).sum()
    }
}
