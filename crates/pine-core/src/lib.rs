//! pine-core: data model and diversity estimators for the pine toolkit.
//!
//! This crate holds the pieces shared by the pi pipeline:
//! - Genotype representation (explicit `Call`/`Missing` alleles, no sentinels)
//! - Per-contig site tables sorted by coordinate
//! - The pairwise-difference nucleotide diversity (pi) estimator
//! - Coordinate-window partitioning
//!
//! File parsing and table output live in pine-io; downstream Ne-ratio
//! statistics live in pine-stats.

pub mod diversity;
pub mod genotype;
pub mod site;
pub mod windows;

pub use diversity::window_pi;
pub use genotype::{Allele, Genotype};
pub use site::{ContigSites, Site, VariantTable};
pub use windows::{contig_windows, Window};

pub type SampleId = String;
