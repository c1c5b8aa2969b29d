//! Genotype-call representation and GT-token parsing.

/// A single haplotype copy's allele call.
///
/// `Call(0)` is the reference allele; `Call(i)` for i >= 1 refers to the
/// i-th alternate allele in listed order. Missing data is its own variant
/// rather than a sentinel index, so it can never collide with a valid call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allele {
    Call(u32),
    Missing,
}

/// One sample's genotype at one site: one allele per haplotype copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype(Vec<Allele>);

impl Genotype {
    /// Parse a raw GT token such as `0/1`, `1|1`, `.` or `0`.
    ///
    /// Copies are split on `/` when present, else `|`, else the whole token
    /// is a single haploid copy. Each copy that is `.` or not parseable as a
    /// non-negative integer becomes [`Allele::Missing`]; parsing never fails.
    pub fn from_token(token: &str) -> Self {
        let copies: Vec<&str> = if token.contains('/') {
            token.split('/').collect()
        } else if token.contains('|') {
            token.split('|').collect()
        } else {
            vec![token]
        };

        let alleles = copies
            .into_iter()
            .map(|copy| match copy.parse::<u32>() {
                Ok(idx) => Allele::Call(idx),
                Err(_) => Allele::Missing,
            })
            .collect();

        Genotype(alleles)
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.0
    }

    /// Number of haplotype copies in this call.
    pub fn ploidy(&self) -> usize {
        self.0.len()
    }

    /// True when any copy is missing; such a genotype invalidates every
    /// sample pair it takes part in.
    pub fn has_missing(&self) -> bool {
        self.0.iter().any(|a| *a == Allele::Missing)
    }
}
