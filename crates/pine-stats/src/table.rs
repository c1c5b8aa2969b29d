//! Input table for the Ne-ratio stage.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// One windowed observation: pi and divergence for a (species, chr_type)
/// group. This is the contract with the upstream pi pipeline plus whatever
/// produced the divergence values.
#[derive(Debug, Clone)]
pub struct WindowRow {
    pub species: String,
    pub chr_type: String,
    pub pi: f64,
    pub div: f64,
}

/// Load the long windows table from CSV.
///
/// Required columns (by header name): `species`, `chr_type`, `pi_value`,
/// `div_value`; extra columns are ignored. Rows whose numeric fields do not
/// parse are skipped.
pub fn load_windows<P: AsRef<Path>>(path: P) -> Result<Vec<WindowRow>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("reading headers from {}", path.display()))?
        .clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("column '{}' missing in {}", name, path.display()))
    };
    let species_idx = col("species")?;
    let chr_idx = col("chr_type")?;
    let pi_idx = col("pi_value")?;
    let div_idx = col("div_value")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let (Ok(pi), Ok(div)) = (field(pi_idx).parse::<f64>(), field(div_idx).parse::<f64>())
        else {
            continue;
        };
        rows.push(WindowRow {
            species: field(species_idx).to_string(),
            chr_type: field(chr_idx).to_string(),
            pi,
            div,
        });
    }
    Ok(rows)
}
