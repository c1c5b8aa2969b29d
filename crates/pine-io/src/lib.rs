//! pine-io: VCF reading and window-table output.
//!
//! The reader streams a tab-separated variant-call file (plain or gzipped),
//! keeps biallelic sites for a selected sample subset and builds a
//! [`VariantTable`]. The writer persists windows as a TSV with a fixed
//! header. Everything else in the pipeline is pure computation in pine-core.

use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use pine_core::{Genotype, Site, VariantTable, Window};

/// Open a text input for line reading, transparently decompressing
/// `.gz`/`.bgz` files. `-` reads stdin.
pub fn open_text(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::with_capacity(64 * 1024, io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".gz") || lower.ends_with(".bgz") {
        Ok(Box::new(BufReader::with_capacity(
            64 * 1024,
            MultiGzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(64 * 1024, file)))
    }
}

/// Parse a VCF-style file into a [`VariantTable`].
///
/// `samples`, when given, is an allow-list; the effective sample list is its
/// intersection with the header's sample columns, in file order. Leniency
/// rules:
/// - `##` meta lines and blank lines are skipped
/// - data lines with fewer than 9 tab-separated fields are skipped
/// - multi-allelic sites (comma in ALT) are skipped entirely
/// - only the first colon-delimited subfield of a sample column is read as
///   the genotype call; unparseable calls become missing data
///
/// Fails only on I/O errors or when no `#CHROM` header precedes data lines.
pub fn read_vcf(path: &str, samples: Option<&[String]>) -> Result<VariantTable> {
    let mut reader = open_text(path)?;

    let mut table: Option<VariantTable> = None;
    // Absolute column index in the data line for each retained sample.
    let mut keep_cols: Vec<usize> = Vec::new();

    let mut line = String::with_capacity(8192);
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .with_context(|| format!("reading {}", path))?;
        if bytes == 0 {
            break;
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]);
        if trimmed.is_empty() || trimmed.starts_with("##") {
            continue;
        }

        if trimmed.starts_with("#CHROM") {
            let header: Vec<&str> = trimmed.split('\t').collect();
            let mut retained = Vec::new();
            for (col, name) in header.iter().enumerate().skip(9) {
                let wanted = match samples {
                    Some(allow) => allow.iter().any(|s| s == name),
                    None => true,
                };
                if wanted {
                    keep_cols.push(col);
                    retained.push(name.to_string());
                }
            }
            table = Some(VariantTable::new(retained));
            continue;
        }

        let table = table
            .as_mut()
            .ok_or_else(|| anyhow!("{}: data line before #CHROM header", path))?;

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() < 9 {
            continue;
        }

        let chrom = fields[0];
        let pos: u64 = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => continue,
        };

        // Biallelic only: a comma in ALT means several alternates.
        let alt_field = fields[4];
        if alt_field.contains(',') {
            continue;
        }
        let alt_allele = if alt_field == "." {
            String::new()
        } else {
            alt_field.to_string()
        };

        let genotypes: Vec<Genotype> = keep_cols
            .iter()
            .map(|&col| {
                let token = fields
                    .get(col)
                    .and_then(|f| f.split(':').next())
                    .unwrap_or(".");
                Genotype::from_token(token)
            })
            .collect();

        table.push_site(
            chrom,
            Site {
                pos,
                ref_allele: fields[3].to_string(),
                alt_allele,
                genotypes,
            },
        );
    }

    let mut table = table.ok_or_else(|| anyhow!("{}: no #CHROM header found", path))?;
    table.sort_sites();
    Ok(table)
}

/// Write windows as a TSV with header `chrom  start  end  pi  sites`.
/// A header-only file is still written when `windows` is empty.
pub fn write_windows<P: AsRef<Path>>(path: P, windows: &[Window]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    wtr.write_record(["chrom", "start", "end", "pi", "sites"])?;
    for w in windows {
        wtr.write_record([
            w.chrom.as_str(),
            &w.start.to_string(),
            &w.end.to_string(),
            &w.pi.to_string(),
            &w.sites.to_string(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
