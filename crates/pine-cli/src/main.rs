use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pine_core::{contig_windows, Window};
use pine_stats::{NeConfig, NeReport};

/// pine: windowed nucleotide diversity and Ne-ratio statistics
#[derive(Parser)]
#[command(
    name = "pine",
    version,
    about = "pine: windowed nucleotide diversity (pi) from VCFs and Ne-ratio statistics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate nucleotide diversity (pi) in coordinate windows from a VCF
    #[command(after_help = "EXAMPLES:
    # Non-overlapping 50 kb windows over every contig
    pine pi --vcf calls.vcf.gz --out-file pi_windows.tsv

    # 10 kb windows sliding by 5 kb, selected samples and chromosomes
    pine pi --vcf calls.vcf.gz --wind-size 10000 --step-size 5000 \\
        --samples ind1 ind2 ind3 --chromosomes chrX chrY chrM \\
        --out-file pi_windows.tsv

    # Keep empty windows too
    pine pi --vcf calls.vcf --min-sites 0 --out-file pi_windows.tsv

OUTPUT:
    Tab-separated table with header chrom/start/end/pi/sites, one row per
    qualifying window, contig-major then ascending start.")]
    Pi {
        // === Input/Output ===
        /// Input VCF file, plain or gzipped ('-' for stdin)
        #[arg(long, help_heading = "Input/Output")]
        vcf: String,

        /// Output TSV path
        #[arg(long, help_heading = "Input/Output")]
        out_file: String,

        // === Windowing ===
        /// Window type (only coordinate windows are implemented)
        #[arg(long, default_value = "coord", value_parser = ["coord", "sites"], help_heading = "Windowing")]
        wind_type: String,

        /// Window size in bp
        #[arg(long, default_value_t = 50_000, help_heading = "Windowing")]
        wind_size: u64,

        /// Step size in bp (default: window size, non-overlapping)
        #[arg(long, help_heading = "Windowing")]
        step_size: Option<u64>,

        /// Minimum contributing sites for a window to be written
        #[arg(long, default_value_t = 1, help_heading = "Windowing")]
        min_sites: usize,

        // === Filters ===
        /// Samples to include (default: all in the file)
        #[arg(long, num_args = 1.., help_heading = "Filters")]
        samples: Option<Vec<String>>,

        /// Chromosomes to process (default: all in the file)
        #[arg(long, num_args = 1.., help_heading = "Filters")]
        chromosomes: Option<Vec<String>>,

        /// Sample ploidy (informational; calls carry their own copy count)
        #[arg(long, default_value_t = 2, help_heading = "Filters")]
        ploidy: u32,
    },

    /// Ne-ratio statistics from a windowed pi/divergence table
    #[command(after_help = "EXAMPLES:
    # X/Y/MT against autosomes, 20 blocks
    pine ne --input sliding_windows.csv --out-prefix ne_ratio

    # Custom labels
    pine ne --input windows.csv --autosome AUTO --focus chrX chrM \\
        --n-blocks 10 --out-prefix results/ne

INPUT:
    CSV with columns species, chr_type, pi_value, div_value (one row per
    window). Extra columns are ignored.

OUTPUT:
    <prefix>_ratio_se.csv   species, chr_type, ne_ratio, se_delta, se_block
    <prefix>_ranksum.csv    chr_type, species1, species2, n1, n2,
                            statistic, p_value")]
    Ne {
        /// Input windows CSV
        #[arg(long, help_heading = "Input/Output")]
        input: String,

        /// Prefix for the two output CSVs
        #[arg(long, help_heading = "Input/Output")]
        out_prefix: String,

        /// Block count for the block-based standard error
        #[arg(long, default_value_t = 20, help_heading = "Analysis")]
        n_blocks: usize,

        /// chr_type label of the autosomal baseline
        #[arg(long, default_value = "Autosome", help_heading = "Analysis")]
        autosome: String,

        /// chr_type labels to compare against the baseline
        #[arg(long, num_args = 1.., default_values_t = vec!["X".to_string(), "Y".to_string(), "MT".to_string()], help_heading = "Analysis")]
        focus: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Pi {
            vcf,
            out_file,
            wind_type,
            wind_size,
            step_size,
            min_sites,
            samples,
            chromosomes,
            ploidy: _,
        } => run_pi(
            &vcf,
            &out_file,
            &wind_type,
            wind_size,
            step_size,
            min_sites,
            samples.as_deref(),
            chromosomes.as_deref(),
        ),
        Commands::Ne {
            input,
            out_prefix,
            n_blocks,
            autosome,
            focus,
        } => run_ne(&input, &out_prefix, n_blocks, autosome, focus),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_pi(
    vcf: &str,
    out_file: &str,
    wind_type: &str,
    wind_size: u64,
    step_size: Option<u64>,
    min_sites: usize,
    samples: Option<&[String]>,
    chromosomes: Option<&[String]>,
) -> Result<()> {
    if wind_type == "sites" {
        bail!("--wind-type sites is not implemented; use coord");
    }
    let step = step_size.unwrap_or(wind_size);
    if wind_size == 0 || step == 0 {
        bail!("--wind-size and --step-size must be positive");
    }

    eprintln!("Loading VCF: {}", vcf);
    let table = pine_io::read_vcf(vcf, samples)?;
    eprintln!("Loaded {} samples, {} sites", table.samples.len(), table.n_sites());

    let mut windows: Vec<Window> = Vec::new();
    for contig in &table.contigs {
        if let Some(keep) = chromosomes {
            if !keep.iter().any(|c| c == &contig.name) {
                continue;
            }
        }
        eprintln!("Processing chromosome {}...", contig.name);
        windows.extend(
            contig_windows(contig, table.samples.len(), wind_size, step)
                .into_iter()
                .filter(|w| w.sites >= min_sites),
        );
    }

    pine_io::write_windows(out_file, &windows)?;

    if windows.is_empty() {
        eprintln!("No windows passed filters");
    } else {
        let mean_pi = windows.iter().map(|w| w.pi).sum::<f64>() / windows.len() as f64;
        eprintln!("Results saved to {}", out_file);
        eprintln!("Total windows: {}", windows.len());
        eprintln!("Mean pi: {:.6}", mean_pi);
    }
    Ok(())
}

fn run_ne(
    input: &str,
    out_prefix: &str,
    n_blocks: usize,
    autosome: String,
    focus: Vec<String>,
) -> Result<()> {
    if n_blocks == 0 {
        bail!("--n-blocks must be positive");
    }
    let rows = pine_stats::load_windows(input)?;
    eprintln!("Loaded {} window rows from {}", rows.len(), input);

    let config = NeConfig {
        n_blocks,
        autosome,
        focus,
    };
    let report = pine_stats::analyze(&rows, &config)?;

    let ratio_path = format!("{}_ratio_se.csv", out_prefix);
    let ranksum_path = format!("{}_ranksum.csv", out_prefix);
    write_ratio_table(&ratio_path, &report)?;
    write_ranksum_table(&ranksum_path, &report)?;

    eprintln!(
        "Wrote {} ratio rows to {} and {} tests to {}",
        report.ratios.len(),
        ratio_path,
        report.tests.len(),
        ranksum_path
    );
    Ok(())
}

fn write_ratio_table(path: &str, report: &NeReport) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path))?;
    wtr.write_record(["species", "chr_type", "ne_ratio", "se_delta", "se_block"])?;
    for r in &report.ratios {
        wtr.write_record([
            r.species.as_str(),
            r.chr_type.as_str(),
            &format!("{:.6}", r.ratio),
            &format!("{:.6}", r.se_delta),
            &format!("{:.6}", r.se_block),
        ])?;
    }
    wtr.flush().with_context(|| format!("writing {}", path))?;
    Ok(())
}

fn write_ranksum_table(path: &str, report: &NeReport) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path))?;
    wtr.write_record([
        "chr_type",
        "species1",
        "species2",
        "n1",
        "n2",
        "statistic",
        "p_value",
    ])?;
    for t in &report.tests {
        wtr.write_record([
            t.chr_type.as_str(),
            t.species1.as_str(),
            t.species2.as_str(),
            &t.n1.to_string(),
            &t.n2.to_string(),
            &format!("{:.6}", t.statistic),
            &format!("{:.6}", t.p_value),
        ])?;
    }
    wtr.flush().with_context(|| format!("writing {}", path))?;
    Ok(())
}
