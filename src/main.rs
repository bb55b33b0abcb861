//! motif-mark - Motif Hit Diagrams
//!
//! Draws one PNG per FASTA file showing genes, exons and motif hits to scale.
//!
//! ## Usage
//!
//! ```bash
//! motif-mark -f Figure_1.fasta -m Fig_1_motifs.txt
//! motif-mark -f Figure_1.fasta -m Fig_1_motifs.txt --svg --hits -
//! ```
//!
//! ## Input
//!
//! - FASTA: up to 10 genes, lowercase = exon
//! - Motifs: up to 5, one per line, IUPAC codes allowed

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use motifmark::layout::LayoutConfig;
use motifmark::pipeline::{run, HitsOutput, RunConfig};

/// motif-mark - Draw motif hits, exons and introns to scale
///
/// Writes <FASTA name>.png next to the FASTA file unless -o/--output is given.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA file of genes (lowercase marks exons)
    #[arg(short = 'f', long = "fasta")]
    fasta: PathBuf,

    /// Motif file, one motif per line (IUPAC codes allowed)
    #[arg(short = 'm', long = "motifs")]
    motifs: PathBuf,

    /// PNG output path
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Also write the figure as SVG next to the PNG
    #[arg(long = "svg")]
    svg: bool,

    /// Write a tab-separated table of motif hits. Use "-" for stdout.
    #[arg(long = "hits")]
    hits: Option<String>,

    /// Canvas width in pixels
    #[arg(short = 'w', long = "width", default_value = "1000")]
    width: u32,

    /// Log debug details
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let layout = LayoutConfig {
        canvas_width: args.width,
        ..LayoutConfig::default()
    };
    if layout.drawable_width() <= 0.0 {
        anyhow::bail!(
            "Canvas width must exceed {} pixels (got {})",
            2.0 * layout.margin,
            args.width
        );
    }

    let config = RunConfig {
        fasta: args.fasta,
        motifs: args.motifs,
        output: args.output,
        write_svg: args.svg,
        hits: args.hits.as_deref().map(HitsOutput::from_arg),
        layout,
    };

    let summary = run(&config)?;
    eprintln!(
        "Drew {} genes, {} motifs, {} hits to {}",
        summary.records,
        summary.motifs,
        summary.hits,
        summary.png.display()
    );

    Ok(())
}
