//! Run orchestration.
//!
//! One run is a strict sequence of stages:
//! - read the FASTA and motif files
//! - scan every record for every motif
//! - lay out the figure
//! - render and write the PNG (and optionally SVG and a hit table)
//!
//! Any error stops the run before an image is written. Outputs are written
//! PNG last, and files from a failed write are removed again.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fasta::{parse_fasta_str, FastaError};
use crate::layout::{layout, FigureGeometry, LayoutConfig, LayoutError};
use crate::model::{GeneSet, MotifHit};
use crate::motif::{parse_motifs_str, MotifError, MotifSet};
use crate::render::{PngRenderer, RenderError, Renderer, SvgRenderer};
use crate::scan::scan;

/// Errors that can end a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("FASTA error: {0}")]
    Fasta(#[from] FastaError),

    #[error("Motif error: {0}")]
    Motif(#[from] MotifError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Where the hit table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitsOutput {
    Stdout,
    File(PathBuf),
}

impl HitsOutput {
    /// `-` selects stdout, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            HitsOutput::Stdout
        } else {
            HitsOutput::File(PathBuf::from(arg))
        }
    }

    /// Path shown in messages; `-` for stdout.
    pub fn path(&self) -> PathBuf {
        match self {
            HitsOutput::Stdout => PathBuf::from("-"),
            HitsOutput::File(path) => path.clone(),
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fasta: PathBuf,
    pub motifs: PathBuf,
    /// PNG path; defaults to the FASTA path with a `.png` extension
    pub output: Option<PathBuf>,
    /// Also write the SVG document next to the PNG
    pub write_svg: bool,
    pub hits: Option<HitsOutput>,
    pub layout: LayoutConfig,
}

impl RunConfig {
    pub fn new(fasta: impl Into<PathBuf>, motifs: impl Into<PathBuf>) -> Self {
        Self {
            fasta: fasta.into(),
            motifs: motifs.into(),
            output: None,
            write_svg: false,
            hits: None,
            layout: LayoutConfig::default(),
        }
    }

    /// The PNG path this run writes.
    pub fn png_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.fasta.with_extension("png"))
    }

    /// The SVG path this run writes when `write_svg` is set.
    pub fn svg_path(&self) -> PathBuf {
        self.png_path().with_extension("svg")
    }
}

/// The scanned and laid out figure for one gene set.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub hits: Vec<MotifHit>,
    pub geometry: FigureGeometry,
}

/// Scans and lays out one figure without touching the filesystem.
pub fn build_figure(
    genes: &GeneSet,
    motifs: &MotifSet,
    config: &LayoutConfig,
) -> PipelineResult<Figure> {
    let hits = scan(genes, motifs);
    let geometry = layout(genes, motifs, &hits, config)?;
    Ok(Figure { hits, geometry })
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub png: PathBuf,
    pub svg: Option<PathBuf>,
    pub records: usize,
    pub motifs: usize,
    pub hits: usize,
}

/// Executes one run.
pub fn run(config: &RunConfig) -> PipelineResult<RunSummary> {
    let fasta_text = read_input(&config.fasta)?;
    let motif_text = read_input(&config.motifs)?;

    let genes = parse_fasta_str(&fasta_text)?;
    let motifs = parse_motifs_str(&motif_text)?;
    log::info!(
        "Loaded {} genes from {} and {} motifs from {}",
        genes.record_count(),
        config.fasta.display(),
        motifs.len(),
        config.motifs.display()
    );
    if motifs.iter().any(|m| m.len() > genes.min_length()) {
        log::warn!(
            "Some motifs are longer than the shortest gene ({} bases) and cannot match it",
            genes.min_length()
        );
    }

    let figure = build_figure(&genes, &motifs, &config.layout)?;
    log::info!("Found {} motif hits", figure.hits.len());

    // Render everything before writing anything.
    let png = PngRenderer::default().render(&figure.geometry)?;
    let svg = if config.write_svg {
        Some(SvgRenderer.render(&figure.geometry)?)
    } else {
        None
    };
    let table = match &config.hits {
        Some(target) => {
            let mut buf = Vec::new();
            write_hits(&mut buf, &genes, &motifs, &figure.hits).map_err(|source| {
                PipelineError::Io {
                    action: "write",
                    path: target.path(),
                    source,
                }
            })?;
            Some(buf)
        }
        None => None,
    };

    let png_path = config.png_path();
    let svg_path = svg.as_ref().map(|_| config.svg_path());

    let mut files: Vec<(&Path, &[u8])> = Vec::with_capacity(3);
    if let (Some(HitsOutput::File(path)), Some(bytes)) = (&config.hits, &table) {
        files.push((path.as_path(), bytes.as_slice()));
    }
    if let (Some(path), Some(bytes)) = (&svg_path, &svg) {
        files.push((path.as_path(), bytes.as_slice()));
    }
    files.push((png_path.as_path(), png.as_slice()));
    write_all_or_none(&files)?;

    if let (Some(HitsOutput::Stdout), Some(bytes)) = (&config.hits, &table) {
        io::stdout()
            .lock()
            .write_all(bytes)
            .map_err(|source| PipelineError::Io {
                action: "write",
                path: PathBuf::from("-"),
                source,
            })?;
    }

    Ok(RunSummary {
        png: png_path,
        svg: svg_path,
        records: genes.record_count(),
        motifs: motifs.len(),
        hits: figure.hits.len(),
    })
}

/// Writes hits as a tab-separated table with 1-based inclusive coordinates.
pub fn write_hits<W: Write>(
    out: &mut W,
    genes: &GeneSet,
    motifs: &MotifSet,
    hits: &[MotifHit],
) -> io::Result<()> {
    writeln!(out, "record\tmotif\tstart\tend")?;
    for hit in hits {
        let record = genes.get(hit.record_index).map_or("?", |r| r.id.as_str());
        let motif = motifs.get(hit.motif_index).map_or("?", |m| m.raw());
        writeln!(out, "{}\t{}\t{}\t{}", record, motif, hit.start + 1, hit.end)?;
    }
    Ok(())
}

fn read_input(path: &Path) -> PipelineResult<String> {
    fs::read_to_string(path).map_err(|source| PipelineError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })
}

/// Writes files in order. On the first failure every file written so far,
/// and the failed one, is removed.
fn write_all_or_none(files: &[(&Path, &[u8])]) -> PipelineResult<()> {
    for (i, (path, bytes)) in files.iter().enumerate() {
        if let Err(err) = write_output(path, bytes) {
            for (done, _) in &files[..=i] {
                if done.exists() {
                    if let Err(e) = fs::remove_file(done) {
                        log::warn!("Could not remove {}: {}", done.display(), e);
                    }
                }
            }
            return Err(err);
        }
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    let io_err = |source| PipelineError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)
}
