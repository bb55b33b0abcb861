//! Figure layout.
//!
//! This module turns records, exons and hits into pixel geometry:
//! - one row per record, top to bottom in file order
//! - one horizontal scale shared by every row, set by the longest record
//! - one color per motif, shared by every row and the legend
//!
//! Nothing here knows how the geometry is drawn.

use std::fmt;

use thiserror::Error;

use crate::model::{GeneSet, MotifHit};
use crate::motif::MotifSet;
use crate::scan::hits_for;

/// Motif colors, assigned in motif-file order.
pub const MOTIF_PALETTE: [Rgb; 5] = [
    Rgb(14, 184, 187),
    Rgb(120, 94, 240),
    Rgb(220, 38, 127),
    Rgb(254, 97, 0),
    Rgb(255, 176, 0),
];

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Drawing constants, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Total canvas width
    pub canvas_width: u32,
    /// Empty space left and right of the longest backbone
    pub margin: f64,
    /// Distance from the top edge to the first row centre
    pub top_padding: f64,
    /// Distance between consecutive row centres
    pub row_spacing: f64,
    /// Gene label baseline sits this far above the row centre
    pub label_offset: f64,
    /// Height of exon and motif rectangles
    pub feature_height: f64,
    /// Distance from the last row centre to the legend
    pub legend_gap: f64,
    /// Horizontal distance between motif legend entries
    pub legend_spacing: f64,
    /// Legend swatch size
    pub legend_swatch: (f64, f64),
    /// Space below the legend
    pub bottom_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            margin: 50.0,
            top_padding: 50.0,
            row_spacing: 80.0,
            label_offset: 20.0,
            feature_height: 10.0,
            legend_gap: 50.0,
            legend_spacing: 130.0,
            legend_swatch: (30.0, 10.0),
            bottom_padding: 30.0,
        }
    }
}

impl LayoutConfig {
    /// Width available for the longest backbone.
    pub fn drawable_width(&self) -> f64 {
        self.canvas_width as f64 - 2.0 * self.margin
    }
}

/// Errors raised while laying out a figure.
#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("No records to lay out")]
    NoRecords,

    #[error("All records are empty; cannot compute a horizontal scale")]
    ZeroLength,

    #[error("Canvas width {width}px leaves no room between {margin}px margins")]
    CanvasTooNarrow { width: u32, margin: f64 },

    #[error("{found} motifs but only {max} colors are available")]
    TooManyMotifs { found: usize, max: usize },
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A horizontal pixel span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f64,
    pub width: f64,
}

impl Span {
    pub fn end(&self) -> f64 {
        self.x + self.width
    }
}

/// One motif hit placed on a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMark {
    pub motif_index: usize,
    pub span: Span,
    pub color: Rgb,
}

/// Geometry of one record's row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    pub record_id: String,
    /// Vertical centre of the backbone
    pub y: f64,
    /// Baseline of the gene label
    pub label_y: f64,
    pub backbone: Span,
    pub exons: Vec<Span>,
    pub hits: Vec<HitMark>,
}

/// What a legend entry shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LegendSymbol {
    /// A backbone-style line
    Line,
    /// A filled rectangle of the given color
    Swatch(Rgb),
}

/// One legend entry: a symbol and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub symbol: LegendSymbol,
    pub x: f64,
    /// Vertical centre of the symbol
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything a renderer needs to draw one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureGeometry {
    pub width: u32,
    pub height: u32,
    /// Pixels per base
    pub scale: f64,
    pub feature_height: f64,
    pub rows: Vec<RowGeometry>,
    pub legend: Vec<LegendEntry>,
}

impl FigureGeometry {
    /// Color assigned to a motif, as used in every row and the legend.
    pub fn motif_color(&self, motif_index: usize) -> Option<Rgb> {
        MOTIF_PALETTE.get(motif_index).copied()
    }
}

/// Lays out one figure.
pub fn layout(
    genes: &GeneSet,
    motifs: &MotifSet,
    hits: &[MotifHit],
    config: &LayoutConfig,
) -> LayoutResult<FigureGeometry> {
    if genes.is_empty() {
        return Err(LayoutError::NoRecords);
    }
    if motifs.len() > MOTIF_PALETTE.len() {
        return Err(LayoutError::TooManyMotifs {
            found: motifs.len(),
            max: MOTIF_PALETTE.len(),
        });
    }
    let drawable = config.drawable_width();
    if drawable <= 0.0 {
        return Err(LayoutError::CanvasTooNarrow {
            width: config.canvas_width,
            margin: config.margin,
        });
    }
    let max_len = genes.max_length();
    if max_len == 0 {
        return Err(LayoutError::ZeroLength);
    }

    let scale = drawable / max_len as f64;
    let span = |start: usize, end: usize| Span {
        x: config.margin + start as f64 * scale,
        width: (end - start) as f64 * scale,
    };

    let rows: Vec<RowGeometry> = genes
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let y = config.top_padding + i as f64 * config.row_spacing;
            RowGeometry {
                record_id: record.id.clone(),
                y,
                label_y: y - config.label_offset,
                backbone: span(0, record.len()),
                exons: record.exons().iter().map(|e| span(e.start, e.end)).collect(),
                hits: hits_for(hits, i)
                    .map(|h| HitMark {
                        motif_index: h.motif_index,
                        span: span(h.start, h.end),
                        color: MOTIF_PALETTE[h.motif_index],
                    })
                    .collect(),
            }
        })
        .collect();

    let last_row_y = rows.last().map(|r| r.y).unwrap_or(config.top_padding);
    let legend_y = last_row_y + config.legend_gap;
    let legend = legend_entries(motifs, legend_y, config);
    let height = (legend_y + config.legend_swatch.1 / 2.0 + config.bottom_padding).ceil() as u32;

    log::debug!(
        "Laid out {} rows at {:.4} px/base on a {}x{} canvas",
        rows.len(),
        scale,
        config.canvas_width,
        height
    );

    Ok(FigureGeometry {
        width: config.canvas_width,
        height,
        scale,
        feature_height: config.feature_height,
        rows,
        legend,
    })
}

fn legend_entries(motifs: &MotifSet, y: f64, config: &LayoutConfig) -> Vec<LegendEntry> {
    let (w, h) = config.legend_swatch;
    let mut x = config.margin;
    let mut entries = Vec::with_capacity(motifs.len() + 2);

    entries.push(LegendEntry {
        label: "Gene".to_string(),
        symbol: LegendSymbol::Line,
        x,
        y,
        width: w,
        height: h,
    });
    x += config.legend_spacing;

    entries.push(LegendEntry {
        label: "Exon".to_string(),
        symbol: LegendSymbol::Swatch(Rgb::BLACK),
        x,
        y,
        width: w,
        height: h,
    });
    x += config.legend_spacing;

    for (i, motif) in motifs.iter().enumerate() {
        entries.push(LegendEntry {
            label: motif.raw().to_string(),
            symbol: LegendSymbol::Swatch(MOTIF_PALETTE[i]),
            x,
            y,
            width: w,
            height: h,
        });
        x += config.legend_spacing;
    }

    entries
}
