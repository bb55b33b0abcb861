//! Figure rendering.
//!
//! Renderers only draw what the layout engine computed:
//! - gene labels above each row
//! - backbones as 2px black lines
//! - exons as black boxes
//! - motif hits as translucent colored boxes
//! - a legend under the last row
//!
//! `SvgRenderer` builds the document; `PngRenderer` rasterizes it 1:1.

use resvg::{tiny_skia, usvg};
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;
use thiserror::Error;

use crate::layout::{FigureGeometry, LegendEntry, LegendSymbol, Rgb, RowGeometry};

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
const LABEL_FONT_SIZE: f64 = 18.0;
const LEGEND_FONT_SIZE: f64 = 12.0;
const LEGEND_TEXT_OFFSET: f64 = 3.0;
const BACKBONE_WIDTH: f64 = 2.0;
const HIT_OPACITY: f64 = 0.7;

/// Errors raised while rendering a figure.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid SVG document: {0}")]
    Svg(String),

    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Something that turns figure geometry into file bytes.
pub trait Renderer {
    /// Renders the figure to the bytes of one output file.
    fn render(&self, figure: &FigureGeometry) -> RenderResult<Vec<u8>>;

    /// File extension of the output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Renders figures as SVG documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    /// Builds the SVG document for a figure.
    pub fn document(&self, figure: &FigureGeometry) -> Document {
        let width = figure.width as f64;
        let height = figure.height as f64;

        let mut doc = Document::new()
            .set("viewBox", (0, 0, width, height))
            .set("width", width)
            .set("height", height)
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", Rgb::WHITE.to_hex()),
            );

        for row in &figure.rows {
            doc = doc.add(row_group(row, figure.feature_height));
        }

        let mut legend = Group::new().set("class", "legend");
        for entry in &figure.legend {
            legend = legend.add(legend_group(entry));
        }
        doc.add(legend)
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, figure: &FigureGeometry) -> RenderResult<Vec<u8>> {
        Ok(self.document(figure).to_string().into_bytes())
    }

    fn extension(&self) -> &'static str {
        "svg"
    }
}

fn row_group(row: &RowGeometry, feature_height: f64) -> Group {
    let mut group = Group::new()
        .set("class", "gene")
        .set("shape-rendering", "crispEdges")
        .add(
            Text::new(row.record_id.clone())
                .set("x", row.backbone.x)
                .set("y", row.label_y)
                .set("font-family", FONT_FAMILY)
                .set("font-size", LABEL_FONT_SIZE)
                .set("fill", Rgb::BLACK.to_hex()),
        )
        .add(
            Line::new()
                .set("x1", row.backbone.x)
                .set("y1", row.y)
                .set("x2", row.backbone.end())
                .set("y2", row.y)
                .set("stroke", Rgb::BLACK.to_hex())
                .set("stroke-width", BACKBONE_WIDTH),
        );

    let top = row.y - feature_height / 2.0;
    for exon in &row.exons {
        group = group.add(
            Rectangle::new()
                .set("x", exon.x)
                .set("y", top)
                .set("width", exon.width)
                .set("height", feature_height)
                .set("fill", Rgb::BLACK.to_hex()),
        );
    }

    for hit in &row.hits {
        group = group.add(
            Rectangle::new()
                .set("x", hit.span.x)
                .set("y", top)
                .set("width", hit.span.width)
                .set("height", feature_height)
                .set("fill", hit.color.to_hex())
                .set("fill-opacity", HIT_OPACITY),
        );
    }

    group
}

fn legend_group(entry: &LegendEntry) -> Group {
    let symbol = match entry.symbol {
        LegendSymbol::Line => Group::new().add(
            Line::new()
                .set("x1", entry.x)
                .set("y1", entry.y)
                .set("x2", entry.x + entry.width)
                .set("y2", entry.y)
                .set("stroke", Rgb::BLACK.to_hex())
                .set("stroke-width", BACKBONE_WIDTH),
        ),
        LegendSymbol::Swatch(color) => Group::new().add(
            Rectangle::new()
                .set("x", entry.x)
                .set("y", entry.y - entry.height / 2.0)
                .set("width", entry.width)
                .set("height", entry.height)
                .set("fill", color.to_hex()),
        ),
    };

    symbol.set("shape-rendering", "crispEdges").add(
        Text::new(entry.label.clone())
            .set("x", entry.x + entry.width + LEGEND_TEXT_OFFSET)
            .set("y", entry.y + LEGEND_TEXT_OFFSET)
            .set("font-family", FONT_FAMILY)
            .set("font-size", LEGEND_FONT_SIZE)
            .set("fill", Rgb::BLACK.to_hex()),
    )
}

/// Renders figures as PNG images.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    /// Load installed fonts so labels are drawn
    pub system_fonts: bool,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self { system_fonts: true }
    }
}

impl Renderer for PngRenderer {
    fn render(&self, figure: &FigureGeometry) -> RenderResult<Vec<u8>> {
        let text = SvgRenderer.document(figure).to_string();

        let mut options = usvg::Options::default();
        if self.system_fonts {
            options.fontdb_mut().load_system_fonts();
        }
        let tree =
            usvg::Tree::from_str(&text, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

        let mut pixmap =
            tiny_skia::Pixmap::new(figure.width, figure.height).ok_or(RenderError::Canvas {
                width: figure.width,
                height: figure.height,
            })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
