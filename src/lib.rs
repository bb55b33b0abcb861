//! # motif-mark - Motif Hit Diagrams
//!
//! Draws to-scale pictures of where sequence motifs fall in a handful of genes.
//!
//! ## Architecture
//!
//! The crate is a linear pipeline with one module per stage:
//! - `model`: Gene records, exon intervals and motif hits
//! - `fasta`: FASTA parsing, with lowercase runs recorded as exons
//! - `motif`: IUPAC motif compilation and motif file parsing
//! - `scan`: Sliding every motif over every gene
//! - `layout`: Shared horizontal scale, rows, colors and legend
//! - `render`: SVG document and PNG rasterization
//! - `pipeline`: Reading inputs, running the stages, writing outputs

pub mod fasta;
pub mod layout;
pub mod model;
pub mod motif;
pub mod pipeline;
pub mod render;
pub mod scan;
