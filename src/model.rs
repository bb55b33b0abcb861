//! Data model for motif marking.
//!
//! This module contains the value types that flow through the pipeline:
//! - Gene records with their exon intervals
//! - The ordered set of genes read from one FASTA file
//! - Motif hits produced by the scanner
//!
//! All of them are built once and then only read.

/// A half-open exon interval `[start, end)` in sequence coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExonInterval {
    pub start: usize,
    pub end: usize,
}

impl ExonInterval {
    /// Creates a new interval.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of bases covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the interval covers no base.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Finds every maximal run of lowercase letters in `sequence`.
///
/// Runs are returned sorted by start and never overlap.
pub fn exon_intervals(sequence: &[u8]) -> Vec<ExonInterval> {
    let mut exons = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, b) in sequence.iter().enumerate() {
        match (b.is_ascii_lowercase(), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                exons.push(ExonInterval::new(start, i));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        exons.push(ExonInterval::new(start, sequence.len()));
    }

    exons
}

/// A single gene read from a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The sequence identifier (from FASTA header, without '>')
    pub id: String,
    /// Remainder of the header line after the identifier, if any
    pub description: Option<String>,
    /// The bases, with the case of the input preserved
    sequence: Vec<u8>,
    /// Lowercase runs of `sequence`
    exons: Vec<ExonInterval>,
}

impl SequenceRecord {
    /// Creates a new record and derives its exons from the lowercase runs.
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        let sequence = sequence.into();
        let exons = exon_intervals(&sequence);
        Self {
            id: id.into(),
            description: None,
            sequence,
            exons,
        }
    }

    /// Attaches the free-text part of the header.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns the raw bases.
    pub fn as_bytes(&self) -> &[u8] {
        &self.sequence
    }

    /// Returns the exon intervals.
    pub fn exons(&self) -> &[ExonInterval] {
        &self.exons
    }
}

/// The ordered genes of one FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneSet {
    /// Records in file order
    pub records: Vec<SequenceRecord>,
}

impl GeneSet {
    /// Creates a gene set from records in file order.
    pub fn new(records: Vec<SequenceRecord>) -> Self {
        Self { records }
    }

    /// Returns the number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the length of the longest record.
    pub fn max_length(&self) -> usize {
        self.records.iter().map(SequenceRecord::len).max().unwrap_or(0)
    }

    /// Returns the length of the shortest record.
    pub fn min_length(&self) -> usize {
        self.records.iter().map(SequenceRecord::len).min().unwrap_or(0)
    }

    /// Gets a record by index.
    pub fn get(&self, index: usize) -> Option<&SequenceRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One occurrence of a motif in a record.
///
/// `start..end` is half-open; `end - start` is the motif length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MotifHit {
    /// Index of the motif in its `MotifSet`
    pub motif_index: usize,
    /// Index of the record in its `GeneSet`
    pub record_index: usize,
    pub start: usize,
    pub end: usize,
}

impl MotifHit {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
