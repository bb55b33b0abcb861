//! FASTA file parser.
//!
//! This module reads the gene file. It supports both single-line and
//! multi-line sequences. Lowercase letters mark exons and are kept as-is.
//!
//! ## FASTA Format
//!
//! ```text
//! >INSR chr19:7150261-7150808 (reverse complement)
//! gtcctccgcagccaagtttctgagagATTCCAGTGAA...
//! >MBNL chr3:152446461-152447003
//! ttgcaggcctcttcatcccacgatgGGTTCCTTGCT...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::model::{GeneSet, SequenceRecord};

/// Maximum number of records drawn in one figure.
pub const MAX_RECORDS: usize = 10;

/// Sequences longer than this are still drawn but a warning is logged.
pub const EXPECTED_MAX_LENGTH: usize = 1000;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read FASTA input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error("Record '{id}' has an empty sequence")]
    EmptySequence { id: String },

    #[error("Invalid character '{character}' in record '{id}' at line {line}")]
    InvalidCharacter { id: String, line: usize, character: char },

    #[error("Too many records: found {found}, at most {max} can be drawn")]
    TooManyRecords { found: usize, max: usize },
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Accumulates one record while lines are being read.
struct PendingRecord {
    id: String,
    description: String,
    sequence: Vec<u8>,
}

impl PendingRecord {
    fn finish(self, records: &mut Vec<SequenceRecord>) -> FastaResult<()> {
        if self.sequence.is_empty() {
            return Err(FastaError::EmptySequence { id: self.id });
        }
        if self.sequence.len() > EXPECTED_MAX_LENGTH {
            log::warn!(
                "Record '{}' is {} bases long; figures are tuned for at most {} bases",
                self.id,
                self.sequence.len(),
                EXPECTED_MAX_LENGTH
            );
        }
        records.push(SequenceRecord::new(self.id, self.sequence).with_description(self.description));
        Ok(())
    }
}

/// Parses a FASTA file and returns its genes.
///
/// # Examples
///
/// ```no_run
/// use motifmark::fasta::parse_fasta_file;
///
/// let genes = parse_fasta_file("Figure_1.fasta").unwrap();
/// println!("Loaded {} genes", genes.record_count());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<GeneSet> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

/// Parses FASTA content from a reader.
///
/// This function handles both single-line and multi-line sequences.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<GeneSet> {
    let mut records = Vec::new();
    let mut current: Option<PendingRecord> = None;
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            // Save previous record if exists
            if let Some(pending) = current.take() {
                pending.finish(&mut records)?;
            }

            // Identifier is everything before the first space
            let header = header.trim();
            let (id, description) = match header.split_once(char::is_whitespace) {
                Some((id, rest)) => (id, rest.trim()),
                None => (header, ""),
            };

            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current = Some(PendingRecord {
                id: id.to_string(),
                description: description.to_string(),
                sequence: Vec::new(),
            });
        } else {
            // Sequence line
            let Some(pending) = current.as_mut() else {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            };

            for c in line.chars().filter(|c| !c.is_whitespace()) {
                if !c.is_ascii_alphabetic() {
                    return Err(FastaError::InvalidCharacter {
                        id: pending.id.clone(),
                        line: line_number,
                        character: c,
                    });
                }
                pending.sequence.push(c as u8);
            }
        }
    }

    // Don't forget the last record
    if let Some(pending) = current {
        pending.finish(&mut records)?;
    }

    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    if records.len() > MAX_RECORDS {
        return Err(FastaError::TooManyRecords {
            found: records.len(),
            max: MAX_RECORDS,
        });
    }

    log::debug!("Parsed {} FASTA records", records.len());
    Ok(GeneSet::new(records))
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str) -> FastaResult<GeneSet> {
    parse_fasta(content.as_bytes())
}
