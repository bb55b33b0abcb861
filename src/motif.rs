//! Motif patterns with IUPAC ambiguity codes.
//!
//! Each motif letter is decoded once into a 4-bit base mask so that matching a
//! window is a single AND per position. T and U share one bit.
//!
//! ## Motif file
//!
//! ```text
//! ygcy
//! GCAUG
//! catag
//! YYYYYYYYYY
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Maximum number of motifs drawn in one figure.
pub const MAX_MOTIFS: usize = 5;

const BASE_A: u8 = 1;
const BASE_C: u8 = 2;
const BASE_G: u8 = 4;
const BASE_T: u8 = 8;
const BASE_ANY: u8 = BASE_A | BASE_C | BASE_G | BASE_T;

/// The set of bases one motif position accepts, as a bitmask.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    /// Decodes an IUPAC nucleotide letter (any case). Returns `None` for
    /// letters outside the code table.
    pub fn from_letter(letter: u8) -> Option<Self> {
        let mask = match letter.to_ascii_uppercase() {
            b'A' => BASE_A,
            b'C' => BASE_C,
            b'G' => BASE_G,
            b'T' | b'U' => BASE_T,
            b'R' => BASE_A | BASE_G,
            b'Y' => BASE_C | BASE_T,
            b'S' => BASE_C | BASE_G,
            b'W' => BASE_A | BASE_T,
            b'K' => BASE_G | BASE_T,
            b'M' => BASE_A | BASE_C,
            b'B' => BASE_C | BASE_G | BASE_T,
            b'D' => BASE_A | BASE_G | BASE_T,
            b'H' => BASE_A | BASE_C | BASE_T,
            b'V' => BASE_A | BASE_C | BASE_G,
            b'N' => BASE_ANY,
            _ => return None,
        };
        Some(Self(mask))
    }

    /// Mask of a concrete sequence base. Ambiguous or unknown bases map to
    /// the empty mask and so never match.
    #[inline(always)]
    fn base_mask(base: u8) -> u8 {
        match base.to_ascii_uppercase() {
            b'A' => BASE_A,
            b'C' => BASE_C,
            b'G' => BASE_G,
            b'T' | b'U' => BASE_T,
            _ => 0,
        }
    }

    /// Returns true if `base` is one of the accepted bases.
    #[inline(always)]
    pub fn accepts(self, base: u8) -> bool {
        self.0 & Self::base_mask(base) != 0
    }
}

/// Errors raised while reading or compiling motifs.
#[derive(Error, Debug)]
pub enum MotifError {
    #[error("Failed to read motif file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty motif")]
    Empty,

    #[error("Invalid code '{code}' at position {position} of motif '{motif}'")]
    InvalidCode { motif: String, code: char, position: usize },

    #[error("Too many motifs: found {found}, at most {max} can be drawn")]
    TooMany { found: usize, max: usize },

    #[error("No motifs found in motif file")]
    NoMotifs,
}

/// Result type for motif operations.
pub type MotifResult<T> = Result<T, MotifError>;

/// A compiled motif: the raw text plus one allowed-base set per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifPattern {
    raw: String,
    allowed: Vec<IupacCode>,
}

impl MotifPattern {
    /// Compiles a motif string.
    pub fn compile(raw: &str) -> MotifResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MotifError::Empty);
        }

        let allowed = raw
            .bytes()
            .enumerate()
            .map(|(position, b)| {
                IupacCode::from_letter(b).ok_or_else(|| MotifError::InvalidCode {
                    motif: raw.to_string(),
                    code: raw[position..].chars().next().unwrap_or(b as char),
                    position,
                })
            })
            .collect::<MotifResult<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            allowed,
        })
    }

    /// The motif as written in the motif file.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Motif length `k`.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Tests a window of exactly `len()` bases.
    #[inline]
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.allowed.len()
            && self
                .allowed
                .iter()
                .zip(window)
                .all(|(code, &base)| code.accepts(base))
    }
}

impl fmt::Display for MotifPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The motifs of one run, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifSet {
    patterns: Vec<MotifPattern>,
}

impl MotifSet {
    /// Builds a set from already compiled patterns.
    pub fn new(patterns: Vec<MotifPattern>) -> MotifResult<Self> {
        if patterns.is_empty() {
            return Err(MotifError::NoMotifs);
        }
        if patterns.len() > MAX_MOTIFS {
            return Err(MotifError::TooMany {
                found: patterns.len(),
                max: MAX_MOTIFS,
            });
        }
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MotifPattern> {
        self.patterns.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotifPattern> {
        self.patterns.iter()
    }
}

/// Parses motif file content: one motif per line, blank lines skipped.
///
/// At most `MAX_MOTIFS` entries are accepted, repeats included. Motifs that
/// accept the same bases at every position (`ygcy`/`YGCY`, `GCATG`/`GCAUG`)
/// are kept once.
pub fn parse_motifs_str(content: &str) -> MotifResult<MotifSet> {
    let entries: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if entries.len() > MAX_MOTIFS {
        return Err(MotifError::TooMany {
            found: entries.len(),
            max: MAX_MOTIFS,
        });
    }

    let mut patterns: Vec<MotifPattern> = Vec::with_capacity(entries.len());
    for entry in entries {
        let pattern = MotifPattern::compile(entry)?;
        if let Some(first) = patterns.iter().find(|p| p.allowed == pattern.allowed) {
            log::warn!(
                "Motif '{}' matches the same bases as '{}'; drawing it once",
                pattern.raw(),
                first.raw()
            );
            continue;
        }
        patterns.push(pattern);
    }

    let set = MotifSet::new(patterns)?;
    log::debug!("Compiled {} motifs", set.len());
    Ok(set)
}

/// Reads and parses a motif file.
pub fn parse_motifs_file<P: AsRef<Path>>(path: P) -> MotifResult<MotifSet> {
    let content = fs::read_to_string(path)?;
    parse_motifs_str(&content)
}
