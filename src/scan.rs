//! Motif scanning.
//!
//! Every window of every record is tested against every motif. Overlapping
//! hits, including a motif overlapping itself, are all reported.

use crate::model::{GeneSet, MotifHit, SequenceRecord};
use crate::motif::{MotifPattern, MotifSet};

/// Scans one record for one motif.
///
/// Hits come out in increasing `start` order. A motif longer than the record
/// yields no hits.
pub fn scan_record(
    record: &SequenceRecord,
    record_index: usize,
    pattern: &MotifPattern,
    motif_index: usize,
) -> Vec<MotifHit> {
    let k = pattern.len();
    if k == 0 || k > record.len() {
        return Vec::new();
    }

    record
        .as_bytes()
        .windows(k)
        .enumerate()
        .filter(|(_, window)| pattern.matches(window))
        .map(|(start, _)| MotifHit {
            motif_index,
            record_index,
            start,
            end: start + k,
        })
        .collect()
}

/// Scans all records for all motifs.
///
/// Ordering: records in file order, then motifs in motif-file order, then
/// start position.
pub fn scan(genes: &GeneSet, motifs: &MotifSet) -> Vec<MotifHit> {
    let mut hits = Vec::new();
    for (record_index, record) in genes.iter().enumerate() {
        for (motif_index, pattern) in motifs.iter().enumerate() {
            let found = scan_record(record, record_index, pattern, motif_index);
            log::debug!(
                "{}: {} hits for motif '{}'",
                record.id,
                found.len(),
                pattern.raw()
            );
            hits.extend(found);
        }
    }
    hits
}

/// Returns the hits that belong to one record.
pub fn hits_for(hits: &[MotifHit], record_index: usize) -> impl Iterator<Item = &MotifHit> {
    hits.iter().filter(move |h| h.record_index == record_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fasta::parse_fasta_str;
    use crate::motif::parse_motifs_str;

    fn starts(sequence: &str, motif: &str) -> Vec<usize> {
        let record = SequenceRecord::new("g", sequence);
        let pattern = MotifPattern::compile(motif).unwrap();
        scan_record(&record, 0, &pattern, 0)
            .iter()
            .map(|h| h.start)
            .collect()
    }

    #[test]
    fn test_pyrimidine_code() {
        assert_eq!(starts("ACGTACGT", "Y"), vec![1, 3, 5, 7]);
        assert_eq!(starts("ACTTACTT", "Y"), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_self_overlapping_hits() {
        assert_eq!(starts("AAAAA", "AA"), vec![0, 1, 2, 3]);
        assert_eq!(starts("ttttt", "YYY"), vec![0, 1, 2]);
    }

    #[test]
    fn test_case_insensitive_scan() {
        assert_eq!(starts("aaGCATGcc", "gcaug"), vec![2]);
        assert_eq!(starts("aagcatgcc", "GCATG"), vec![2]);
    }

    #[test]
    fn test_motif_longer_than_sequence() {
        assert!(starts("ACG", "ACGT").is_empty());
        assert_eq!(starts("ACGT", "ACGT"), vec![0]);
    }

    #[test]
    fn test_hit_bounds() {
        let record = SequenceRecord::new("g", "CATAGCATAG");
        let pattern = MotifPattern::compile("catag").unwrap();
        let hits = scan_record(&record, 3, &pattern, 2);
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_eq!(hit.len(), 5);
            assert_eq!(hit.record_index, 3);
            assert_eq!(hit.motif_index, 2);
            assert!(hit.end <= record.len());
        }
    }

    #[test]
    fn test_scan_ordering() {
        let genes = parse_fasta_str(">a\nACGTAC\n>b\nCCAC\n").unwrap();
        let motifs = parse_motifs_str("AC\nC\n").unwrap();
        let hits = scan(&genes, &motifs);

        let keys: Vec<(usize, usize, usize)> = hits
            .iter()
            .map(|h| (h.record_index, h.motif_index, h.start))
            .collect();
        assert_eq!(
            keys,
            vec![
                (0, 0, 0),
                (0, 0, 4),
                (0, 1, 1),
                (0, 1, 5),
                (1, 0, 2),
                (1, 1, 0),
                (1, 1, 1),
                (1, 1, 3),
            ]
        );
        assert_eq!(hits_for(&hits, 1).count(), 4);
    }

    #[test]
    fn test_scan_is_repeatable() {
        let genes = parse_fasta_str(">a\nttgcatgCATGCAtgc\n").unwrap();
        let motifs = parse_motifs_str("ygcy\nGCAUG\n").unwrap();
        assert_eq!(scan(&genes, &motifs), scan(&genes, &motifs));
    }
}
