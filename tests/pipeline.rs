use std::fs;
use std::path::Path;

use motifmark::fasta::{parse_fasta_file, parse_fasta_str, FastaError};
use motifmark::layout::LayoutConfig;
use motifmark::model::SequenceRecord;
use motifmark::motif::{parse_motifs_file, parse_motifs_str, MotifError, MotifPattern};
use motifmark::pipeline::{build_figure, run, HitsOutput, PipelineError, RunConfig};
use motifmark::scan::scan_record;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GENES: &str = "\
>INSR chr19:7150261-7150808 (reverse complement)
gtcctccgcagccaagtttctgagagATTCCAGTGAATGTCGCATGCATGCTTCAT
GCATGTGCTTTTTCTCTTCTCagcttgcatgctgcgtgTGCATCAGGCA
>MBNL chr3:152446461-152447003
ttgcaggcctcttcatcccacgatgGGTTCCTTGCTAGTGCATGTTTTCTTCT
CCCTTTTCTTTCTCTTTTTGTTCAGTCTACATTTCAATTAGC
";

const MOTIFS: &str = "ygcy\nGCAUG\ncatag\nYYYYYYYYYY\n";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn random_dna(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| ['A', 'C', 'G', 'T'][rng.random_range(0..4)])
        .collect()
}

fn naive_positions(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.len() > haystack.len() {
        return Vec::new();
    }
    (0..=haystack.len() - needle.len())
        .filter(|&i| &haystack[i..i + needle.len()] == needle)
        .collect()
}

#[test]
fn test_record_count_matches_headers() {
    let genes = parse_fasta_str(GENES).unwrap();
    assert_eq!(genes.record_count(), GENES.matches('>').count());

    let insr_len: usize = GENES
        .lines()
        .skip(1)
        .take(2)
        .map(|l| l.trim().len())
        .sum();
    assert_eq!(genes.get(0).unwrap().len(), insr_len);
}

#[test]
fn test_exact_motifs_match_naive_search() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let sequence = random_dna(&mut rng, 300);
        let k = rng.random_range(1..6);
        let motif = random_dna(&mut rng, k);

        let record = SequenceRecord::new("r", sequence.as_str());
        let pattern = MotifPattern::compile(&motif).unwrap();
        let found: Vec<usize> = scan_record(&record, 0, &pattern, 0)
            .iter()
            .map(|h| h.start)
            .collect();

        assert_eq!(found, naive_positions(&sequence, &motif), "motif {}", motif);
    }
}

#[test]
fn test_motif_longer_than_gene_has_no_hits() {
    let genes = parse_fasta_str(">short\nACGT\n>long\nACGTACGTACGT\n").unwrap();
    let motifs = parse_motifs_str("ACGTACGT\n").unwrap();
    let figure = build_figure(&genes, &motifs, &LayoutConfig::default()).unwrap();

    assert!(figure.hits.iter().all(|h| h.record_index == 1));
    assert!(figure.geometry.rows[0].hits.is_empty());
    assert_eq!(figure.geometry.rows[1].hits.len(), 2);
}

#[test]
fn test_run_writes_png_named_after_fasta() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "Figure_1.fasta", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);

    let summary = run(&RunConfig::new(&fasta, &motifs)).unwrap();

    assert_eq!(summary.png, dir.path().join("Figure_1.png"));
    assert_eq!(summary.records, 2);
    assert_eq!(summary.motifs, 4);
    assert!(summary.hits > 0);

    let img = image::open(&summary.png).unwrap().to_rgba8();
    assert_eq!(img.width(), 1000);
    assert!(img.height() > 100);
}

#[test]
fn test_png_draws_backbone_at_scale() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(
        dir.path(),
        "scale.fa",
        &format!(">short\n{}\n>long\n{}\n", "A".repeat(200), "A".repeat(800)),
    );
    let motifs = write(dir.path(), "motifs.txt", "GGGG\n");

    let config = RunConfig::new(&fasta, &motifs);
    let summary = run(&config).unwrap();
    let img = image::open(&summary.png).unwrap().to_rgba8();

    let layout = &config.layout;
    let short_y = layout.top_padding as u32;
    let long_y = (layout.top_padding + layout.row_spacing) as u32;
    let short_end = layout.margin + 200.0 * layout.drawable_width() / 800.0;

    let dark = |x: f64, y: u32| img.get_pixel(x as u32, y)[0] < 128;
    // Inside both backbones
    assert!(dark(layout.margin + 10.0, short_y));
    assert!(dark(layout.margin + 10.0, long_y));
    // Past the end of the short backbone only the long one continues
    assert!(!dark(short_end + 20.0, short_y));
    assert!(dark(short_end + 20.0, long_y));
}

#[test]
fn test_png_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);

    let first = RunConfig {
        output: Some(dir.path().join("a.png")),
        ..RunConfig::new(&fasta, &motifs)
    };
    let second = RunConfig {
        output: Some(dir.path().join("b.png")),
        ..first.clone()
    };
    run(&first).unwrap();
    run(&second).unwrap();

    assert_eq!(
        fs::read(dir.path().join("a.png")).unwrap(),
        fs::read(dir.path().join("b.png")).unwrap()
    );
}

#[test]
fn test_svg_and_hit_table_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);
    let hits_path = dir.path().join("hits.tsv");

    let config = RunConfig {
        write_svg: true,
        hits: Some(HitsOutput::File(hits_path.clone())),
        ..RunConfig::new(&fasta, &motifs)
    };
    let summary = run(&config).unwrap();

    let svg = fs::read_to_string(summary.svg.unwrap()).unwrap();
    assert!(svg.contains("INSR"));
    assert!(svg.contains("YYYYYYYYYY"));

    let table = fs::read_to_string(hits_path).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("record\tmotif\tstart\tend"));
    assert_eq!(lines.count(), summary.hits);
}

#[test]
fn test_six_motifs_rejected_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", "A\nC\nG\nT\nYG\nRC\n");

    let result = run(&RunConfig::new(&fasta, &motifs));
    assert!(matches!(
        result,
        Err(PipelineError::Motif(MotifError::TooMany { found: 6, .. }))
    ));
    assert!(!dir.path().join("genes.png").exists());
}

#[test]
fn test_empty_fasta_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "empty.fa", "");
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);

    let result = run(&RunConfig::new(&fasta, &motifs));
    assert!(matches!(result, Err(PipelineError::Fasta(FastaError::EmptyFile))));
    assert!(!dir.path().join("empty.png").exists());
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);
    let missing = dir.path().join("nope.fa");

    let err = run(&RunConfig::new(&missing, &motifs)).unwrap_err();
    assert!(matches!(err, PipelineError::Io { action: "read", .. }));
    assert!(err.to_string().contains("nope.fa"));
}

#[test]
fn test_parse_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);

    assert_eq!(parse_fasta_file(&fasta).unwrap(), parse_fasta_str(GENES).unwrap());
    assert_eq!(parse_motifs_file(&motifs).unwrap(), parse_motifs_str(MOTIFS).unwrap());
    assert!(matches!(
        parse_fasta_file(dir.path().join("missing.fa")),
        Err(FastaError::IoError(_))
    ));
}

#[test]
fn test_unwritable_hit_table_leaves_no_png() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);

    let config = RunConfig {
        write_svg: true,
        hits: Some(HitsOutput::File(dir.path().join("no_such_dir/hits.tsv"))),
        ..RunConfig::new(&fasta, &motifs)
    };
    let result = run(&config);

    assert!(matches!(result, Err(PipelineError::Io { action: "write", .. })));
    assert!(!dir.path().join("genes.png").exists());
    assert!(!dir.path().join("genes.svg").exists());
}

#[test]
fn test_unwritable_png_removes_other_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", MOTIFS);
    let hits_path = dir.path().join("hits.tsv");

    let config = RunConfig {
        output: Some(dir.path().join("no_such_dir/out.png")),
        hits: Some(HitsOutput::File(hits_path.clone())),
        ..RunConfig::new(&fasta, &motifs)
    };
    let err = run(&config).unwrap_err();

    assert!(err.to_string().contains("out.png"));
    assert!(!hits_path.exists());
}

#[test]
fn test_repeated_motif_lines_count_toward_limit() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = write(dir.path(), "genes.fa", GENES);
    let motifs = write(dir.path(), "motifs.txt", "A\nC\nG\nT\nY\nA\n");

    let result = run(&RunConfig::new(&fasta, &motifs));
    assert!(matches!(
        result,
        Err(PipelineError::Motif(MotifError::TooMany { found: 6, .. }))
    ));
    assert!(!dir.path().join("genes.png").exists());
}
