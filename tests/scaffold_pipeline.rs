use proptest::prelude::*;
use scaffolder::config::{CloneLibrary, CloneLibraryInformation, ScaffoldConfig};
use scaffolder::scaffold::distance::{bundle_edges, weighted_edge, DistanceCalculator};
use scaffolder::scaffold::mate_mapper::MatePairMapper;
use scaffolder::scaffold::mate_pairs::{ContigMatePairs, MatePair, ValidMatePair};
use scaffolder::scaffold::orientation_filter::OrientationBasedMatePairFilter;
use scaffolder::scaffold::read_mapper::ReadContigMapper;
use scaffolder::scaffold::sequence::{Contig, Read};
use scaffolder::scaffold::ScaffoldBuilder;

const KMER_LENGTH: usize = 6;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn run_pipeline(contigs: &[Contig], reads: &[Read]) -> ContigMatePairs {
    let alignment = ReadContigMapper::new().map(contigs, reads, KMER_LENGTH).unwrap();
    let pairs = MatePairMapper::new()
        .map_contig_to_mate_pairs(reads, &alignment, contigs)
        .unwrap();
    let mut filtered = OrientationBasedMatePairFilter::new()
        .filter_paired_reads(pairs, 2)
        .unwrap();
    let libraries = CloneLibrary::default();
    DistanceCalculator::new(contigs, &libraries)
        .calculate_distance(&mut filtered)
        .unwrap();
    filtered
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn insulin_reads(y1: &str, libraries: [&str; 3], ends: [(&str, &str); 2]) -> Vec<Read> {
    let substrate = ">gi|263191773|ref|NG_015830.1| Homo sapiens insulin receptor substrate 1 (IRS1) on chromosome 2";
    let receptor = ">gi|263191773|ref|NG_015830.1| Homo sapiens insulin receptor on chromosome 2";
    let dotted = ">gi|263191773|ref | Homo sapiens ........insulin receptor on chromosome 2";
    vec![
        Read::new(format!("{}.{}:{}", substrate, ends[0].0, libraries[0]), "GATCTGATAA"),
        Read::new(format!("{}.{}:{}", receptor, ends[1].0, libraries[1]), "ATCTGATAAG"),
        Read::new(format!("{}.2:{}", dotted, libraries[2]), "TCTGATAAGG"),
        Read::new(format!("{}.{}:{}", substrate, ends[0].1, libraries[0]), y1),
        Read::new(format!("{}.{}:{}", receptor, ends[1].1, libraries[1]), "TTTTGATGGC"),
        Read::new(format!("{}.1:{}", dotted, libraries[2]), "TTTGATGGCA"),
    ]
}

#[test]
fn test_distance_two_forward_contigs() {
    init_tracing();
    let contigs = Contig::from_sequences(["GATCTGATAAGG", "TTTTTGATGGCA"]);
    let reads = insulin_reads("TTTTTGATGG", ["0.5K"; 3], [("X1", "Y1"), ("F", "R")]);

    let evidence = run_pipeline(&contigs, &reads);

    assert_eq!(evidence.len(), 1);
    assert!(evidence.contains_forward(0));
    let valid = evidence.get(0, 1).unwrap();
    assert_eq!(valid.len(), 1);
    assert_close(valid[0].distance_between_contigs[0], 478.0);
    assert_close(valid[0].distance_between_contigs[1], 477.0);
    assert_close(valid[0].standard_deviation[0], 14.142_136);
    assert_close(valid[0].standard_deviation[1], 14.142_136);
    assert_eq!(valid[0].weight, 2);
}

#[test]
fn test_distance_reverse_complement_contig() {
    init_tracing();
    let contigs = Contig::from_sequences(["GATCTGATAAGG", "TGCCATCAAAAA"]);
    let reads = insulin_reads("CCATCAAAAA", ["0.5K"; 3], [("X1", "Y1"), ("F", "R")]);

    let evidence = run_pipeline(&contigs, &reads);

    assert_eq!(evidence.len(), 1);
    let valid = evidence.get(0, 1).unwrap();
    assert_close(valid[0].distance_between_contigs[0], 477.0);
    assert_close(valid[0].distance_between_contigs[1], 478.0);
    assert_close(valid[0].standard_deviation[0], 14.142_136);
    assert_close(valid[0].standard_deviation[1], 14.142_136);
    assert_eq!(valid[0].weight, 2);
}

#[test]
fn test_distance_weighted_mean_across_libraries() {
    init_tracing();
    let contigs = Contig::from_sequences(["GATCTGATAAGG", "TTTTTGATGGCA"]);
    let reads = insulin_reads("TTTTTGATGG", ["2K", "0.5K", "0.5K"], [("x1", "y1"), ("f", "r")]);

    let evidence = run_pipeline(&contigs, &reads);

    let valid = evidence.get(0, 1).unwrap();
    assert_eq!(valid.len(), 1);
    assert_close(valid[0].distance_between_contigs[0], 1228.0);
    assert_close(valid[0].distance_between_contigs[1], 1227.0);
    assert_close(valid[0].standard_deviation[0], 60.0);
    assert_close(valid[0].standard_deviation[1], 60.0);
    assert_eq!(valid[0].weight, 2);
}

#[test]
fn test_builder_matches_stagewise_run() {
    init_tracing();
    let contigs = Contig::from_sequences(["GATCTGATAAGG", "TTTTTGATGGCA"]);
    let reads = insulin_reads("TTTTTGATGG", ["0.5K"; 3], [("X1", "Y1"), ("F", "R")]);

    let builder = ScaffoldBuilder::new(ScaffoldConfig {
        kmer_length: KMER_LENGTH,
        threads: 2,
        ..ScaffoldConfig::default()
    })
    .unwrap();
    let evidence = builder.build_evidence(&contigs, &reads).unwrap();

    assert_eq!(evidence.pair_count(), 1);
    let valid = evidence.get(0, 1).unwrap();
    assert_close(valid[0].distance_between_contigs[0], 478.0);
    assert_eq!(valid[0].weight, 2);
}

#[test]
fn test_single_pair_gap_estimate() {
    init_tracing();
    let contigs = vec![Contig::new(0, "A".repeat(100)), Contig::new(1, "C".repeat(100))];
    let libraries = CloneLibrary::from_libraries(&[CloneLibraryInformation::new("lib", 200.0, 20.0)]);
    let mut evidence = ContigMatePairs::new();
    evidence.insert(
        0,
        1,
        ValidMatePair::new(MatePair::new("p.F:lib", "p.R:lib", "lib"), 80, 10, 89),
    );

    DistanceCalculator::new(&contigs, &libraries)
        .calculate_distance(&mut evidence)
        .unwrap();

    let valid = evidence.get(0, 1).unwrap();
    assert_eq!(valid.len(), 1);
    assert_close(valid[0].distance_between_contigs[0], 169.0);
    assert_eq!(valid[0].weight, 1);
}

fn evidence_with_counts(ab: usize, ba: usize) -> ContigMatePairs {
    let mut pairs = ContigMatePairs::new();
    for i in 0..ab {
        let pair = MatePair::new(&format!("ab{}.F:0.5K", i), &format!("ab{}.R:0.5K", i), "0.5K");
        pairs.insert(0, 1, ValidMatePair::new(pair, 0, 0, 0));
    }
    for i in 0..ba {
        let pair = MatePair::new(&format!("ba{}.F:0.5K", i), &format!("ba{}.R:0.5K", i), "0.5K");
        pairs.insert(1, 0, ValidMatePair::new(pair, 0, 0, 0));
    }
    pairs
}

#[test]
fn prop_filter_balanced_evidence_collapses_to_one_side() {
    proptest!(|(count in 0usize..6, redundancy in 0i32..8)| {
        let filtered = OrientationBasedMatePairFilter::new()
            .filter_paired_reads(evidence_with_counts(count, count), redundancy)
            .unwrap();

        let ab = filtered.get(0, 1).map_or(0, |v| v.len());
        let ba = filtered.get(1, 0).map_or(0, |v| v.len());
        prop_assert_eq!(ba, 0);
        if 2 * count > redundancy as usize {
            prop_assert_eq!(ab, 2 * count);
        } else {
            prop_assert_eq!(ab, 0);
        }
    });
}

#[test]
fn prop_filter_clears_self_links() {
    proptest!(|(count in 1usize..20, redundancy in 0i32..4)| {
        let mut pairs = ContigMatePairs::new();
        for i in 0..count {
            let pair = MatePair::new(&format!("s{}.F:2K", i), &format!("s{}.R:2K", i), "2K");
            pairs.insert(3, 3, ValidMatePair::new(pair, 0, 0, 0));
        }
        let filtered = OrientationBasedMatePairFilter::new()
            .filter_paired_reads(pairs, redundancy)
            .unwrap();
        prop_assert!(filtered.is_empty());
    });
}

#[test]
fn prop_weighted_edge_conserves_weight_and_bounds_mean() {
    proptest!(|(distances in prop::collection::vec(-500.0f32..5000.0, 2..20))| {
        let mut evidence: Vec<ValidMatePair> = distances
            .iter()
            .map(|&d| ValidMatePair::with_estimates(vec![d, d], vec![10.0, 10.0], 1))
            .collect();

        weighted_edge(&mut evidence);

        let min = distances.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = distances.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        prop_assert_eq!(evidence.len(), 1);
        prop_assert_eq!(evidence[0].weight as usize, distances.len());
        prop_assert!(evidence[0].distance_between_contigs[0] >= min);
        prop_assert!(evidence[0].distance_between_contigs[0] <= max);
    });
}

#[test]
fn prop_bundling_is_idempotent() {
    proptest!(|(
        distances in prop::collection::vec(0.0f32..3000.0, 1..15),
        sigma in 1.0f32..200.0
    )| {
        let mut evidence: Vec<ValidMatePair> = distances
            .iter()
            .map(|&d| ValidMatePair::with_estimates(vec![d, d + 1.0], vec![sigma, sigma], 1))
            .collect();

        bundle_edges(&mut evidence);
        let total: u32 = evidence.iter().map(|p| p.weight).sum();
        prop_assert_eq!(total as usize, distances.len());

        weighted_edge(&mut evidence);
        let once = evidence.clone();
        bundle_edges(&mut evidence);
        prop_assert_eq!(evidence, once);
    });
}
