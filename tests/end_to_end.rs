use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use agc_rs::dereplicate::dereplication_full_length;
use agc_rs::{
    abundance_greedy_clustering, cluster_amplicons, AgcError, ClusterParams, ClusteringOptions, Otu,
};

fn write_gz(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

/// Deterministic pseudo-random nucleotide sequence.
fn random_sequence(len: usize, mut state: u64) -> String {
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state % 4) as usize] as char
        })
        .collect()
}

fn fasta(records: &[(&str, usize)]) -> String {
    let mut text = String::new();
    let mut n = 0;
    for (seq, copies) in records {
        for _ in 0..*copies {
            n += 1;
            writeln!(text, ">read{} sample=1", n).unwrap();
            // wrap bodies at 60 columns like typical FASTA
            for chunk in seq.as_bytes().chunks(60) {
                writeln!(text, "{}", std::str::from_utf8(chunk).unwrap()).unwrap();
            }
        }
    }
    text
}

#[test]
fn test_two_distinct_amplicons() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_gz(
        dir.path(),
        "amplicon.fasta.gz",
        ">r1\nAAAA\n>r2\nAAAA\n>r3\nTTTT\n>r4\nTTTT\n>r5\nTTTT\n",
    );

    let records: Vec<_> = dereplication_full_length(&input, 4, 2).unwrap().collect();
    assert_eq!(records.len(), 2);
    assert_eq!((records[0].sequence.as_str(), records[0].count), ("TTTT", 3));
    assert_eq!((records[1].sequence.as_str(), records[1].count), ("AAAA", 2));

    let options = ClusteringOptions {
        min_seq_len: 4,
        min_count: 2,
        ..ClusteringOptions::default()
    };
    let results = cluster_amplicons(&input, &options).unwrap();
    let output = dir.path().join("OTU.fasta");
    results.write(&output).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        ">OTU_1 occurrence:3\nTTTT\n>OTU_2 occurrence:2\nAAAA\n"
    );
}

#[test]
fn test_variants_collapse_into_abundant_otus() {
    let dir = tempfile::tempdir().unwrap();

    let first = random_sequence(420, 0x9E37_79B9_7F4A_7C15);
    let second = random_sequence(430, 0x1234_5678_9ABC_DEF1);
    // a single substitution keeps the variant well above 97% identity
    let mut variant = first.clone().into_bytes();
    variant[200] = if variant[200] == b'A' { b'C' } else { b'A' };
    let variant = String::from_utf8(variant).unwrap();
    let too_short = random_sequence(120, 42);

    let input = write_gz(
        dir.path(),
        "amplicon.fasta.gz",
        &fasta(&[
            (first.as_str(), 30),
            (variant.as_str(), 15),
            (second.as_str(), 12),
            (too_short.as_str(), 50),
            (random_sequence(410, 7).as_str(), 3),
        ]),
    );

    let otus = abundance_greedy_clustering(&input, 400, 10, 50, 22).unwrap();
    assert_eq!(
        otus,
        vec![
            Otu { sequence: first.clone(), count: 30 },
            Otu { sequence: second.clone(), count: 12 },
        ]
    );

    let parallel = cluster_amplicons(
        &input,
        &ClusteringOptions {
            params: ClusterParams {
                parallel: true,
                ..ClusterParams::default()
            },
            ..ClusteringOptions::default()
        },
    )
    .unwrap();
    assert_eq!(parallel.otus, otus);
    assert_eq!(parallel.dereplicated_count, 3);
}

#[test]
fn test_no_sequences_found() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_gz(dir.path(), "amplicon.fasta.gz", ">r1\nACGT\n>r2\nACGT\n");
    let err = abundance_greedy_clustering(&input, 400, 10, 50, 22).unwrap_err();
    assert!(matches!(err, AgcError::NoSequences));
    assert!(!dir.path().join("OTU.fasta").exists());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.fasta.gz");
    let err = abundance_greedy_clustering(&missing, 4, 1, 50, 22).unwrap_err();
    assert!(matches!(err, AgcError::InputNotFound(ref p) if *p == missing));
    assert_eq!(err.to_string(), "absent.fasta.gz does not exist.");
}

#[test]
fn test_directory_input() {
    let dir = tempfile::tempdir().unwrap();
    let reads = dir.path().join("reads");
    fs::create_dir(&reads).unwrap();
    let err = cluster_amplicons(&reads, &ClusteringOptions::default()).unwrap_err();
    assert!(matches!(err, AgcError::InputIsDirectory(_)));
    assert_eq!(err.to_string(), "reads is a directory.");
}

#[test]
fn test_residue_outside_matrix_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_gz(
        dir.path(),
        "amplicon.fasta.gz",
        ">r1\nACGT\n>r2\nACGT\n>r3\nACGU\n",
    );
    let err = abundance_greedy_clustering(&input, 4, 1, 50, 22).unwrap_err();
    assert!(matches!(err, AgcError::UnknownResidue { residue: 'U' }));
}

#[test]
fn test_unknown_residue_in_most_abundant_read() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_gz(
        dir.path(),
        "amplicon.fasta.gz",
        ">r1\nACXT\n>r2\nACXT\n>r3\nACXT\n>r4\nACGT\n",
    );
    let err = abundance_greedy_clustering(&input, 4, 1, 50, 22).unwrap_err();
    assert!(matches!(err, AgcError::UnknownResidue { residue: 'X' }));
}
