// src/lib.rs
pub mod align;
pub mod cluster;
pub mod dereplicate;
pub mod error;
pub mod fasta;
pub mod identity;
pub mod types;
pub mod writer;

use std::path::{Path, PathBuf};

pub use crate::align::{NeedlemanWunsch, PairwiseAligner, ScoringMatrix};
pub use crate::cluster::{ClusterParams, GreedyClusterer};
pub use crate::error::{AgcError, Result};
pub use crate::types::{AlignedPair, DereplicatedRecord, Otu};

use crate::align::nw_aligner::{DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};
use crate::dereplicate::dereplication_full_length;
use crate::fasta::check_input_file;
use crate::writer::{format_otu, write_otu};

pub const DEFAULT_MIN_SEQ_LEN: usize = 400;
pub const DEFAULT_MIN_COUNT: usize = 10;
pub const DEFAULT_OUTPUT_FILE: &str = "OTU.fasta";

/// Everything needed to go from an amplicon file to an OTU list.
#[derive(Debug, Clone)]
pub struct ClusteringOptions {
    pub min_seq_len: usize,
    pub min_count: usize,
    /// Substitution matrix in NCBI text format; the bundled `MATCH` when unset.
    pub matrix_path: Option<PathBuf>,
    /// Gap scores for the Needleman-Wunsch aligner, added to the alignment score.
    pub gap_open: i32,
    pub gap_extend: i32,
    pub params: ClusterParams,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        Self {
            min_seq_len: DEFAULT_MIN_SEQ_LEN,
            min_count: DEFAULT_MIN_COUNT,
            matrix_path: None,
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
            params: ClusterParams::default(),
        }
    }
}

/// OTUs in acceptance order, plus the size of the stream they were picked from.
#[derive(Debug, Clone)]
pub struct ClusteringResults {
    pub otus: Vec<Otu>,
    pub dereplicated_count: usize,
}

impl ClusteringResults {
    /// Generate the OTU FASTA text on demand
    pub fn get_otu_fasta(&self) -> String {
        format_otu(&self.otus)
    }

    pub fn write<P: AsRef<Path>>(&self, output_file: P) -> Result<()> {
        write_otu(&self.otus, output_file)
    }
}

/// Reads, dereplicates and clusters `amplicon_file`.
pub fn cluster_amplicons<P: AsRef<Path>>(
    amplicon_file: P,
    options: &ClusteringOptions,
) -> Result<ClusteringResults> {
    // 1. Input and aligner, so bad arguments fail before any read is parsed
    let amplicon_file = amplicon_file.as_ref();
    check_input_file(amplicon_file)?;
    let matrix = match &options.matrix_path {
        Some(path) => ScoringMatrix::from_file(path)?,
        None => ScoringMatrix::bundled()?,
    };
    let aligner = NeedlemanWunsch::new(matrix)
        .with_gap_penalties(options.gap_open, options.gap_extend);
    let clusterer = GreedyClusterer::new(aligner, options.params.clone())?;

    // 2. Dereplicate
    let records = dereplication_full_length(amplicon_file, options.min_seq_len, options.min_count)?;
    let dereplicated_count = records.len();
    if dereplicated_count == 0 {
        log::warn!(
            "No sequence is at least {} long with count >= {}",
            options.min_seq_len,
            options.min_count
        );
    }

    // 3. Greedy clustering
    let otus = clusterer.run(records)?;

    Ok(ClusteringResults {
        otus,
        dereplicated_count,
    })
}

/// Greedy abundance clustering with the default aligner and threshold.
///
/// `chunk_size` and `kmer_size` are accepted for compatibility and do not change
/// the result.
pub fn abundance_greedy_clustering<P: AsRef<Path>>(
    amplicon_file: P,
    min_seq_len: usize,
    min_count: usize,
    chunk_size: usize,
    kmer_size: usize,
) -> Result<Vec<Otu>> {
    let options = ClusteringOptions {
        min_seq_len,
        min_count,
        params: ClusterParams {
            chunk_size,
            kmer_size,
            ..ClusterParams::default()
        },
        ..ClusteringOptions::default()
    };
    cluster_amplicons(amplicon_file, &options).map(|results| results.otus)
}
