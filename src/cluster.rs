//src/cluster.rs

use rayon::prelude::*;

use crate::align::PairwiseAligner;
use crate::error::{AgcError, Result};
use crate::identity::get_identity;
use crate::types::{DereplicatedRecord, Otu};

/// Identity (in percent) at or above which a sequence belongs to an existing OTU.
pub const IDENTITY_THRESHOLD: f64 = 97.0;
pub const DEFAULT_CHUNK_SIZE: usize = 50;
pub const DEFAULT_KMER_SIZE: usize = 22;

/// Tuning of the greedy clustering.
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Minimum identity (percent) for a record to be absorbed by an OTU.
    pub identity_threshold: f64,
    /// Accepted for interface compatibility; the scan is exhaustive.
    pub chunk_size: usize,
    /// Accepted for interface compatibility; no k-mer pre-filter is applied.
    pub kmer_size: usize,
    /// Compare a record against the accepted OTUs on the rayon pool.
    /// The outcome is the same as the sequential scan.
    pub parallel: bool,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            identity_threshold: IDENTITY_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            kmer_size: DEFAULT_KMER_SIZE,
            parallel: false,
        }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.identity_threshold) {
            return Err(AgcError::InvalidParameter(format!(
                "identity threshold must be within [0, 100], got {}",
                self.identity_threshold
            )));
        }
        if self.chunk_size == 0 {
            return Err(AgcError::InvalidParameter("chunk size must be positive".to_string()));
        }
        if self.kmer_size == 0 {
            return Err(AgcError::InvalidParameter("k-mer size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Abundance-ordered greedy clustering.
///
/// Records must arrive in descending count order. Every record, the seed included,
/// must pass the aligner's alphabet check. The first record seeds OTU #1.
/// Every later record is aligned against the accepted OTUs in acceptance order and
/// is dropped as soon as one of them reaches the identity threshold; otherwise it
/// is appended as a new OTU with its own count.
pub struct GreedyClusterer<A: PairwiseAligner + Sync> {
    aligner: A,
    params: ClusterParams,
}

impl<A: PairwiseAligner + Sync> GreedyClusterer<A> {
    pub fn new(aligner: A, params: ClusterParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { aligner, params })
    }

    pub fn run<I>(&self, records: I) -> Result<Vec<Otu>>
    where
        I: IntoIterator<Item = DereplicatedRecord>,
    {
        log::debug!(
            "chunk_size={} kmer_size={} are not used by the exhaustive scan",
            self.params.chunk_size,
            self.params.kmer_size
        );

        let mut records = records.into_iter();
        let seed = records.next().ok_or(AgcError::NoSequences)?;
        self.aligner.check_alphabet(seed.sequence.as_bytes())?;
        let mut otus = vec![Otu::from(seed)];
        let mut seen = 1usize;

        for record in records {
            seen += 1;
            self.aligner.check_alphabet(record.sequence.as_bytes())?;
            match self.covering_otu(&record, &otus)? {
                Some(k) => {
                    log::debug!(
                        "sequence (count {}) absorbed by OTU_{}",
                        record.count,
                        k + 1
                    );
                }
                None => {
                    log::debug!("sequence (count {}) becomes OTU_{}", record.count, otus.len() + 1);
                    otus.push(Otu::from(record));
                }
            }
        }

        log::info!(
            "Greedy clustering kept {} OTUs out of {} dereplicated sequences",
            otus.len(),
            seen
        );
        Ok(otus)
    }

    /// Index of the first accepted OTU at or above the threshold, if any.
    fn covering_otu(&self, record: &DereplicatedRecord, otus: &[Otu]) -> Result<Option<usize>> {
        let threshold = self.params.identity_threshold;

        if !self.params.parallel {
            for (k, otu) in otus.iter().enumerate() {
                if self.identity(record, otu)? >= threshold {
                    return Ok(Some(k));
                }
            }
            return Ok(None);
        }

        // find_first keeps the earliest hit (or error) in acceptance order
        let found = otus
            .par_iter()
            .enumerate()
            .map(|(k, otu)| self.identity(record, otu).map(|id| (k, id)))
            .find_first(|res| match res {
                Ok((_, id)) => *id >= threshold,
                Err(_) => true,
            });

        match found {
            Some(Ok((k, _))) => Ok(Some(k)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    fn identity(&self, record: &DereplicatedRecord, otu: &Otu) -> Result<f64> {
        let pair = self
            .aligner
            .align(record.sequence.as_bytes(), otu.sequence.as_bytes())?;
        get_identity(&pair)
    }
}
