pub mod matrix;
pub mod nw_aligner;

pub use matrix::{ScoringMatrix, BUNDLED_MATCH};
pub use nw_aligner::NeedlemanWunsch;

use crate::error::Result;
use crate::types::AlignedPair;

/// Global pairwise alignment capability used by the clusterer.
///
/// Implementations return both rows padded with `-` to a common length.
pub trait PairwiseAligner {
    fn align(&self, first: &[u8], second: &[u8]) -> Result<AlignedPair>;

    /// Fails if `seq` holds a residue this aligner cannot score.
    fn check_alphabet(&self, _seq: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl<A: PairwiseAligner + ?Sized> PairwiseAligner for &A {
    fn align(&self, first: &[u8], second: &[u8]) -> Result<AlignedPair> {
        (**self).align(first, second)
    }

    fn check_alphabet(&self, seq: &[u8]) -> Result<()> {
        (**self).check_alphabet(seq)
    }
}
