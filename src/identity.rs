//src/identity.rs

use crate::error::{AgcError, Result};
use crate::types::AlignedPair;

/// Gap character inserted by the aligner.
pub const GAP: u8 = b'-';

/// Percentage of alignment columns holding the same residue on both rows,
/// rounded to two decimals.
///
/// A column where either row has a gap never counts as identical, so a
/// gap/gap column is a mismatch. Both rows must have the same non-zero length.
pub fn get_identity(alignment: &AlignedPair) -> Result<f64> {
    let (first, second) = (&alignment.first, &alignment.second);
    if first.len() != second.len() {
        return Err(AgcError::AlignmentLengthMismatch {
            left: first.len(),
            right: second.len(),
        });
    }
    if first.is_empty() {
        return Err(AgcError::EmptyAlignment);
    }

    let identical = first
        .iter()
        .zip(second.iter())
        .filter(|&(&a, &b)| a == b && a != GAP)
        .count();

    let rate = 100.0 * identical as f64 / first.len() as f64;
    Ok((rate * 100.0).round() / 100.0)
}
