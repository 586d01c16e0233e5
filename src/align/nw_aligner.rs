//src/align/nw_aligner.rs

//! Needleman-Wunsch global alignment with affine gap scores (Gotoh recurrences).

use super::matrix::ScoringMatrix;
use super::PairwiseAligner;
use crate::error::Result;
use crate::identity::GAP;
use crate::types::AlignedPair;

/// Gap scores used by the OTU clustering: every gap column costs 1.
pub const DEFAULT_GAP_OPEN: i32 = -1;
pub const DEFAULT_GAP_EXTEND: i32 = -1;

const NEG_INF: i32 = i32::MIN / 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// residue aligned to residue
    Diagonal,
    /// residue of the first sequence aligned to a gap
    Up,
    /// residue of the second sequence aligned to a gap
    Left,
}

/// Global aligner over a [`ScoringMatrix`].
///
/// Gap scores are added to the alignment score: a gap of length `L` scores
/// `gap_open + (L - 1) * gap_extend`, so penalties are usually negative.
/// Ties prefer a diagonal step, then a gap in the second sequence.
#[derive(Debug, Clone)]
pub struct NeedlemanWunsch {
    matrix: ScoringMatrix,
    gap_open: i32,
    gap_extend: i32,
}

/// The three Gotoh layers plus, for each cell and layer, the layer it came from.
struct DpTables {
    width: usize,
    diag: Vec<i32>,
    up: Vec<i32>,
    left: Vec<i32>,
    diag_from: Vec<State>,
    up_from: Vec<State>,
    left_from: Vec<State>,
}

impl DpTables {
    fn new(rows: usize, cols: usize) -> Self {
        let cells = (rows + 1) * (cols + 1);
        Self {
            width: cols + 1,
            diag: vec![NEG_INF; cells],
            up: vec![NEG_INF; cells],
            left: vec![NEG_INF; cells],
            diag_from: vec![State::Diagonal; cells],
            up_from: vec![State::Diagonal; cells],
            left_from: vec![State::Diagonal; cells],
        }
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        i * self.width + j
    }

    fn best(&self, idx: usize) -> (i32, State) {
        best_of(self.diag[idx], self.up[idx], self.left[idx])
    }
}

#[inline]
fn best_of(diag: i32, up: i32, left: i32) -> (i32, State) {
    if diag >= up && diag >= left {
        (diag, State::Diagonal)
    } else if up >= left {
        (up, State::Up)
    } else {
        (left, State::Left)
    }
}

impl NeedlemanWunsch {
    pub fn new(matrix: ScoringMatrix) -> Self {
        Self {
            matrix,
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
        }
    }

    pub fn with_gap_penalties(mut self, gap_open: i32, gap_extend: i32) -> Self {
        self.gap_open = gap_open;
        self.gap_extend = gap_extend;
        self
    }

    /// Aligns `first` against `second`, returning the gapped rows and the score.
    pub fn align_scored(&self, first: &[u8], second: &[u8]) -> Result<(AlignedPair, i32)> {
        let a = self.matrix.encode(first)?;
        let b = self.matrix.encode(second)?;
        let (n, m) = (a.len(), b.len());

        let mut dp = DpTables::new(n, m);
        self.fill(&mut dp, &a, &b);

        let (score, end_state) = dp.best(dp.at(n, m));
        let pair = Self::traceback(&dp, first, second, end_state);
        Ok((pair, score))
    }

    fn gap_run(&self, len: usize) -> i32 {
        self.gap_open + self.gap_extend * (len as i32 - 1)
    }

    fn fill(&self, dp: &mut DpTables, a: &[usize], b: &[usize]) {
        let (n, m) = (a.len(), b.len());

        let origin = dp.at(0, 0);
        dp.diag[origin] = 0;

        for i in 1..=n {
            let idx = dp.at(i, 0);
            dp.up[idx] = self.gap_run(i);
            dp.up_from[idx] = if i == 1 { State::Diagonal } else { State::Up };
        }
        for j in 1..=m {
            let idx = dp.at(0, j);
            dp.left[idx] = self.gap_run(j);
            dp.left_from[idx] = if j == 1 { State::Diagonal } else { State::Left };
        }

        for i in 1..=n {
            for j in 1..=m {
                let idx = dp.at(i, j);
                let diag_prev = dp.at(i - 1, j - 1);
                let up_prev = dp.at(i - 1, j);
                let left_prev = dp.at(i, j - 1);

                let (best, from) = dp.best(diag_prev);
                dp.diag[idx] = best + self.matrix.score_at(a[i - 1], b[j - 1]);
                dp.diag_from[idx] = from;

                let (best, from) = best_of(
                    dp.diag[up_prev] + self.gap_open,
                    dp.up[up_prev] + self.gap_extend,
                    dp.left[up_prev] + self.gap_open,
                );
                dp.up[idx] = best;
                dp.up_from[idx] = from;

                let (best, from) = best_of(
                    dp.diag[left_prev] + self.gap_open,
                    dp.up[left_prev] + self.gap_open,
                    dp.left[left_prev] + self.gap_extend,
                );
                dp.left[idx] = best;
                dp.left_from[idx] = from;
            }
        }
    }

    fn traceback(dp: &DpTables, first: &[u8], second: &[u8], end_state: State) -> AlignedPair {
        let mut first_aligned = Vec::with_capacity(first.len() + second.len());
        let mut second_aligned = Vec::with_capacity(first.len() + second.len());

        let (mut i, mut j) = (first.len(), second.len());
        let mut state = end_state;
        while i > 0 || j > 0 {
            let idx = dp.at(i, j);
            match state {
                State::Diagonal => {
                    first_aligned.push(first[i - 1]);
                    second_aligned.push(second[j - 1]);
                    state = dp.diag_from[idx];
                    i -= 1;
                    j -= 1;
                }
                State::Up => {
                    first_aligned.push(first[i - 1]);
                    second_aligned.push(GAP);
                    state = dp.up_from[idx];
                    i -= 1;
                }
                State::Left => {
                    first_aligned.push(GAP);
                    second_aligned.push(second[j - 1]);
                    state = dp.left_from[idx];
                    j -= 1;
                }
            }
        }

        first_aligned.reverse();
        second_aligned.reverse();
        AlignedPair::new(first_aligned, second_aligned)
    }
}

impl PairwiseAligner for NeedlemanWunsch {
    fn align(&self, first: &[u8], second: &[u8]) -> Result<AlignedPair> {
        self.align_scored(first, second).map(|(pair, _)| pair)
    }

    fn check_alphabet(&self, seq: &[u8]) -> Result<()> {
        self.matrix.encode(seq).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgcError;
    use crate::identity::get_identity;

    fn aligner() -> NeedlemanWunsch {
        NeedlemanWunsch::new(ScoringMatrix::bundled().unwrap())
    }

    fn strip_gaps(row: &[u8]) -> Vec<u8> {
        row.iter().copied().filter(|&c| c != GAP).collect()
    }

    #[test]
    fn test_identical_sequences() {
        let (pair, score) = aligner().align_scored(b"ACGTACGT", b"ACGTACGT").unwrap();
        assert_eq!(pair.first, b"ACGTACGT");
        assert_eq!(pair.second, b"ACGTACGT");
        assert_eq!(score, 40);
    }

    #[test]
    fn test_single_deletion() {
        let (pair, score) = aligner().align_scored(b"ACGTT", b"ACTT").unwrap();
        assert_eq!(pair.first, b"ACGTT");
        assert_eq!(pair.second, b"AC-TT");
        assert_eq!(score, 4 * 5 - 1);
    }

    #[test]
    fn test_length_difference_forces_gap_column() {
        let pair = aligner().align(b"ACGT", b"ACG").unwrap();
        assert_eq!(pair.first.len(), pair.second.len());
        assert_eq!(pair.first, b"ACGT");
        assert_eq!(pair.second, b"ACG-");
        assert_eq!(get_identity(&pair).unwrap(), 75.0);
    }

    #[test]
    fn test_affine_gaps_prefer_one_long_gap() {
        let nw = aligner().with_gap_penalties(-10, -1);
        let pair = nw.align(b"AAAAGGGGTTTT", b"AAAATTTT").unwrap();
        assert_eq!(pair.second, b"AAAA----TTTT");
    }

    #[test]
    fn test_rows_preserve_input() {
        let first = b"TTGACCATGCAAT";
        let second = b"TGACCTGCAATTA";
        let pair = aligner().align(first, second).unwrap();
        assert_eq!(pair.first.len(), pair.second.len());
        assert_eq!(strip_gaps(&pair.first), first.to_vec());
        assert_eq!(strip_gaps(&pair.second), second.to_vec());
    }

    #[test]
    fn test_empty_inputs() {
        let pair = aligner().align(b"", b"ACG").unwrap();
        assert_eq!(pair.first, b"---");
        assert_eq!(pair.second, b"ACG");

        let pair = aligner().align(b"", b"").unwrap();
        assert!(pair.first.is_empty() && pair.second.is_empty());
    }

    #[test]
    fn test_check_alphabet() {
        let nw = aligner();
        assert!(nw.check_alphabet(b"ACGTRYKMSWBDHVN").is_ok());
        assert!(matches!(
            nw.check_alphabet(b"ACGTX"),
            Err(AgcError::UnknownResidue { residue: 'X' })
        ));
    }

    #[test]
    fn test_alphabet_mismatch_is_an_error() {
        assert!(matches!(
            aligner().align(b"ACGU", b"ACGT"),
            Err(AgcError::UnknownResidue { residue: 'U' })
        ));
    }
}
