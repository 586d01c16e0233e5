//src/align/matrix.rs

use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::error::{AgcError, Result};

/// NCBI NUC.4.4 nucleotide matrix (IUPAC ambiguity codes included), shipped with the crate.
pub const BUNDLED_MATCH: &str = include_str!("../../data/MATCH");

/// Substitution scores between residues, loaded from the NCBI text layout:
/// ```text
/// # comment
///    A  T  G  C
/// A  5 -4 -4 -4
/// T -4  5 -4 -4
/// ...
/// ```
/// Residue lookup is case-insensitive.
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    residues: Vec<u8>,
    index_map: AHashMap<u8, usize>,
    scores: Vec<i32>,
}

impl ScoringMatrix {
    /// The bundled `MATCH` matrix.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_MATCH)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_no, header) = lines.next().ok_or_else(|| AgcError::MatrixParse {
            line: 0,
            reason: "no residue header".to_string(),
        })?;

        let mut residues = Vec::new();
        let mut index_map = AHashMap::new();
        for token in header.split_whitespace() {
            let residue = single_residue(token, header_no)?;
            if index_map.insert(residue, residues.len()).is_some() {
                return Err(AgcError::MatrixParse {
                    line: header_no,
                    reason: format!("duplicate residue '{}'", residue as char),
                });
            }
            residues.push(residue);
        }

        let n = residues.len();
        let mut scores = vec![0i32; n * n];
        let mut seen = vec![false; n];

        for (line_no, line) in lines {
            let mut fields = line.split_whitespace();
            let residue = match fields.next() {
                Some(token) => single_residue(token, line_no)?,
                None => continue,
            };
            let row = *index_map.get(&residue).ok_or_else(|| AgcError::MatrixParse {
                line: line_no,
                reason: format!("row residue '{}' missing from header", residue as char),
            })?;
            if seen[row] {
                return Err(AgcError::MatrixParse {
                    line: line_no,
                    reason: format!("duplicate row for '{}'", residue as char),
                });
            }

            let values = fields
                .map(|f| f.parse::<i32>())
                .collect::<std::result::Result<Vec<i32>, _>>()
                .map_err(|e| AgcError::MatrixParse {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            if values.len() != n {
                return Err(AgcError::MatrixParse {
                    line: line_no,
                    reason: format!("expected {} scores, found {}", n, values.len()),
                });
            }
            scores[row * n..(row + 1) * n].copy_from_slice(&values);
            seen[row] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(AgcError::MatrixParse {
                line: header_no,
                reason: format!("no row for residue '{}'", residues[missing] as char),
            });
        }

        Ok(Self {
            residues,
            index_map,
            scores,
        })
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn index_of(&self, residue: u8) -> Result<usize> {
        self.index_map
            .get(&residue.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| AgcError::UnknownResidue {
                residue: residue as char,
            })
    }

    /// Score by matrix indices, as returned by [`ScoringMatrix::index_of`].
    #[inline]
    pub fn score_at(&self, i: usize, j: usize) -> i32 {
        self.scores[i * self.residues.len() + j]
    }

    pub fn score(&self, a: u8, b: u8) -> Result<i32> {
        Ok(self.score_at(self.index_of(a)?, self.index_of(b)?))
    }

    /// Maps every residue of `seq` to its matrix index.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<usize>> {
        seq.iter().map(|&r| self.index_of(r)).collect()
    }
}

fn single_residue(token: &str, line: usize) -> Result<u8> {
    match token.as_bytes() {
        [r] => Ok(r.to_ascii_uppercase()),
        _ => Err(AgcError::MatrixParse {
            line,
            reason: format!("'{}' is not a single residue", token),
        }),
    }
}
