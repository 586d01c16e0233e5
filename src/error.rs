//src/error.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can stop a clustering run.
///
/// All variants are fatal: the pipeline never produces a partial OTU list.
#[derive(Error, Debug)]
pub enum AgcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} does not exist.", file_label(.0))]
    InputNotFound(PathBuf),

    #[error("{} is a directory.", file_label(.0))]
    InputIsDirectory(PathBuf),

    #[error("no sequences found: nothing passed the length and count thresholds")]
    NoSequences,

    #[error("malformed substitution matrix at line {line}: {reason}")]
    MatrixParse { line: usize, reason: String },

    #[error("residue '{residue}' is not covered by the substitution matrix")]
    UnknownResidue { residue: char },

    #[error("aligned sequences differ in length ({left} vs {right})")]
    AlignmentLengthMismatch { left: usize, right: usize },

    #[error("cannot compute identity of an empty alignment")]
    EmptyAlignment,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, AgcError>;

/// Final path component, or the whole path when there is none.
fn file_label(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
