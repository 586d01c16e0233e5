use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{AgcError, Result};

/// Header marker opening every FASTA record.
pub const HEADER_PREFIX: char = '>';

/// Checks that `path` names an existing regular file.
pub fn check_input_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        Err(AgcError::InputIsDirectory(path.to_path_buf()))
    } else {
        Err(AgcError::InputNotFound(path.to_path_buf()))
    }
}

/// Opens a FASTA file (gzip-compressed if it ends with ".gz") and returns a lazy
/// iterator over its sequences that are at least `min_seq_len` long.
///
/// Every call re-opens the file, so the iterator can be recreated freely.
pub fn read_fasta<P: AsRef<Path>>(path: P, min_seq_len: usize) -> Result<FastaReader> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    Ok(FastaReader::new(reader, min_seq_len))
}

/// Streaming FASTA parser yielding one normalized sequence per record.
///
/// Lines between two headers are concatenated with all whitespace removed and
/// upper-cased. The length filter applies to every record, the last one included,
/// and empty sequences are never yielded.
pub struct FastaReader {
    reader: Box<dyn BufRead>,
    min_seq_len: usize,
    line: String,
    sequence: String,
    finished: bool,
}

impl FastaReader {
    pub fn new(reader: Box<dyn BufRead>, min_seq_len: usize) -> Self {
        Self {
            reader,
            min_seq_len,
            line: String::new(),
            sequence: String::new(),
            finished: false,
        }
    }

    fn flush(&mut self) -> Option<String> {
        let seq = std::mem::take(&mut self.sequence);
        if !seq.is_empty() && seq.len() >= self.min_seq_len {
            Some(seq)
        } else {
            None
        }
    }
}

impl Iterator for FastaReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.finished = true;
                    return self.flush().map(Ok);
                }
                Ok(_) => {
                    if self.line.starts_with(HEADER_PREFIX) {
                        if let Some(seq) = self.flush() {
                            return Some(Ok(seq));
                        }
                    } else {
                        let body = self
                            .line
                            .chars()
                            .filter(|c| !c.is_whitespace())
                            .map(|c| c.to_ascii_uppercase());
                        self.sequence.extend(body);
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
