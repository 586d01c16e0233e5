//src/writer.rs

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::Otu;

/// Column width of the wrapped sequence lines.
pub const LINE_WIDTH: usize = 80;

/// Renders OTUs as FASTA: `>OTU_<n> occurrence:<count>` followed by the
/// sequence wrapped at [`LINE_WIDTH`] columns.
pub fn format_otu(otus: &[Otu]) -> String {
    let mut output = String::new();
    // formatting into a String cannot fail
    let _ = render(&mut output, otus);
    output
}

fn render<W: fmt::Write>(out: &mut W, otus: &[Otu]) -> fmt::Result {
    for (i, otu) in otus.iter().enumerate() {
        writeln!(out, ">OTU_{} occurrence:{}", i + 1, otu.count)?;
        write_wrapped(out, &otu.sequence, LINE_WIDTH)?;
    }
    Ok(())
}

fn write_wrapped<W: fmt::Write>(out: &mut W, sequence: &str, width: usize) -> fmt::Result {
    let mut rest = sequence;
    loop {
        let split = rest.char_indices().nth(width).map_or(rest.len(), |(at, _)| at);
        let (line, tail) = rest.split_at(split);
        writeln!(out, "{}", line)?;
        if tail.is_empty() {
            return Ok(());
        }
        rest = tail;
    }
}

/// Writes [`format_otu`] output to `output_file`, replacing any existing file.
pub fn write_otu<P: AsRef<Path>>(otus: &[Otu], output_file: P) -> Result<()> {
    let mut out = BufWriter::new(File::create(output_file)?);
    out.write_all(format_otu(otus).as_bytes())?;
    out.flush()?;
    Ok(())
}
