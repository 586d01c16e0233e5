//src/dereplicate.rs

use std::cmp::Ordering;
use std::path::Path;

use ahash::AHashMap;

use crate::error::Result;
use crate::fasta::read_fasta;
use crate::types::DereplicatedRecord;

/// Order in which dereplicated records are emitted: descending count, ties
/// broken by descending lexicographic sequence.
pub fn abundance_order(a: &DereplicatedRecord, b: &DereplicatedRecord) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| b.sequence.cmp(&a.sequence))
}

/// Collapses identical sequences into `(sequence, count)` records, keeps those
/// with `count >= min_count` and yields them in [`abundance_order`].
pub fn dereplicate<I>(sequences: I, min_count: usize) -> std::vec::IntoIter<DereplicatedRecord>
where
    I: IntoIterator<Item = String>,
{
    let mut occurrences: AHashMap<String, usize> = AHashMap::new();
    let mut reads = 0usize;
    for seq in sequences {
        reads += 1;
        *occurrences.entry(seq).or_insert(0) += 1;
    }
    let distinct = occurrences.len();

    let mut records: Vec<DereplicatedRecord> = occurrences
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .map(|(sequence, count)| DereplicatedRecord { sequence, count })
        .collect();
    records.sort_unstable_by(abundance_order);

    log::info!(
        "Dereplicated {} reads into {} distinct sequences, {} with count >= {}",
        reads,
        distinct,
        records.len(),
        min_count
    );

    records.into_iter()
}

/// Reads `amplicon_file` and dereplicates every sequence at least `min_seq_len` long.
pub fn dereplication_full_length<P: AsRef<Path>>(
    amplicon_file: P,
    min_seq_len: usize,
    min_count: usize,
) -> Result<std::vec::IntoIter<DereplicatedRecord>> {
    let reads = read_fasta(amplicon_file, min_seq_len)?.collect::<Result<Vec<String>>>()?;
    Ok(dereplicate(reads, min_count))
}
