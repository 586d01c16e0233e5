//src/types.rs

/// A distinct sequence with the number of reads that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DereplicatedRecord {
    pub sequence: String,
    pub count: usize,
}

/// An accepted cluster representative.
///
/// `count` is the dereplicated count of the representative at acceptance time;
/// counts of the sequences it absorbs are not added to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otu {
    pub sequence: String,
    pub count: usize,
}

impl From<DereplicatedRecord> for Otu {
    fn from(record: DereplicatedRecord) -> Self {
        Self {
            sequence: record.sequence,
            count: record.count,
        }
    }
}

/// Two gapped sequences of equal length, as produced by a global alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub first: Vec<u8>,
    pub second: Vec<u8>,
}

impl AlignedPair {
    pub fn new(first: impl Into<Vec<u8>>, second: impl Into<Vec<u8>>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Same pair with the two rows swapped.
    pub fn swapped(&self) -> Self {
        Self {
            first: self.second.clone(),
            second: self.first.clone(),
        }
    }
}
