use serde::{Deserialize, Serialize};

/// An assembled contig. `id` is its index in the assembler's contig list and
/// is the key used throughout the scaffolder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    pub id: usize,
    pub sequence: String,
}

impl Contig {
    pub fn new(id: usize, sequence: impl Into<String>) -> Self {
        Self {
            id,
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Number the sequences in order.
    pub fn from_sequences<S: Into<String>>(sequences: impl IntoIterator<Item = S>) -> Vec<Contig> {
        sequences
            .into_iter()
            .enumerate()
            .map(|(id, seq)| Contig::new(id, seq))
            .collect()
    }
}

impl AsRef<[u8]> for Contig {
    fn as_ref(&self) -> &[u8] {
        self.sequence.as_bytes()
    }
}

/// One end of a paired-end fragment.
///
/// The mate and library are encoded in the id, e.g. `frag7.X1:0.5K`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    pub id: String,
    pub sequence: String,
}

impl Read {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
