//! K-mer helpers shared by the contig index and the read mapper.

use bio::alphabets::dna;

/// Returns the reverse complement of a DNA k-mer.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    dna::revcomp(seq)
}

/// Iterates the k-mers of `seq` in order, paired with their start position.
///
/// Yields nothing when `k` is zero or longer than the sequence.
pub fn kmers(seq: &[u8], k: usize) -> impl Iterator<Item = (usize, &[u8])> {
    let windows = if k == 0 { None } else { Some(seq.windows(k)) };
    windows.into_iter().flatten().enumerate()
}

/// Number of k-mers in a sequence of length `len`.
pub fn kmer_count(len: usize, k: usize) -> usize {
    if k == 0 || len < k {
        0
    } else {
        len - k + 1
    }
}
