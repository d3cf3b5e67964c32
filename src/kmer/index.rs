//! Exact k-mer index over a contig set.
//!
//! Every k-mer of every contig maps to the contigs it occurs in; repeated
//! occurrences within one contig are folded into a single [`KmerIndexer`]
//! carrying all positions. Lookups are exact, so seeding tolerates no
//! mismatches.

use crate::kmer::kmer::{kmer_count, kmers, reverse_complement};
use ahash::AHashMap;
use rayon::prelude::*;

/// Occurrences of one k-mer inside one contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerIndexer {
    /// Index of the contig in the indexed set
    pub contig_index: usize,
    /// Start positions of the k-mer in that contig, ascending
    pub positions: Vec<usize>,
}

pub struct ContigKmerIndex {
    /// Maps k-mer bytes -> occurrences, ordered by contig index
    index: AHashMap<Vec<u8>, Vec<KmerIndexer>>,
    k: usize,
}

impl ContigKmerIndex {
    fn with_capacity(k: usize, capacity: usize) -> Self {
        Self {
            index: AHashMap::with_capacity(capacity),
            k,
        }
    }

    /// Build the index for a contig set.
    ///
    /// Contigs are indexed in parallel into per-contig tables which are then
    /// merged in contig order, so hit lists come out sorted by contig index.
    pub fn build<S: AsRef<[u8]> + Sync>(sequences: &[S], k: usize) -> Self {
        let estimated: usize = sequences
            .iter()
            .map(|s| kmer_count(s.as_ref().len(), k))
            .sum();

        let per_contig: Vec<AHashMap<&[u8], Vec<usize>>> = sequences
            .par_iter()
            .map(|seq| {
                let seq = seq.as_ref();
                let mut local: AHashMap<&[u8], Vec<usize>> =
                    AHashMap::with_capacity(kmer_count(seq.len(), k));
                for (pos, kmer) in kmers(seq, k) {
                    local.entry(kmer).or_default().push(pos);
                }
                local
            })
            .collect();

        let mut index = Self::with_capacity(k, estimated);
        for (contig_index, local) in per_contig.into_iter().enumerate() {
            for (kmer, positions) in local {
                index
                    .index
                    .entry(kmer.to_vec())
                    .or_default()
                    .push(KmerIndexer {
                        contig_index,
                        positions,
                    });
            }
        }

        index
    }

    pub fn lookup(&self, kmer: &[u8]) -> Option<&[KmerIndexer]> {
        self.index.get(kmer).map(|hits| hits.as_slice())
    }

    /// Look the k-mer up as given, falling back to its reverse complement.
    pub fn lookup_either_strand(&self, kmer: &[u8]) -> Option<&[KmerIndexer]> {
        self.lookup(kmer)
            .or_else(|| self.lookup(&reverse_complement(kmer)))
    }

    /// Number of distinct k-mers in the index.
    pub fn num_kmers(&self) -> usize {
        self.index.len()
    }

    /// Total number of (k-mer, contig) entries.
    pub fn num_entries(&self) -> usize {
        self.index.values().map(|v| v.len()).sum()
    }

    pub fn k(&self) -> usize {
        self.k
    }
}
