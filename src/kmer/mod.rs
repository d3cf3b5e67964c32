//! K-mer seeding: sequence helpers and the contig k-mer index.

pub mod index;
pub mod kmer;
