//! Paired-end scaffolding for assembled contigs.
//!
//! Reads are mapped onto contigs by exact k-mer seeding, mate pairs whose ends
//! land on different contigs become linkage evidence, conflicting orientations
//! are filtered out and each surviving link gets a gap estimate. Scaffold paths
//! traced over that evidence are deduplicated and stitched by [`scaffold::PathPurger`].

pub mod config;
pub mod error;
pub mod kmer;
pub mod scaffold;

pub use config::{CloneLibrary, CloneLibraryInformation, ScaffoldConfig};
pub use error::{Result, ScaffoldError};
