//! Runs the scaffolding stages in order.
//!
//! Evidence: map reads -> pair mates -> filter orientations -> estimate gaps.
//! Path tracing over the resulting evidence happens outside this crate; the
//! traced paths come back through [`ScaffoldBuilder::purge_paths`].

use crate::config::ScaffoldConfig;
use crate::error::Result;
use crate::scaffold::distance::DistanceCalculator;
use crate::scaffold::mate_mapper::MatePairMapper;
use crate::scaffold::mate_pairs::ContigMatePairs;
use crate::scaffold::orientation_filter::OrientationBasedMatePairFilter;
use crate::scaffold::path::ScaffoldPath;
use crate::scaffold::purger::PathPurger;
use crate::scaffold::read_mapper::ReadContigMapper;
use crate::scaffold::sequence::{Contig, Read};
use crate::scaffold::stats::{compute_scaffold_stats, ScaffoldStats};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::info;

pub struct ScaffoldBuilder {
    config: ScaffoldConfig,
}

impl ScaffoldBuilder {
    pub fn new(config: ScaffoldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Build filtered, distance-annotated mate-pair evidence between contigs.
    pub fn build_evidence(&self, contigs: &[Contig], reads: &[Read]) -> Result<ContigMatePairs> {
        let pool = self.thread_pool()?;
        pool.install(|| self.run_evidence_stages(contigs, reads))
    }

    fn run_evidence_stages(&self, contigs: &[Contig], reads: &[Read]) -> Result<ContigMatePairs> {
        let start = Instant::now();
        info!(
            "Scaffolding {} contigs with {} reads (k = {}, redundancy = {})",
            contigs.len(),
            reads.len(),
            self.config.kmer_length,
            self.config.redundancy
        );

        let alignment = ReadContigMapper::new().map(contigs, reads, self.config.kmer_length)?;
        let mate_pairs = MatePairMapper::new().map_contig_to_mate_pairs(reads, &alignment, contigs)?;
        let mut mate_pairs =
            OrientationBasedMatePairFilter::new().filter_paired_reads(mate_pairs, self.config.redundancy)?;

        let libraries = self.config.clone_library();
        DistanceCalculator::new(contigs, &libraries).calculate_distance(&mut mate_pairs)?;

        info!(
            "Built evidence for {} contig pairs in {:.2?}",
            mate_pairs.pair_count(),
            start.elapsed()
        );
        Ok(mate_pairs)
    }

    /// Purge traced paths in place and report what is left.
    pub fn purge_paths(&self, paths: &mut Vec<ScaffoldPath>) -> ScaffoldStats {
        PathPurger::new().purge_path(paths);
        let stats = compute_scaffold_stats(paths);
        info!(
            "Scaffold paths: {} (avg {:.1} contigs, longest {}, {} shared contigs)",
            stats.total_paths, stats.average_length, stats.longest, stats.shared_contigs
        );
        stats
    }

    fn thread_pool(&self) -> Result<ThreadPool> {
        let mut builder = ThreadPoolBuilder::new();
        if self.config.threads > 0 {
            builder = builder.num_threads(self.config.threads);
        }
        Ok(builder.build()?)
    }
}
