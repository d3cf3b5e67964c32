use crate::scaffold::path::{Node, ScaffoldPath};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;

/// Summary of a purged scaffold path set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaffoldStats {
    pub total_paths: usize,
    /// Mean number of contigs per path
    pub average_length: f64,
    /// Contigs visited by two or more distinct paths, in either orientation
    pub shared_contigs: usize,
    pub longest: usize,
}

pub fn compute_scaffold_stats(paths: &[ScaffoldPath]) -> ScaffoldStats {
    let total_paths = paths.len();
    let total_len: usize = paths.iter().map(|p| p.len()).sum();
    let average_length = if total_paths > 0 {
        total_len as f64 / total_paths as f64
    } else {
        0.0
    };

    // Nodes compare by contig only, so a path revisiting a contig on the
    // other strand still counts once for that path.
    let mut paths_per_contig: AHashMap<usize, usize> = AHashMap::new();
    for path in paths {
        let distinct: AHashSet<&Node> = path.nodes().collect();
        for node in distinct {
            *paths_per_contig.entry(node.contig).or_insert(0) += 1;
        }
    }

    ScaffoldStats {
        total_paths,
        average_length,
        shared_contigs: paths_per_contig.values().filter(|&&n| n > 1).count(),
        longest: paths.iter().map(|p| p.len()).max().unwrap_or(0),
    }
}
