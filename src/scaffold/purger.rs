//! Removes redundant scaffold paths and stitches overlapping ones.
//!
//! Paths are compared pairwise until nothing changes. A path whose contigs are
//! all present in another path is absorbed. Two paths where the tail of one
//! walks the same contigs as the head of the other are joined:
//!
//! ```text
//! P:  c1 c2 c3
//! Q:        c3 c4      =>   c1 c2 c3 c4
//! ```

use crate::scaffold::path::ScaffoldPath;
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct PathPurger;

impl PathPurger {
    pub fn new() -> Self {
        Self
    }

    /// Purge `scaffold_paths` in place. Output order is by ascending input length
    /// and is not guaranteed to match the input order.
    pub fn purge_path(&self, scaffold_paths: &mut Vec<ScaffoldPath>) {
        if scaffold_paths.is_empty() {
            return;
        }

        let input = scaffold_paths.len();
        let mut paths = std::mem::take(scaffold_paths);
        paths.par_sort_by_key(|p| p.len());
        let mut consumed: Vec<bool> = paths.iter().map(|p| p.is_empty()).collect();

        let mut passes = 0;
        loop {
            let mut updated = false;
            for i in 0..paths.len() {
                for j in 0..paths.len() {
                    if i == j || consumed[i] || consumed[j] {
                        continue;
                    }
                    if let Some(merged) = absorb(&paths[i], &paths[j]) {
                        if let Some(merged) = merged {
                            paths[i] = merged;
                        }
                        consumed[j] = true;
                        updated = true;
                    }
                }
            }
            passes += 1;
            if !updated {
                break;
            }
        }

        *scaffold_paths = paths
            .into_iter()
            .zip(consumed)
            .filter(|(_, consumed)| !consumed)
            .map(|(path, _)| path)
            .collect();

        debug!("Path purging converged after {} passes", passes);
        info!("Purged {} scaffold paths down to {}", input, scaffold_paths.len());
    }
}

/// Try to fold `q` into `p`.
///
/// `None` leaves both untouched. `Some(None)` means `q` is redundant and `p`
/// stays as it is; `Some(Some(path))` replaces `p` with `path`.
fn absorb(p: &ScaffoldPath, q: &ScaffoldPath) -> Option<Option<ScaffoldPath>> {
    if p.len() >= q.len() && p.contains_all(q) {
        return Some(None);
    }
    if q.len() >= p.len() && q.contains_all(p) {
        return Some(Some(q.clone()));
    }
    stitch(p, q).map(Some)
}

/// Join two paths sharing a tail/head run of contigs.
fn stitch(p: &ScaffoldPath, q: &ScaffoldPath) -> Option<ScaffoldPath> {
    let grid = OverlapGrid::new(p, q);
    let tail_of_p = grid.last_row_run();
    let tail_of_q = grid.last_column_run();

    if tail_of_p > 0 && tail_of_p >= tail_of_q {
        let mut merged = p.clone();
        merged.extend_from(q, tail_of_p);
        Some(merged)
    } else if tail_of_q > 0 {
        let mut merged = q.clone();
        merged.extend_from(p, tail_of_q);
        Some(merged)
    } else {
        None
    }
}

/// `matches[i][j]` is true when `p[i]` and `q[j]` are the same contig.
struct OverlapGrid {
    matches: Vec<Vec<bool>>,
    rows: usize,
    columns: usize,
}

impl OverlapGrid {
    fn new(p: &ScaffoldPath, q: &ScaffoldPath) -> Self {
        let matches: Vec<Vec<bool>> = p
            .nodes()
            .map(|a| q.nodes().map(|b| a == b).collect())
            .collect();
        Self {
            matches,
            rows: p.len(),
            columns: q.len(),
        }
    }

    /// Length of the longest diagonal run ending in the last row and reaching
    /// column 0, i.e. how many contigs at the end of `p` start `q`.
    fn last_row_run(&self) -> usize {
        if self.rows == 0 {
            return 0;
        }
        let last = self.rows - 1;
        (0..self.columns)
            .rev()
            .filter(|&column| column < self.rows)
            .find(|&column| (0..=column).all(|t| self.matches[last - t][column - t]))
            .map_or(0, |column| column + 1)
    }

    /// Length of the longest diagonal run ending in the last column and
    /// reaching row 0, i.e. how many contigs at the end of `q` start `p`.
    fn last_column_run(&self) -> usize {
        if self.columns == 0 {
            return 0;
        }
        let last = self.columns - 1;
        (0..self.rows)
            .rev()
            .filter(|&row| row < self.columns)
            .find(|&row| (0..=row).all(|t| self.matches[row - t][last - t]))
            .map_or(0, |row| row + 1)
    }
}
