//! Keeps one consistent orientation per contig pair.
//!
//! Mate pairs linking A and B should agree on their relative orientation. Each
//! unordered pair is resolved once: the side with more evidence wins, ties are
//! merged into the lower contig id's side, and anything below the redundancy
//! threshold is dropped. Self links are always dropped.

use crate::error::{Result, ScaffoldError};
use crate::scaffold::mate_pairs::{ContigMatePairs, PartnerMap, ValidMatePair};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationBasedMatePairFilter;

impl OrientationBasedMatePairFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn filter_paired_reads(
        &self,
        mut mate_pairs: ContigMatePairs,
        redundancy: i32,
    ) -> Result<ContigMatePairs> {
        if redundancy < 0 {
            return Err(ScaffoldError::invalid_argument(
                "redundancy",
                format!("must be non-negative, got {}", redundancy),
            ));
        }
        let redundancy = redundancy as usize;
        let before = mate_pairs.pair_count();

        for (&forward, partners) in mate_pairs.as_map_mut().iter_mut() {
            partners.remove(&forward);
        }

        let mut unordered: Vec<(usize, usize)> = mate_pairs
            .iter()
            .map(|(forward, reverse, _)| (forward.min(reverse), forward.max(reverse)))
            .collect();
        unordered.sort_unstable();
        unordered.dedup();

        for (a, b) in unordered {
            let ab = mate_pairs.take(a, b).unwrap_or_default();
            let ba = mate_pairs.take(b, a).unwrap_or_default();

            match resolve(ab, ba, redundancy) {
                Some((Orientation::AToB, evidence)) => mate_pairs.evidence_mut(a, b).extend(evidence),
                Some((Orientation::BToA, evidence)) => mate_pairs.evidence_mut(b, a).extend(evidence),
                None => debug!("Discarded link between contigs {} and {}", a, b),
            }
        }

        let entries: Vec<(usize, PartnerMap)> = mate_pairs.into_map().into_iter().collect();
        let rebuilt: Vec<(usize, PartnerMap)> = entries
            .into_par_iter()
            .filter_map(|(forward, partners)| {
                let kept: PartnerMap = partners
                    .into_iter()
                    .filter(|(_, evidence)| !evidence.is_empty())
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some((forward, kept))
                }
            })
            .collect();

        let filtered: ContigMatePairs = rebuilt.into_iter().collect();
        info!(
            "Orientation filter kept {} of {} contig pairs (redundancy {})",
            filtered.pair_count(),
            before,
            redundancy
        );
        Ok(filtered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    AToB,
    BToA,
}

/// Decide which direction of one contig pair survives, if any.
///
/// A missing direction counts as empty, which reduces to the one-sided rule:
/// keep it only when it reaches the redundancy threshold.
fn resolve(
    ab: Vec<ValidMatePair>,
    ba: Vec<ValidMatePair>,
    redundancy: usize,
) -> Option<(Orientation, Vec<ValidMatePair>)> {
    match ab.len().cmp(&ba.len()) {
        Ordering::Greater if ab.len() >= redundancy => Some((Orientation::AToB, ab)),
        Ordering::Less if ba.len() >= redundancy => Some((Orientation::BToA, ba)),
        Ordering::Equal => {
            let mut merged = ab;
            merged.extend(ba);
            if merged.len() > redundancy {
                Some((Orientation::AToB, merged))
            } else {
                None
            }
        }
        _ => None,
    }
}
