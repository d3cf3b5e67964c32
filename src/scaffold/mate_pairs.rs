//! Mate-pair evidence between contigs.
//!
//! [`ContigMatePairs`] is a two-level map: forward contig -> reverse contig ->
//! the [`ValidMatePair`]s bridging them. Before filtering the map is symmetric
//! (evidence for A->B is mirrored by evidence for B->A); the orientation
//! filter keeps one side and the distance calculator collapses each surviving
//! list into a single gap estimate.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Two reads sequenced from opposite ends of one fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatePair {
    pub forward_read_id: String,
    pub reverse_read_id: String,
    /// Clone library the fragment came from
    pub library: String,
}

impl MatePair {
    pub fn new(forward_read_id: &str, reverse_read_id: &str, library: &str) -> Self {
        Self {
            forward_read_id: forward_read_id.to_string(),
            reverse_read_id: reverse_read_id.to_string(),
            library: library.to_string(),
        }
    }
}

/// One mate-pair observation linking a forward contig to a reverse contig.
///
/// Index 0 of the distance / deviation lists is the estimate with the reverse
/// read taken as aligned forward, index 1 the estimate with it aligned to its
/// reverse complement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidMatePair {
    /// Originating read pair; `None` for entries produced by merging
    pub paired_read: Option<MatePair>,
    pub forward_read_start_position: Vec<usize>,
    pub reverse_read_start_position: Vec<usize>,
    pub reverse_read_reverse_complement_start_position: Vec<usize>,
    pub distance_between_contigs: Vec<f32>,
    pub standard_deviation: Vec<f32>,
    /// Number of original observations this entry stands for
    pub weight: u32,
}

impl Default for ValidMatePair {
    fn default() -> Self {
        Self {
            paired_read: None,
            forward_read_start_position: Vec::new(),
            reverse_read_start_position: Vec::new(),
            reverse_read_reverse_complement_start_position: Vec::new(),
            distance_between_contigs: Vec::new(),
            standard_deviation: Vec::new(),
            weight: 1,
        }
    }
}

impl ValidMatePair {
    pub fn new(
        paired_read: MatePair,
        forward_read_start: usize,
        reverse_read_start: usize,
        reverse_read_reverse_complement_start: usize,
    ) -> Self {
        Self {
            paired_read: Some(paired_read),
            forward_read_start_position: vec![forward_read_start],
            reverse_read_start_position: vec![reverse_read_start],
            reverse_read_reverse_complement_start_position: vec![reverse_read_reverse_complement_start],
            ..Default::default()
        }
    }

    /// A merged entry carrying only estimates.
    pub fn with_estimates(distances: Vec<f32>, standard_deviations: Vec<f32>, weight: u32) -> Self {
        Self {
            distance_between_contigs: distances,
            standard_deviation: standard_deviations,
            weight,
            ..Default::default()
        }
    }

    pub fn library(&self) -> Option<&str> {
        self.paired_read.as_ref().map(|p| p.library.as_str())
    }
}

/// Reverse contig -> evidence list.
pub type PartnerMap = AHashMap<usize, Vec<ValidMatePair>>;

#[derive(Debug, Clone, Default)]
pub struct ContigMatePairs {
    pairs: AHashMap<usize, PartnerMap>,
}

impl ContigMatePairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, forward: usize, reverse: usize, pair: ValidMatePair) {
        self.evidence_mut(forward, reverse).push(pair);
    }

    /// Evidence list for a contig pair, created empty if absent.
    pub fn evidence_mut(&mut self, forward: usize, reverse: usize) -> &mut Vec<ValidMatePair> {
        self.pairs
            .entry(forward)
            .or_default()
            .entry(reverse)
            .or_default()
    }

    pub fn insert_partners(&mut self, forward: usize, partners: PartnerMap) {
        self.pairs.insert(forward, partners);
    }

    pub fn get(&self, forward: usize, reverse: usize) -> Option<&Vec<ValidMatePair>> {
        self.pairs.get(&forward).and_then(|p| p.get(&reverse))
    }

    pub fn get_mut(&mut self, forward: usize, reverse: usize) -> Option<&mut Vec<ValidMatePair>> {
        self.pairs.get_mut(&forward).and_then(|p| p.get_mut(&reverse))
    }

    pub fn partners(&self, forward: usize) -> Option<&PartnerMap> {
        self.pairs.get(&forward)
    }

    pub fn contains_forward(&self, forward: usize) -> bool {
        self.pairs.contains_key(&forward)
    }

    /// Forward contig ids, ascending.
    pub fn forward_contigs(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = self.pairs.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of forward contigs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of (forward, reverse) contig pairs with an evidence list.
    pub fn pair_count(&self) -> usize {
        self.pairs.values().map(|p| p.len()).sum()
    }

    /// Total number of mate-pair entries across all contig pairs.
    pub fn evidence_count(&self) -> usize {
        self.pairs
            .values()
            .flat_map(|p| p.values())
            .map(|v| v.len())
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Vec<ValidMatePair>)> {
        self.pairs.iter().flat_map(|(&forward, partners)| {
            partners
                .iter()
                .map(move |(&reverse, evidence)| (forward, reverse, evidence))
        })
    }

    /// Remove and return the evidence for one direction of a contig pair.
    pub fn take(&mut self, forward: usize, reverse: usize) -> Option<Vec<ValidMatePair>> {
        self.pairs.get_mut(&forward).and_then(|p| p.remove(&reverse))
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut AHashMap<usize, PartnerMap> {
        &mut self.pairs
    }

    pub(crate) fn into_map(self) -> AHashMap<usize, PartnerMap> {
        self.pairs
    }
}

impl FromIterator<(usize, PartnerMap)> for ContigMatePairs {
    fn from_iter<I: IntoIterator<Item = (usize, PartnerMap)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
