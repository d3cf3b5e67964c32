use crate::scaffold::mate_pairs::ValidMatePair;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A contig visited by a scaffold path.
///
/// Two nodes are the same node when they refer to the same contig, whatever
/// the orientation it is walked in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    pub contig: usize,
    pub is_forward: bool,
}

impl Node {
    pub fn new(contig: usize, is_forward: bool) -> Self {
        Self { contig, is_forward }
    }

    pub fn forward(contig: usize) -> Self {
        Self::new(contig, true)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.contig == other.contig
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contig.hash(state);
    }
}

/// Link leaving a node towards the next node of the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub is_same_orientation: bool,
    pub distance: f32,
    pub standard_deviation: f32,
    pub weight: u32,
}

impl Edge {
    /// Edge for a bundled contig-pair estimate. Same-orientation links use the
    /// forward interpretation, opposite-orientation links the reverse
    /// complement one.
    pub fn from_mate_pair(pair: &ValidMatePair, is_same_orientation: bool) -> Option<Self> {
        let index = if is_same_orientation { 0 } else { 1 };
        Some(Self {
            is_same_orientation,
            distance: *pair.distance_between_contigs.get(index)?,
            standard_deviation: *pair.standard_deviation.get(index)?,
            weight: pair.weight,
        })
    }
}

/// An ordered walk over contigs. Each step carries the edge that led into it
/// (`None` for the first step and for steps stitched without evidence).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldPath {
    steps: Vec<(Node, Option<Edge>)>,
}

impl ScaffoldPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward-oriented path over the given contigs, without edges.
    pub fn from_contigs(contigs: impl IntoIterator<Item = usize>) -> Self {
        Self {
            steps: contigs.into_iter().map(|c| (Node::forward(c), None)).collect(),
        }
    }

    pub fn push(&mut self, node: Node, edge: Option<Edge>) {
        self.steps.push((node, edge));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[(Node, Option<Edge>)] {
        &self.steps
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.steps.get(index).map(|(node, _)| node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.steps.iter().map(|(node, _)| node)
    }

    pub fn contigs(&self) -> Vec<usize> {
        self.nodes().map(|n| n.contig).collect()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.nodes().any(|n| n == node)
    }

    /// Every node of `other` occurs somewhere in this path.
    pub fn contains_all(&self, other: &ScaffoldPath) -> bool {
        let own: AHashSet<&Node> = self.nodes().collect();
        other.nodes().all(|n| own.contains(n))
    }

    /// Append the steps of `other` from `start` onwards.
    pub fn extend_from(&mut self, other: &ScaffoldPath, start: usize) {
        if start < other.steps.len() {
            self.steps.extend_from_slice(&other.steps[start..]);
        }
    }
}

impl FromIterator<(Node, Option<Edge>)> for ScaffoldPath {
    fn from_iter<I: IntoIterator<Item = (Node, Option<Edge>)>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
