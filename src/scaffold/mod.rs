pub mod builder;
pub mod distance;
pub mod mate_mapper;
pub mod mate_pairs;
pub mod orientation_filter;
pub mod path;
pub mod purger;
pub mod read_mapper;
pub mod sequence;
pub mod stats;

pub use builder::ScaffoldBuilder;
pub use distance::{bundle_edges, weighted_edge, DistanceCalculator};
pub use mate_mapper::MatePairMapper;
pub use mate_pairs::{ContigMatePairs, MatePair, ValidMatePair};
pub use orientation_filter::OrientationBasedMatePairFilter;
pub use path::{Edge, Node, ScaffoldPath};
pub use purger::PathPurger;
pub use read_mapper::{ReadContigMap, ReadContigMapper, ReadMap, ReadOverlap};
pub use sequence::{Contig, Read};
pub use stats::{compute_scaffold_stats, ScaffoldStats};
