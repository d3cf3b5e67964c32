//! Read-to-contig mapping by exact k-mer seeding.
//!
//! Each read is cut into k-mers which are looked up (forward first, then
//! reverse complement) in a [`ContigKmerIndex`]. Hits on the same contig are
//! chained into maximal ungapped overlaps ([`ReadMap`]): a hit joins an open
//! map when it extends it by exactly one base on the contig, either to the
//! right (forward-strand read) or to the left (reverse-complement read).

use crate::error::{Result, ScaffoldError};
use crate::kmer::index::{ContigKmerIndex, KmerIndexer};
use crate::kmer::kmer::kmers;
use crate::scaffold::sequence::{Contig, Read};
use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How a read overlaps a contig.
///
/// ```text
/// FullOverlap        PartialOverlap
/// -------------      -------------        contig
///    ------                     ------    read
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadOverlap {
    FullOverlap,
    PartialOverlap,
}

/// One ungapped overlap between a read and a contig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadMap {
    /// Leftmost contig position covered by the overlap
    pub start_position_of_contig: usize,
    pub start_position_of_read: usize,
    pub length: usize,
    pub read_overlap: ReadOverlap,
}

impl ReadMap {
    fn seed(contig_position: usize, read_position: usize, kmer_length: usize, read_length: usize) -> Self {
        let mut map = ReadMap {
            start_position_of_contig: contig_position,
            start_position_of_read: read_position,
            length: kmer_length,
            read_overlap: ReadOverlap::PartialOverlap,
        };
        map.set_overlap(read_length);
        map
    }

    fn set_overlap(&mut self, read_length: usize) {
        self.read_overlap = if self.length == read_length {
            ReadOverlap::FullOverlap
        } else {
            ReadOverlap::PartialOverlap
        };
    }

    /// The hit continues this map towards the end of the contig.
    fn is_continuous_right(&self, read_position: usize, contig_position: usize, k: usize) -> bool {
        self.length - k + self.start_position_of_contig + 1 == contig_position
            && self.start_position_of_read + self.length - k + 1 == read_position
    }

    /// The hit continues this map towards the start of the contig.
    fn is_continuous_left(&self, read_position: usize, contig_position: usize, k: usize) -> bool {
        self.length - k + self.start_position_of_read + 1 == read_position
            && self.start_position_of_contig == contig_position + 1
    }
}

/// Contig id -> overlaps of one read on that contig.
pub type ContigReadMaps = AHashMap<usize, Vec<ReadMap>>;

/// Read id -> per-contig overlaps. Every mapped read has an entry, possibly empty.
pub type ReadContigMap = AHashMap<String, ContigReadMaps>;

/// Index hits of one read: (read position, contig occurrences).
type ReadHits<'a> = Vec<(usize, &'a [KmerIndexer])>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ReadContigMapper;

impl ReadContigMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map every read onto the contigs it overlaps.
    ///
    /// Fails when `kmer_length` is zero or when two reads share an id.
    pub fn map(&self, contigs: &[Contig], reads: &[Read], kmer_length: usize) -> Result<ReadContigMap> {
        if kmer_length == 0 {
            return Err(ScaffoldError::invalid_argument(
                "kmer_length",
                "must be positive",
            ));
        }

        info!(
            "Mapping {} reads onto {} contigs with k = {}",
            reads.len(),
            contigs.len(),
            kmer_length
        );

        let index = ContigKmerIndex::build(contigs, kmer_length);
        debug!(
            "Contig k-mer index holds {} k-mers ({} entries)",
            index.num_kmers(),
            index.num_entries()
        );

        let mapped: Vec<(&str, ContigReadMaps)> = reads
            .par_iter()
            .map(|read| (read.id.as_str(), map_read(&index, contigs, read, kmer_length)))
            .collect();

        let mut maps = ReadContigMap::with_capacity(mapped.len());
        for (read_id, overlaps) in mapped {
            if maps.contains_key(read_id) {
                return Err(ScaffoldError::DuplicateReadId(read_id.to_string()));
            }
            maps.insert(read_id.to_string(), overlaps);
        }

        let mapped_reads = maps.values().filter(|m| !m.is_empty()).count();
        info!("{} of {} reads overlap at least one contig", mapped_reads, reads.len());

        Ok(maps)
    }
}

fn map_read(index: &ContigKmerIndex, contigs: &[Contig], read: &Read, k: usize) -> ContigReadMaps {
    let hits: ReadHits = kmers(read.sequence.as_bytes(), k)
        .filter_map(|(pos, kmer)| index.lookup_either_strand(kmer).map(|h| (pos, h)))
        .collect();

    // Each contig is chained starting from the first hit that touches it.
    let mut visited = AHashSet::new();
    let mut first_hits = Vec::new();
    for (offset, (_, occurrences)) in hits.iter().enumerate() {
        for occurrence in occurrences.iter() {
            if visited.insert(occurrence.contig_index) {
                first_hits.push((occurrence.contig_index, offset));
            }
        }
    }

    let chained: Vec<(usize, Vec<ReadMap>)> = first_hits
        .into_par_iter()
        .map(|(contig_index, offset)| {
            let read_maps = chain_hits(&hits[offset..], contig_index, read.len(), k);
            (contigs[contig_index].id, read_maps)
        })
        .collect();

    chained.into_iter().collect()
}

/// Chain the hits on one contig into maximal overlaps.
fn chain_hits(hits: &[(usize, &[KmerIndexer])], contig_index: usize, read_length: usize, k: usize) -> Vec<ReadMap> {
    let mut read_maps = Vec::new();
    for (read_position, occurrences) in hits {
        for occurrence in occurrences.iter().filter(|o| o.contig_index == contig_index) {
            merge_continuous(occurrence, &mut read_maps, *read_position, k, read_length);
        }
    }
    read_maps
}

fn merge_continuous(
    occurrence: &KmerIndexer,
    read_maps: &mut Vec<ReadMap>,
    read_position: usize,
    k: usize,
    read_length: usize,
) {
    for &contig_position in &occurrence.positions {
        let continued = read_maps.iter_mut().find(|map| {
            map.is_continuous_right(read_position, contig_position, k)
                || map.is_continuous_left(read_position, contig_position, k)
        });

        match continued {
            Some(map) => {
                map.length += 1;
                if map.start_position_of_contig > contig_position {
                    map.start_position_of_contig = contig_position;
                }
                map.set_overlap(read_length);
            }
            None => read_maps.push(ReadMap::seed(contig_position, read_position, k, read_length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_map(maps: &ReadContigMap, read_id: &str, contig_id: usize) -> ReadMap {
        let per_contig = &maps[read_id];
        let read_maps = &per_contig[&contig_id];
        assert_eq!(read_maps.len(), 1, "expected one overlap for {}", read_id);
        read_maps[0].clone()
    }

    #[test]
    fn test_forward_read_full_overlap() {
        let contigs = Contig::from_sequences(["TCTGATAAGG"]);
        let reads = vec![Read::new("2", "CTGATAAGG")];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap();

        assert_eq!(maps.len(), 1);
        let map = single_map(&maps, "2", 0);
        assert_eq!(map.length, 9);
        assert_eq!(map.start_position_of_contig, 1);
        assert_eq!(map.start_position_of_read, 0);
        assert_eq!(map.read_overlap, ReadOverlap::FullOverlap);
    }

    #[test]
    fn test_reverse_complement_read_full_overlap() {
        let contigs = Contig::from_sequences(["TCTGATAAGG"]);
        let reads = vec![Read::new("2", "CCTTATCAG")];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap();

        let map = single_map(&maps, "2", 0);
        assert_eq!(map.length, 9);
        assert_eq!(map.start_position_of_contig, 1);
        assert_eq!(map.start_position_of_read, 0);
        assert_eq!(map.read_overlap, ReadOverlap::FullOverlap);
    }

    #[test]
    fn test_reads_along_single_contig() {
        let contigs = Contig::from_sequences(["GATGCCTCCTATC"]);
        let reads = vec![
            Read::new("0", "GATGCCTC"),
            Read::new("1", "CCTCCTAT"),
            Read::new("2", "TCCTATC"),
            Read::new("3", "GCCTCCTAT"),
            Read::new("4", "TGCCTCCT"),
        ];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap();
        assert_eq!(maps.len(), reads.len());

        let expected = [("0", 8, 0), ("1", 8, 4), ("2", 7, 6), ("3", 9, 3), ("4", 8, 2)];
        for (id, length, start) in expected {
            let map = single_map(&maps, id, 0);
            assert_eq!(map.length, length, "read {}", id);
            assert_eq!(map.start_position_of_contig, start, "read {}", id);
            assert_eq!(map.start_position_of_read, 0);
            assert_eq!(map.read_overlap, ReadOverlap::FullOverlap);
        }
    }

    #[test]
    fn test_partial_overlap_off_contig_end() {
        let contigs = Contig::from_sequences(["GATCTGATAAGG"]);
        let reads = vec![Read::new("r", "TGATAAGGCCCC")];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap();

        let map = single_map(&maps, "r", 0);
        assert_eq!(map.start_position_of_contig, 4);
        assert_eq!(map.length, 8);
        assert_eq!(map.read_overlap, ReadOverlap::PartialOverlap);
    }

    #[test]
    fn test_unmapped_and_short_reads_get_empty_entries() {
        let contigs = Contig::from_sequences(["GATCTGATAAGG"]);
        let reads = vec![Read::new("miss", "CCCCCCCCCC"), Read::new("short", "GAT")];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap();
        assert_eq!(maps.len(), 2);
        assert!(maps["miss"].is_empty());
        assert!(maps["short"].is_empty());
    }

    #[test]
    fn test_contig_keys_use_contig_id() {
        let contigs = vec![Contig::new(7, "AAAAAAAAAA"), Contig::new(3, "GATCTGATAAGG")];
        let reads = vec![Read::new("r", "CTGATAAG")];
        let maps = ReadContigMapper::new().map(&contigs, &reads, 5).unwrap();
        assert!(maps["r"].contains_key(&3));
        assert!(!maps["r"].contains_key(&7));
    }

    #[test]
    fn test_duplicate_read_ids_fail() {
        let contigs = Contig::from_sequences(["GATCTGATAAGG"]);
        let reads = vec![Read::new("dup", "GATCTGAT"), Read::new("dup", "CTGATAAG")];
        let err = ReadContigMapper::new().map(&contigs, &reads, 6).unwrap_err();
        assert!(matches!(err, ScaffoldError::DuplicateReadId(id) if id == "dup"));
    }

    #[test]
    fn test_zero_kmer_length_fails() {
        let contigs = Contig::from_sequences(["GATCTGATAAGG"]);
        let err = ReadContigMapper::new().map(&contigs, &[], 0).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidArgument { .. }));
    }

    #[test]
    fn test_substring_reads_map_fully_for_any_k() {
        let contig = "ACGTTGCAAGCTTAGCCGATAGGCTTACCGAT";
        let contigs = Contig::from_sequences([contig]);
        let read = &contig[5..25];
        for k in 6..=read.len() {
            let reads = vec![Read::new("r", read)];
            let maps = ReadContigMapper::new().map(&contigs, &reads, k).unwrap();
            let map = single_map(&maps, "r", 0);
            assert_eq!(map.length, read.len(), "k = {}", k);
            assert_eq!(map.read_overlap, ReadOverlap::FullOverlap);
            assert_eq!(map.start_position_of_contig, 5);
        }
    }
}
