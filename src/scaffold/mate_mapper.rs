//! Pairs reads into mates from their ids and turns pairs whose ends both map
//! onto contigs into [`ValidMatePair`] evidence.
//!
//! Read ids look like `<fragment>.<end>:<library>`, e.g. `frag12.X1:2K`.
//! End tags come in partner pairs; the first of each pair marks the forward
//! read: `X1/Y1`, `F/R`, `1/2`, `x1/y1`, `f/r`, `a/b`, `A/B`.

use crate::error::{Result, ScaffoldError};
use crate::scaffold::mate_pairs::{ContigMatePairs, MatePair, ValidMatePair};
use crate::scaffold::read_mapper::{ContigReadMaps, ReadContigMap};
use crate::scaffold::sequence::{Contig, Read};
use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

lazy_static! {
    static ref READ_ID: Regex =
        Regex::new(r"^(.*)\.(X1|Y1|F|R|1|2|x1|y1|f|r|a|b|A|B):(.*)$").unwrap();
}

/// The parts of a paired read id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedReadId<'a> {
    pub fragment: &'a str,
    pub end: &'a str,
    pub library: &'a str,
}

impl<'a> PairedReadId<'a> {
    pub fn parse(id: &'a str) -> Option<Self> {
        let caps = READ_ID.captures(id)?;
        Some(Self {
            fragment: caps.get(1)?.as_str(),
            end: caps.get(2)?.as_str(),
            library: caps.get(3)?.as_str(),
        })
    }

    pub fn is_forward(&self) -> bool {
        matches!(self.end, "X1" | "F" | "1" | "x1" | "f" | "a" | "A")
    }

    /// Id of the other end of the fragment.
    pub fn mate_id(&self) -> String {
        format!("{}.{}:{}", self.fragment, partner_end(self.end), self.library)
    }
}

fn partner_end(end: &str) -> &'static str {
    match end {
        "X1" => "Y1",
        "Y1" => "X1",
        "F" => "R",
        "R" => "F",
        "1" => "2",
        "2" => "1",
        "x1" => "y1",
        "y1" => "x1",
        "f" => "r",
        "r" => "f",
        "A" => "B",
        "B" => "A",
        "a" => "b",
        _ => "a",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MatePairMapper;

impl MatePairMapper {
    pub fn new() -> Self {
        Self
    }

    /// Pair up reads whose mates are both present.
    ///
    /// Reads without a paired id are ignored. A read id seen twice fails with
    /// [`ScaffoldError::DuplicateReadId`], whether or not its mate came first.
    pub fn map_pairs(&self, reads: &[Read]) -> Result<Vec<MatePair>> {
        // Keyed by the id of the read still expected.
        let mut pending: AHashMap<String, MatePair> = AHashMap::new();
        let mut seen: AHashSet<&str> = AHashSet::new();

        for read in reads {
            let parsed = match PairedReadId::parse(&read.id) {
                Some(parsed) => parsed,
                None => continue,
            };
            if !seen.insert(read.id.as_str()) {
                return Err(ScaffoldError::DuplicateReadId(read.id.clone()));
            }

            if let Some(pair) = pending.get_mut(&read.id) {
                if parsed.is_forward() {
                    pair.forward_read_id = read.id.clone();
                } else {
                    pair.reverse_read_id = read.id.clone();
                }
                continue;
            }

            let mut pair = MatePair::new("", "", parsed.library);
            if parsed.is_forward() {
                pair.forward_read_id = read.id.clone();
            } else {
                pair.reverse_read_id = read.id.clone();
            }
            pending.insert(parsed.mate_id(), pair);
        }

        let mut pairs: Vec<MatePair> = pending
            .into_iter()
            .map(|(_, pair)| pair)
            .filter(|p| !p.forward_read_id.is_empty() && !p.reverse_read_id.is_empty())
            .collect();
        pairs.sort_by(|a, b| a.forward_read_id.cmp(&b.forward_read_id));
        Ok(pairs)
    }

    /// Build contig mate-pair evidence from read placements.
    ///
    /// Each fragment is used once. For every forward-read placement and every
    /// reverse-read placement one [`ValidMatePair`] is added under
    /// `[forward contig][reverse contig]`.
    pub fn map_contig_to_mate_pairs(
        &self,
        reads: &[Read],
        alignment: &ReadContigMap,
        contigs: &[Contig],
    ) -> Result<ContigMatePairs> {
        let contig_lengths: AHashMap<usize, usize> = contigs.iter().map(|c| (c.id, c.len())).collect();
        let mut contig_mate_pairs = ContigMatePairs::new();
        let mut consumed: AHashSet<String> = AHashSet::new();
        let mut linked = 0usize;

        for read in reads {
            if consumed.contains(&read.id) {
                continue;
            }
            let parsed = match PairedReadId::parse(&read.id) {
                Some(parsed) => parsed,
                None => continue,
            };

            let mate_id = parsed.mate_id();
            // Both ends must land on at least one contig.
            let (own, mate) = match (alignment.get(&read.id), alignment.get(&mate_id)) {
                (Some(own), Some(mate)) if !own.is_empty() && !mate.is_empty() => (own, mate),
                _ => continue,
            };

            if parsed.is_forward() {
                let pair = MatePair::new(&read.id, &mate_id, parsed.library);
                add_observations(&mut contig_mate_pairs, own, mate, &pair, &contig_lengths)?;
            } else {
                let pair = MatePair::new(&mate_id, &read.id, parsed.library);
                add_observations(&mut contig_mate_pairs, mate, own, &pair, &contig_lengths)?;
            }

            consumed.insert(read.id.clone());
            consumed.insert(mate_id);
            linked += 1;
        }

        info!(
            "Linked {} mate pairs into {} contig pairs ({} observations)",
            linked,
            contig_mate_pairs.pair_count(),
            contig_mate_pairs.evidence_count()
        );

        Ok(contig_mate_pairs)
    }
}

fn sorted_contigs(maps: &ContigReadMaps) -> Vec<usize> {
    let mut keys: Vec<usize> = maps.keys().copied().collect();
    keys.sort_unstable();
    keys
}

fn add_observations(
    contig_mate_pairs: &mut ContigMatePairs,
    forward_maps: &ContigReadMaps,
    reverse_maps: &ContigReadMaps,
    pair: &MatePair,
    contig_lengths: &AHashMap<usize, usize>,
) -> Result<()> {
    let reverse_contigs = sorted_contigs(reverse_maps);

    for forward_contig in sorted_contigs(forward_maps) {
        if !contig_mate_pairs.contains_forward(forward_contig) {
            contig_mate_pairs.insert_partners(forward_contig, AHashMap::new());
        }

        for &reverse_contig in &reverse_contigs {
            let reverse_length = *contig_lengths
                .get(&reverse_contig)
                .ok_or(ScaffoldError::UnknownContig(reverse_contig))?;
            let evidence = contig_mate_pairs.evidence_mut(forward_contig, reverse_contig);

            for forward_map in &forward_maps[&forward_contig] {
                for reverse_map in &reverse_maps[&reverse_contig] {
                    evidence.push(ValidMatePair::new(
                        pair.clone(),
                        forward_map.start_position_of_contig,
                        reverse_map.start_position_of_contig + reverse_map.length - 1,
                        reverse_length.saturating_sub(reverse_map.start_position_of_contig + 1),
                    ));
                }
            }
        }
    }

    Ok(())
}
