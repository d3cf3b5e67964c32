//! Gap estimation between linked contigs.
//!
//! Each mate pair gives two distance estimates, one per orientation of the
//! reverse read:
//!
//! ```text
//!   forward contig (len L)            reverse contig
//! |=========f-------->|  ?gap?  |<------r==========|
//!           |<------- library insert length -------->|
//!
//! d = mean - (L - f) - (r + 1)
//! ```
//!
//! Observations for one contig pair are bundled (inverse-variance mean of the
//! estimates lying within 3 standard deviations of each other) and whatever
//! remains is collapsed into one weight-weighted edge.

use crate::config::CloneLibrary;
use crate::error::{Result, ScaffoldError};
use crate::scaffold::mate_pairs::{ContigMatePairs, PartnerMap, ValidMatePair};
use crate::scaffold::sequence::Contig;
use ahash::AHashMap;
use rayon::prelude::*;
use tracing::info;

/// Width of the bundling window in standard deviations.
const BUNDLE_WINDOW_SIGMAS: f32 = 3.0;

pub struct DistanceCalculator<'a> {
    contig_lengths: AHashMap<usize, usize>,
    libraries: &'a CloneLibrary,
}

impl<'a> DistanceCalculator<'a> {
    pub fn new(contigs: &[Contig], libraries: &'a CloneLibrary) -> Self {
        Self {
            contig_lengths: contigs.iter().map(|c| (c.id, c.len())).collect(),
            libraries,
        }
    }

    /// Annotate every evidence list with its gap estimate, in place.
    ///
    /// On return each contig pair holds exactly one [`ValidMatePair`].
    pub fn calculate_distance(&self, mate_pairs: &mut ContigMatePairs) -> Result<()> {
        let forwards: Vec<(usize, &mut PartnerMap)> = mate_pairs
            .as_map_mut()
            .iter_mut()
            .map(|(&forward, partners)| (forward, partners))
            .collect();

        forwards.into_par_iter().try_for_each(|(forward, partners)| -> Result<()> {
            let length = *self
                .contig_lengths
                .get(&forward)
                .ok_or(ScaffoldError::UnknownContig(forward))?;

            let lists: Vec<&mut Vec<ValidMatePair>> = partners.values_mut().collect();
            lists.into_par_iter().try_for_each(|evidence| -> Result<()> {
                evidence
                    .par_iter_mut()
                    .try_for_each(|pair| self.estimate(pair, length))?;
                bundle_edges(evidence);
                weighted_edge(evidence);
                Ok(())
            })
        })?;

        info!("Estimated gap distances for {} contig pairs", mate_pairs.pair_count());
        Ok(())
    }

    /// Fill in both distance interpretations for one observation.
    fn estimate(&self, pair: &mut ValidMatePair, forward_contig_length: usize) -> Result<()> {
        let name = pair.library().unwrap_or_default();
        let library = self
            .libraries
            .get_library_information(name)
            .ok_or_else(|| ScaffoldError::UnknownLibrary(name.to_string()))?;

        let mean = library.mean_length_of_insert;
        let deviation = if library.standard_deviation_of_insert == 0.0 {
            1.0
        } else {
            library.standard_deviation_of_insert
        };

        let mut distances = Vec::with_capacity(2 * pair.forward_read_start_position.len());
        for (i, &forward_start) in pair.forward_read_start_position.iter().enumerate() {
            if let Some(&reverse_start) = pair.reverse_read_start_position.get(i) {
                distances.push(gap(mean, forward_contig_length, forward_start, reverse_start));
            }
            if let Some(&rc_start) = pair.reverse_read_reverse_complement_start_position.get(i) {
                distances.push(gap(mean, forward_contig_length, forward_start, rc_start));
            }
        }

        pair.standard_deviation = vec![deviation; distances.len()];
        pair.distance_between_contigs = distances;
        pair.weight = 1;
        Ok(())
    }
}

fn gap(mean: f32, forward_contig_length: usize, forward_start: usize, reverse_start: usize) -> f32 {
    mean - (forward_contig_length as f32 - forward_start as f32) - (reverse_start as f32 + 1.0)
}

/// Merge observations whose forward-interpretation distances agree.
///
/// Scans from the front; every entry within 3 standard deviations of the
/// current entry's distance is replaced by one inverse-variance weighted
/// entry appended at the end, and the scan restarts from the front.
pub fn bundle_edges(evidence: &mut Vec<ValidMatePair>) {
    let mut index = 0;
    while index < evidence.len() {
        let anchor = &evidence[index];
        let (center, sigma) = match (
            anchor.distance_between_contigs.first(),
            anchor.standard_deviation.first(),
        ) {
            (Some(&d), Some(&s)) => (d, s),
            _ => {
                index += 1;
                continue;
            }
        };

        let low = center - BUNDLE_WINDOW_SIGMAS * sigma;
        let high = center + BUNDLE_WINDOW_SIGMAS * sigma;
        let in_window = |pair: &ValidMatePair| {
            pair.distance_between_contigs
                .first()
                .map_or(false, |&d| d >= low && d <= high)
        };

        if evidence.iter().filter(|&p| in_window(p)).count() > 1 {
            let (matched, rest): (Vec<ValidMatePair>, Vec<ValidMatePair>) =
                std::mem::take(evidence).into_iter().partition(|p| in_window(p));
            *evidence = rest;
            evidence.push(inverse_variance_merge(&matched));
            index = 0;
        } else {
            index += 1;
        }
    }
}

/// Collapse all remaining entries into one, weighting by observation count.
pub fn weighted_edge(evidence: &mut Vec<ValidMatePair>) {
    if evidence.len() <= 1 {
        return;
    }

    let total_weight: u32 = evidence.iter().map(|p| p.weight).sum();
    let dimensions = estimate_dimensions(evidence);
    let mut distances = Vec::with_capacity(dimensions);
    let mut deviations = Vec::with_capacity(dimensions);

    for i in 0..dimensions {
        let mut distance_sum = 0.0f64;
        let mut deviation_sum = 0.0f64;
        for pair in evidence.iter() {
            let weight = pair.weight as f64;
            distance_sum += pair.distance_between_contigs[i] as f64 * weight;
            deviation_sum += pair.standard_deviation[i] as f64 * weight;
        }
        distances.push((distance_sum / total_weight as f64) as f32);
        deviations.push((deviation_sum / total_weight as f64) as f32);
    }

    *evidence = vec![ValidMatePair::with_estimates(distances, deviations, total_weight)];
}

fn inverse_variance_merge(matched: &[ValidMatePair]) -> ValidMatePair {
    let dimensions = estimate_dimensions(matched);
    let mut distances = Vec::with_capacity(dimensions);
    let mut deviations = Vec::with_capacity(dimensions);

    for i in 0..dimensions {
        let mut precision = 0.0f64;
        let mut weighted_sum = 0.0f64;
        for pair in matched {
            let sigma = pair.standard_deviation[i] as f64;
            let inverse_variance = 1.0 / (sigma * sigma);
            precision += inverse_variance;
            weighted_sum += pair.distance_between_contigs[i] as f64 * inverse_variance;
        }
        distances.push((weighted_sum / precision) as f32);
        deviations.push((1.0 / precision.sqrt()) as f32);
    }

    let weight = matched.iter().map(|p| p.weight).sum();
    ValidMatePair::with_estimates(distances, deviations, weight)
}

/// Number of estimate indices every entry carries.
fn estimate_dimensions(pairs: &[ValidMatePair]) -> usize {
    pairs
        .iter()
        .map(|p| p.distance_between_contigs.len().min(p.standard_deviation.len()))
        .min()
        .unwrap_or(0)
}
