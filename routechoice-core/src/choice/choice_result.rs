use std::collections::HashMap;

use itertools::Itertools;
use log::warn;

use crate::choice::binary_logit::{inverse_binary_logit, scaled_cutoff_prob};
use crate::graph::{CompactGraph, LinkId};
use crate::route_enumerator::Route;

/// per-OD path-size-logit discrete choice result: parallel vectors of length
/// `|route set|`, indexed the same as the route set they were computed from.
#[derive(Debug, Clone, Default)]
pub struct ChoiceResult {
    pub cost: Vec<f64>,
    pub mask: Vec<bool>,
    pub path_overlap: Vec<f64>,
    pub probability: Vec<f64>,
}

/// scores a route set against its base link costs under the path-size-logit
/// model: binary-logit cutoff masking, path-size overlap, and logit choice
/// probabilities. `beta` is the path-size exponent; `cutoff_prob` is the
/// caller-visible fraction of demand to drop below the cheapest route.
pub fn compute(graph: &CompactGraph, routes: &[Route], beta: f64, cutoff_prob: f64) -> ChoiceResult {
    let n = routes.len();
    if n == 0 {
        return ChoiceResult::default();
    }

    let cost: Vec<f64> = routes
        .iter()
        .map(|route| route.iter().map(|&link| graph.cost(link)).sum())
        .collect();

    if cost.iter().any(|&c| c == 0.0) {
        warn!("route set contains a zero-cost route; masking entire set");
        return ChoiceResult {
            cost,
            mask: vec![false; n],
            path_overlap: vec![0.0; n],
            probability: vec![0.0; n],
        };
    }

    let c_min = cost.iter().cloned().fold(f64::INFINITY, f64::min);
    let cutoff = c_min + inverse_binary_logit(scaled_cutoff_prob(cutoff_prob), 0.0, 1.0);
    let mask: Vec<bool> = cost.iter().map(|&c| c <= cutoff).collect();

    // frequency table: sort the concatenation of every unmasked route's
    // links and run-length count the sorted sequence.
    let unmasked_links: Vec<LinkId> = routes
        .iter()
        .zip(mask.iter())
        .filter(|(_, &included)| included)
        .flat_map(|(route, _)| route.iter().copied())
        .sorted()
        .collect();
    let frequency: HashMap<LinkId, usize> = unmasked_links
        .into_iter()
        .chunk_by(|&link| link)
        .into_iter()
        .map(|(link, group)| (link, group.count()))
        .collect();

    let path_overlap: Vec<f64> = routes
        .iter()
        .zip(cost.iter())
        .zip(mask.iter())
        .map(|((route, &route_cost), &included)| {
            if !included {
                return 0.0;
            }
            let sum: f64 = route
                .iter()
                .map(|&link| {
                    let freq = *frequency.get(&link).unwrap_or(&1) as f64;
                    graph.cost(link) / freq
                })
                .sum();
            sum / route_cost
        })
        .collect();

    let probability: Vec<f64> = (0..n)
        .map(|j| {
            if !mask[j] {
                return 0.0;
            }
            let denom: f64 = (0..n)
                .filter(|&k| mask[k])
                .map(|k| {
                    (path_overlap[k] / path_overlap[j]).powf(beta) * (cost[j] - cost[k]).exp()
                })
                .sum();
            1.0 / denom
        })
        .collect();

    ChoiceResult {
        cost,
        mask,
        path_overlap,
        probability,
    }
}
