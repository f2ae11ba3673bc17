use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::graph::{CompactGraph, LinkId, NodeId};
use crate::path_finder::{backtrack, PathFinder, PathFinderStrategy, SearchScratch};

use super::{validate_node, BannedLinkSet, EnumeratorError, Lcg, Route, RouteSet};

/// parameters for one BFS-LE run. callers validate these at the batch
/// boundary (see [`super::validate_bfs_le_params`]); this module assumes
/// they are already sound.
#[derive(Debug, Clone, Copy)]
pub struct BfsLeParams {
    pub max_routes: usize,
    pub max_depth: usize,
    pub max_misses: usize,
    /// optional link-penalisation overlay applied between depths, not
    /// within one. `None` disables the overlay.
    pub penalty: Option<f64>,
}

/// explores the "graph of graphs" whose nodes are subgraphs identified by
/// their removed-link set. Level 0 is the empty removed-set; each accepted
/// route at a level spawns one child subgraph per link in that route.
pub fn enumerate(
    graph: &CompactGraph,
    finder: &PathFinderStrategy,
    scratch: &mut SearchScratch,
    origin: NodeId,
    destination: NodeId,
    params: &BfsLeParams,
    rng: &mut Lcg,
) -> Result<Vec<Route>, EnumeratorError> {
    validate_node(graph, origin)?;
    validate_node(graph, destination)?;
    if origin == destination {
        return Ok(Vec::new());
    }

    let mut route_set = RouteSet::new();
    let mut visited: HashSet<BannedLinkSet> = HashSet::new();
    let mut queue: VecDeque<BannedLinkSet> = VecDeque::new();
    let mut next_queue: VecDeque<BannedLinkSet> = VecDeque::new();
    let mut penalty_multiplier = vec![1.0f64; graph.n_links()];
    let mut misses = 0usize;
    let mut depth = 0usize;

    let empty_set = BannedLinkSet::empty();
    visited.insert(empty_set.clone());
    queue.push_back(empty_set);

    'depth_loop: while !queue.is_empty() {
        if params.max_depth > 0 && depth >= params.max_depth {
            break;
        }
        if params.max_routes > 0 && route_set.len() >= params.max_routes {
            break;
        }
        debug!(
            "bfs-le depth {depth}: {} subgraphs queued, {} routes found so far",
            queue.len(),
            route_set.len()
        );

        let mut links_seen_this_depth: HashSet<LinkId> = HashSet::new();

        while let Some(banned) = queue.pop_front() {
            if params.max_routes > 0 && route_set.len() >= params.max_routes {
                break 'depth_loop;
            }
            if params.max_misses > 0 && misses >= params.max_misses {
                break 'depth_loop;
            }

            scratch.reset_cost(graph);
            for link in banned.iter() {
                scratch.cost[link.0] = f64::INFINITY;
            }
            if params.penalty.is_some() {
                for (i, multiplier) in penalty_multiplier.iter().enumerate() {
                    scratch.cost[i] *= *multiplier;
                }
            }

            let reached = finder.find_path(graph, scratch, origin, destination)?;
            if !reached {
                trace!("bfs-le: subgraph with {} bans is unreachable", banned.len());
                continue;
            }
            let route = backtrack::reconstruct_route(scratch, origin, destination)?;
            if route.is_empty() {
                continue;
            }

            if !route_set.insert(route.clone()) {
                misses += 1;
                continue;
            }
            misses = 0;

            for &link in route.iter() {
                links_seen_this_depth.insert(link);
                let child = banned.with_added(link);
                if visited.insert(child.clone()) {
                    next_queue.push_back(child);
                }
            }
        }

        if let Some(penalty) = params.penalty {
            for link in links_seen_this_depth {
                penalty_multiplier[link.0] *= penalty;
            }
        }

        let mut next_vec: Vec<_> = next_queue.drain(..).collect();
        rng.shuffle(&mut next_vec);
        queue = next_vec.into();
        depth += 1;
    }

    Ok(route_set.into_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompactGraphBuilder;
    use crate::path_finder::PathFinderStrategy;

    fn triangle() -> CompactGraph {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.add_link(0, 1, 1.0, vec![10]).unwrap();
        b.add_link(1, 2, 1.0, vec![11]).unwrap();
        b.add_link(0, 2, 3.0, vec![12]).unwrap();
        b.build()
    }

    #[test]
    fn triangle_max_routes_two() {
        let g = triangle();
        let finder = PathFinderStrategy::dijkstra();
        let mut scratch = SearchScratch::new(&g);
        let mut rng = Lcg::new(0);
        let params = BfsLeParams {
            max_routes: 2,
            max_depth: 10,
            max_misses: 100,
            penalty: None,
        };
        let routes = enumerate(&g, &finder, &mut scratch, NodeId(0), NodeId(2), &params, &mut rng).unwrap();
        assert_eq!(routes.len(), 2);
        assert!(routes.contains(&vec![LinkId(0), LinkId(1)]));
        assert!(routes.contains(&vec![LinkId(2)]));
    }

    #[test]
    fn same_origin_destination_is_empty() {
        let g = triangle();
        let finder = PathFinderStrategy::dijkstra();
        let mut scratch = SearchScratch::new(&g);
        let mut rng = Lcg::new(0);
        let params = BfsLeParams {
            max_routes: 5,
            max_depth: 5,
            max_misses: 100,
            penalty: None,
        };
        let routes = enumerate(&g, &finder, &mut scratch, NodeId(0), NodeId(0), &params, &mut rng).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn diamond_finds_both_equal_cost_routes() {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2, 3], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        b.add_link(0, 2, 1.0, vec![]).unwrap();
        b.add_link(1, 3, 1.0, vec![]).unwrap();
        b.add_link(2, 3, 1.0, vec![]).unwrap();
        let g = b.build();
        let finder = PathFinderStrategy::dijkstra();
        let mut scratch = SearchScratch::new(&g);
        let mut rng = Lcg::new(1);
        let params = BfsLeParams {
            max_routes: 2,
            max_depth: 5,
            max_misses: 100,
            penalty: None,
        };
        let routes = enumerate(&g, &finder, &mut scratch, NodeId(0), NodeId(3), &params, &mut rng).unwrap();
        assert_eq!(routes.len(), 2);
    }
}
