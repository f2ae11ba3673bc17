use log::trace;

use crate::graph::{CompactGraph, NodeId};
use crate::path_finder::{backtrack, PathFinder, PathFinderStrategy, SearchScratch};

use super::{validate_node, EnumeratorError, Route, RouteSet};

/// parameters for one link-penalisation run. `penalty` must be `> 1.0`;
/// callers validate this at the batch boundary.
#[derive(Debug, Clone, Copy)]
pub struct LpParams {
    pub penalty: f64,
    pub max_routes: usize,
    pub max_depth: usize,
    pub max_misses: usize,
}

/// iteratively shortest-paths the current (mutating) cost vector, accepting
/// each newly-found route and multiplying the cost of every link it uses by
/// `penalty` so the next iteration prefers a different route.
pub fn enumerate(
    graph: &CompactGraph,
    finder: &PathFinderStrategy,
    scratch: &mut SearchScratch,
    origin: NodeId,
    destination: NodeId,
    params: &LpParams,
) -> Result<Vec<Route>, EnumeratorError> {
    validate_node(graph, origin)?;
    validate_node(graph, destination)?;
    if origin == destination {
        return Ok(Vec::new());
    }

    scratch.reset_cost(graph);
    let mut route_set = RouteSet::new();
    let mut misses = 0usize;
    let mut iterations = 0usize;

    loop {
        if params.max_routes > 0 && route_set.len() >= params.max_routes {
            break;
        }
        if params.max_depth > 0 && iterations >= params.max_depth {
            break;
        }
        if params.max_misses > 0 && misses >= params.max_misses {
            break;
        }
        iterations += 1;

        let reached = finder.find_path(graph, scratch, origin, destination)?;
        if !reached {
            trace!("link-penalisation: destination unreachable at iteration {iterations}");
            misses += 1;
            continue;
        }
        let route = backtrack::reconstruct_route(scratch, origin, destination)?;
        if route.is_empty() || !route_set.insert(route.clone()) {
            misses += 1;
            continue;
        }
        misses = 0;

        for &link in route.iter() {
            scratch.cost[link.0] *= params.penalty;
        }
    }

    Ok(route_set.into_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CompactGraphBuilder, LinkId};

    fn triangle() -> CompactGraph {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        b.add_link(1, 2, 1.0, vec![]).unwrap();
        b.add_link(0, 2, 3.0, vec![]).unwrap();
        b.build()
    }

    #[test]
    fn penalisation_surfaces_second_shortest_path() {
        let g = triangle();
        let finder = PathFinderStrategy::dijkstra();
        let mut scratch = SearchScratch::new(&g);
        let params = LpParams {
            penalty: 2.0,
            max_routes: 3,
            max_depth: 10,
            max_misses: 100,
        };
        let routes =
            enumerate(&g, &finder, &mut scratch, NodeId(0), NodeId(2), &params).unwrap();
        assert_eq!(routes.len(), 2);
        assert!(routes.contains(&vec![LinkId(0), LinkId(1)]));
        assert!(routes.contains(&vec![LinkId(2)]));
    }

    #[test]
    fn max_routes_one_returns_shortest_only() {
        let g = triangle();
        let finder = PathFinderStrategy::dijkstra();
        let mut scratch = SearchScratch::new(&g);
        let params = LpParams {
            penalty: 2.0,
            max_routes: 1,
            max_depth: 10,
            max_misses: 100,
        };
        let routes =
            enumerate(&g, &finder, &mut scratch, NodeId(0), NodeId(2), &params).unwrap();
        assert_eq!(routes, vec![vec![LinkId(0), LinkId(1)]]);
    }
}
