mod a_star;
pub mod backtrack;
mod dijkstra;
pub mod heuristic;
mod path_finder_error;
mod scratch;

pub use a_star::AStar;
pub use dijkstra::Dijkstra;
pub use path_finder_error::PathFinderError;
pub use scratch::SearchScratch;

use crate::graph::{CompactGraph, NodeId};

/// capability implemented by each search back-end. `find_path` returns
/// whether `destination` was reached; the resulting route is read back out
/// of `scratch` via [`backtrack::reconstruct_route`].
pub trait PathFinder {
    fn find_path(
        &self,
        graph: &CompactGraph,
        scratch: &mut SearchScratch,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<bool, PathFinderError>;
}

/// selects between the two search back-ends without paying for dynamic
/// dispatch on the hot path; chosen once per batch from `a_star` config.
#[derive(Debug, Clone, Copy)]
pub enum PathFinderStrategy {
    Dijkstra(Dijkstra),
    AStar(AStar),
}

impl PathFinderStrategy {
    pub fn dijkstra() -> Self {
        Self::Dijkstra(Dijkstra)
    }

    pub fn a_star(min_cost_per_meter: f64) -> Self {
        Self::AStar(AStar { min_cost_per_meter })
    }
}

impl PathFinder for PathFinderStrategy {
    fn find_path(
        &self,
        graph: &CompactGraph,
        scratch: &mut SearchScratch,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<bool, PathFinderError> {
        match self {
            Self::Dijkstra(d) => d.find_path(graph, scratch, origin, destination),
            Self::AStar(a) => a.find_path(graph, scratch, origin, destination),
        }
    }
}
