use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

use crate::graph::{CompactGraph, NodeId};

use super::heuristic::haversine_distance_meters;
use super::{PathFinder, PathFinderError, SearchScratch};

/// A* search using a haversine lower-bound heuristic. Admissibility depends
/// on `min_cost_per_meter` being a true lower bound on the network's cost
/// density (e.g. `1 / free_flow_speed` for a travel-time cost); callers
/// without reliable node coordinates should fall back to [`super::Dijkstra`].
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    pub min_cost_per_meter: f64,
}

impl Default for AStar {
    fn default() -> Self {
        Self {
            min_cost_per_meter: 1.0,
        }
    }
}

impl AStar {
    fn heuristic(
        &self,
        graph: &CompactGraph,
        node: NodeId,
        dest_x: f64,
        dest_y: f64,
    ) -> Result<f64, PathFinderError> {
        let c = graph
            .coordinate(node)
            .ok_or(PathFinderError::MissingCoordinate(node))?;
        let meters = haversine_distance_meters(c.x, c.y, dest_x, dest_y)?;
        Ok(meters * self.min_cost_per_meter)
    }
}

impl PathFinder for AStar {
    fn find_path(
        &self,
        graph: &CompactGraph,
        scratch: &mut SearchScratch,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<bool, PathFinderError> {
        if origin == destination {
            return Ok(true);
        }
        let dest_coord = graph
            .coordinate(destination)
            .ok_or(PathFinderError::MissingCoordinate(destination))?;
        scratch.reset_search();

        let mut frontier: PriorityQueue<NodeId, Reverse<OrderedFloat<f64>>> = PriorityQueue::new();
        scratch.set_cost_so_far(origin, 0.0);
        let h0 = self.heuristic(graph, origin, dest_coord.x, dest_coord.y)?;
        frontier.push(origin, Reverse(OrderedFloat(h0)));

        while let Some((node, _)) = frontier.pop() {
            if scratch.is_settled(node) {
                continue;
            }
            scratch.mark_settled(node);
            if node == destination {
                return Ok(true);
            }
            let cost_here = scratch.cost_so_far(node);

            for (link, head) in graph.neighbors(node) {
                if scratch.blocked[link.0] || scratch.is_settled(head) {
                    continue;
                }
                let link_cost = scratch.cost[link.0];
                if !link_cost.is_finite() {
                    continue;
                }
                let candidate = cost_here + link_cost;
                if candidate < scratch.cost_so_far(head) {
                    scratch.set_cost_so_far(head, candidate);
                    scratch.set_predecessor(head, node, link);
                    let h = self.heuristic(graph, head, dest_coord.x, dest_coord.y)?;
                    frontier.push(head, Reverse(OrderedFloat(candidate + h)));
                }
            }
        }

        Ok(scratch.is_reachable(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompactGraphBuilder;

    #[test]
    fn finds_cheapest_route_with_coordinates() {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.set_coordinate(0, -105.0, 39.0);
        b.set_coordinate(1, -104.99, 39.0);
        b.set_coordinate(2, -104.98, 39.0);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        b.add_link(1, 2, 1.0, vec![]).unwrap();
        b.add_link(0, 2, 3.0, vec![]).unwrap();
        let g = b.build();
        let mut scratch = SearchScratch::new(&g);
        let reached = AStar::default()
            .find_path(&g, &mut scratch, NodeId(0), NodeId(2))
            .unwrap();
        assert!(reached);
        assert_eq!(scratch.cost_so_far(NodeId(2)), 2.0);
    }

    #[test]
    fn missing_coordinate_is_an_error() {
        let mut b = CompactGraphBuilder::new(&[0, 1], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        let g = b.build();
        let mut scratch = SearchScratch::new(&g);
        let result = AStar::default().find_path(&g, &mut scratch, NodeId(0), NodeId(1));
        assert!(result.is_err());
    }
}
