use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

use crate::graph::{CompactGraph, NodeId};

use super::{PathFinder, PathFinderError, SearchScratch};

/// single-source-single-target Dijkstra search over a mutable per-thread
/// cost vector. lazily deletes stale frontier entries using the scratch's
/// settled bitmap rather than decreasing keys in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl PathFinder for Dijkstra {
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
        scratch.reset_search();

        let mut frontier: PriorityQueue<NodeId, Reverse<OrderedFloat<f64>>> = PriorityQueue::new();
        scratch.set_cost_so_far(origin, 0.0);
        frontier.push(origin, Reverse(OrderedFloat(0.0)));

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
                    frontier.push(head, Reverse(OrderedFloat(candidate)));
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
    fn finds_cheapest_triangle_route() {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        b.add_link(1, 2, 1.0, vec![]).unwrap();
        b.add_link(0, 2, 3.0, vec![]).unwrap();
        let g = b.build();
        let mut scratch = SearchScratch::new(&g);
        let reached = Dijkstra.find_path(&g, &mut scratch, NodeId(0), NodeId(2)).unwrap();
        assert!(reached);
        assert_eq!(scratch.cost_so_far(NodeId(2)), 2.0);
    }

    #[test]
    fn unreachable_destination_is_reported() {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        let g = b.build();
        let mut scratch = SearchScratch::new(&g);
        let reached = Dijkstra.find_path(&g, &mut scratch, NodeId(0), NodeId(2)).unwrap();
        assert!(!reached);
    }

    #[test]
    fn respects_blocked_links() {
        let mut b = CompactGraphBuilder::new(&[0, 1, 2], false);
        b.add_link(0, 1, 1.0, vec![]).unwrap();
        b.add_link(1, 2, 1.0, vec![]).unwrap();
        let g = b.build();
        let mut scratch = SearchScratch::new(&g);
        scratch.blocked[0] = true;
        let reached = Dijkstra.find_path(&g, &mut scratch, NodeId(0), NodeId(2)).unwrap();
        assert!(!reached);
    }
}
