//! fixtures shared across the route enumerator, choice-results, and
//! link-loading test modules, mirroring the small mock graphs used across
//! this crate's component tests.

use crate::graph::{CompactGraph, CompactGraphBuilder};

/// nodes `{0,1,2}`, edges `0->1` (cost 1), `1->2` (cost 1), `0->2` (cost 3).
pub fn triangle_graph() -> CompactGraph {
    let mut builder = CompactGraphBuilder::new(&[0, 1, 2], false);
    builder.add_link(0, 1, 1.0, vec![100]).unwrap();
    builder.add_link(1, 2, 1.0, vec![101]).unwrap();
    builder.add_link(0, 2, 3.0, vec![102]).unwrap();
    builder.build()
}

/// `triangle_graph` with an additional free `0->2` edge (cost 0), used to
/// exercise the zero-cost masking pathology.
pub fn triangle_graph_with_zero_cost_edge() -> CompactGraph {
    let mut builder = CompactGraphBuilder::new(&[0, 1, 2], false);
    builder.add_link(0, 1, 1.0, vec![100]).unwrap();
    builder.add_link(1, 2, 1.0, vec![101]).unwrap();
    builder.add_link(0, 2, 3.0, vec![102]).unwrap();
    builder.add_link(0, 2, 0.0, vec![103]).unwrap();
    builder.build()
}

/// nodes `{0,1,2,3}`, two equal-cost paths `0->1->3` and `0->2->3`, cost 1 per edge.
pub fn diamond_graph() -> CompactGraph {
    let mut builder = CompactGraphBuilder::new(&[0, 1, 2, 3], false);
    builder.add_link(0, 1, 1.0, vec![200]).unwrap();
    builder.add_link(0, 2, 1.0, vec![201]).unwrap();
    builder.add_link(1, 3, 1.0, vec![202]).unwrap();
    builder.add_link(2, 3, 1.0, vec![203]).unwrap();
    builder.build()
}
