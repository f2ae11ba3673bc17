mod banned_link_set;
mod bfs_le;
mod enumerator_error;
mod lcg;
mod link_penalisation;
mod route_set;

pub use banned_link_set::BannedLinkSet;
pub use bfs_le::{enumerate as enumerate_bfs_le, BfsLeParams};
pub use enumerator_error::EnumeratorError;
pub use lcg::Lcg;
pub use link_penalisation::{enumerate as enumerate_link_penalisation, LpParams};
pub use route_set::{Route, RouteSet};

use crate::graph::{CompactGraph, NodeId};

/// the route enumerator's public entry points check node bounds themselves
/// rather than trusting callers, unlike [`crate::graph::CompactGraph`]'s own
/// methods which index unchecked.
fn validate_node(graph: &CompactGraph, node: NodeId) -> Result<(), EnumeratorError> {
    if node.0 < graph.n_nodes() {
        Ok(())
    } else {
        Err(EnumeratorError::InvalidNode(node))
    }
}
