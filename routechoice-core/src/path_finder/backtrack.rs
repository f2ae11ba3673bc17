use std::collections::HashSet;

use crate::graph::{LinkId, NodeId};

use super::{PathFinderError, SearchScratch};

/// reconstructs the link sequence from `origin` to `destination` out of a
/// completed search's predecessor/connector arrays, walking up from the
/// destination toward the root and reversing the result.
pub fn reconstruct_route(
    scratch: &SearchScratch,
    origin: NodeId,
    destination: NodeId,
) -> Result<Vec<LinkId>, PathFinderError> {
    let mut route = Vec::new();
    let mut visited = HashSet::new();
    let mut current = destination;
    while current != origin {
        let link = match scratch.connector(current) {
            Some(link) => link,
            None => break,
        };
        if !visited.insert(link) {
            return Err(PathFinderError::LoopDetected(link));
        }
        route.push(link);
        current = match scratch.predecessor(current) {
            Some(p) => p,
            None => break,
        };
    }
    route.reverse();
    Ok(route)
}
