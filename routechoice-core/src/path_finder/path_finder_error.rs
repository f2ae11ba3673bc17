use crate::graph::{LinkId, NodeId};

#[derive(thiserror::Error, Debug)]
pub enum PathFinderError {
    #[error("A* heuristic requires a coordinate for node {0:?} but none was provided")]
    MissingCoordinate(NodeId),
    #[error("coordinate out of WGS84 range: ({0}, {1})")]
    InvalidCoordinate(f64, f64),
    #[error("search loop detected at link {0:?}; predecessor chain did not terminate at the origin")]
    LoopDetected(LinkId),
}
