use crate::graph::NodeId;
use crate::path_finder::PathFinderError;

#[derive(thiserror::Error, Debug)]
pub enum EnumeratorError {
    #[error("node {0:?} is not present in the compact graph")]
    InvalidNode(NodeId),
    #[error("invalid route enumeration parameters: {0}")]
    InvalidParameters(String),
    #[error("route enumeration failed during search: {0}")]
    PathFinder(#[from] PathFinderError),
}
