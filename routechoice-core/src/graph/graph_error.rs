#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("link cost must be finite and non-negative, found {0} on link with external endpoints ({1}, {2})")]
    InvalidCost(f64, i64, i64),
    #[error("node {0} referenced by a link is not present in the node set")]
    UnknownExternalNode(i64),
}
