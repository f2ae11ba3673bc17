mod compact_graph;
mod graph_error;
mod link_id;
mod node_id;

pub use compact_graph::{CompactGraph, CompactGraphBuilder};
pub use graph_error::GraphError;
pub use link_id::LinkId;
pub use node_id::NodeId;
