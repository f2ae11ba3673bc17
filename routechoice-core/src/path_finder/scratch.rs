use crate::graph::{CompactGraph, LinkId, NodeId};

/// per-thread, per-call mutable state for the path finder and the route
/// enumerators that drive it. One instance is allocated per worker thread at
/// batch start and reused across every OD and every search iteration that
/// thread processes.
pub struct SearchScratch {
    /// working link cost vector; the route enumerator mutates this in place
    /// (banning or penalising links) before each search.
    pub cost: Vec<f64>,
    /// per-link centroid-blocking bitmap, toggled by [`CompactGraph::block_centroid_flows`].
    pub blocked: Vec<bool>,
    cost_so_far: Vec<f64>,
    predecessor: Vec<i64>,
    connector: Vec<i64>,
    /// "reached-first" buffer: marks nodes already popped (finalized) from
    /// the frontier, so stale queue entries are skipped rather than reprocessed.
    settled: Vec<bool>,
}

impl SearchScratch {
    pub fn new(graph: &CompactGraph) -> Self {
        let cost = (0..graph.n_links()).map(|i| graph.cost(LinkId(i))).collect();
        Self {
            cost,
            blocked: vec![false; graph.n_links()],
            cost_so_far: vec![f64::INFINITY; graph.n_nodes()],
            predecessor: vec![-1; graph.n_nodes()],
            connector: vec![-1; graph.n_nodes()],
            settled: vec![false; graph.n_nodes()],
        }
    }

    /// restores the working cost vector to the graph's base costs, undoing
    /// any bans or penalties applied by the route enumerator.
    pub fn reset_cost(&mut self, graph: &CompactGraph) {
        for (i, c) in self.cost.iter_mut().enumerate() {
            *c = graph.cost(LinkId(i));
        }
    }

    /// clears per-search state (cost-so-far, predecessor, connector, settled)
    /// ahead of a new origin/destination search. does not touch `cost` or
    /// `blocked`, which are owned by the caller across searches.
    pub fn reset_search(&mut self) {
        self.cost_so_far.iter_mut().for_each(|c| *c = f64::INFINITY);
        self.predecessor.iter_mut().for_each(|p| *p = -1);
        self.connector.iter_mut().for_each(|c| *c = -1);
        self.settled.iter_mut().for_each(|s| *s = false);
    }

    pub fn cost_so_far(&self, node: NodeId) -> f64 {
        self.cost_so_far[node.0]
    }

    pub fn set_cost_so_far(&mut self, node: NodeId, cost: f64) {
        self.cost_so_far[node.0] = cost;
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.settled[node.0]
    }

    pub fn mark_settled(&mut self, node: NodeId) {
        self.settled[node.0] = true;
    }

    pub fn set_predecessor(&mut self, node: NodeId, predecessor: NodeId, via: LinkId) {
        self.predecessor[node.0] = predecessor.0 as i64;
        self.connector[node.0] = via.0 as i64;
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        let p = self.predecessor[node.0];
        (p >= 0).then_some(NodeId(p as usize))
    }

    pub fn connector(&self, node: NodeId) -> Option<LinkId> {
        let c = self.connector[node.0];
        (c >= 0).then_some(LinkId(c as usize))
    }

    pub fn is_reachable(&self, destination: NodeId) -> bool {
        self.predecessor[destination.0] >= 0
    }
}
