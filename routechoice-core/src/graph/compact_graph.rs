use std::collections::HashMap;

use geo::{coord, Coord};

use super::{GraphError, LinkId, NodeId};

/// Read-only, forward-star indexed view of a topologically-compressed road
/// network. Node `0..n_zones` are centroid/zone nodes; every other node is an
/// intermediate network node. A compact link may expand to one or more
/// original network link ids via `compressed_to_network`.
///
/// # Performance
///
/// `cost`, `head`, and `neighbors` are all _O(1)_ or amortized _O(deg)_.
/// There is no interior mutability: per-call mutable state (the working cost
/// vector, predecessor/connector arrays, centroid-blocking bitmap) lives in
/// caller-owned scratch, one instance per worker thread.
#[derive(Debug)]
pub struct CompactGraph {
    n_nodes: usize,
    n_zones: usize,
    block_centroid_flows: bool,
    cost: Box<[f64]>,
    head: Box<[NodeId]>,
    forward_star: Box<[(u32, u32)]>,
    compressed_to_network: Box<[(u32, u32)]>,
    network_link_ids: Box<[u32]>,
    node_to_index: HashMap<i64, NodeId>,
    coords: Box<[Option<Coord<f64>>]>,
    incoming_by_zone: Box<[Vec<LinkId>]>,
}

impl CompactGraph {
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn n_links(&self) -> usize {
        self.cost.len()
    }

    pub fn n_zones(&self) -> usize {
        self.n_zones
    }

    pub fn blocks_centroid_flows(&self) -> bool {
        self.block_centroid_flows
    }

    /// maps an external (caller-facing) node id to its compact index, or
    /// `None` if the node is absent from the compact graph.
    pub fn external_to_index(&self, external: i64) -> Option<NodeId> {
        self.node_to_index.get(&external).copied()
    }

    /// base (unmodified) cost of a link. panics if `link` is out of range:
    /// an out-of-range link id is a programming error, never user input.
    pub fn cost(&self, link: LinkId) -> f64 {
        self.cost[link.0]
    }

    /// the node a link terminates at.
    pub fn head(&self, link: LinkId) -> NodeId {
        self.head[link.0]
    }

    /// the `[start, end)` range into the link arrays for links leaving `node`.
    pub fn forward_star(&self, node: NodeId) -> (u32, u32) {
        self.forward_star[node.0]
    }

    /// iterate the `(link, head)` pairs of every link leaving `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (LinkId, NodeId)> + '_ {
        let (start, end) = self.forward_star[node.0];
        (start..end).map(|i| (LinkId(i as usize), self.head[i as usize]))
    }

    /// the original network link ids a compact link expands to, in order.
    pub fn expand(&self, link: LinkId) -> &[u32] {
        let (start, end) = self.compressed_to_network[link.0];
        &self.network_link_ids[start as usize..end as usize]
    }

    pub fn total_network_links(&self) -> usize {
        self.network_link_ids
            .iter()
            .copied()
            .max()
            .map(|m| m as usize + 1)
            .unwrap_or(0)
    }

    pub fn coordinate(&self, node: NodeId) -> Option<Coord<f64>> {
        self.coords[node.0]
    }

    /// mark every link touching a centroid/zone other than `origin` or
    /// `destination` as blocked in the caller's per-thread bitmap, so a
    /// route cannot pass through a third-party centroid. Idempotent and
    /// thread-local: `blocked` belongs to the calling worker.
    pub fn block_centroid_flows(&self, blocked: &mut [bool], origin: NodeId, destination: NodeId) {
        if !self.block_centroid_flows {
            return;
        }
        for zone in 0..self.n_zones {
            if zone != origin.0 {
                let (start, end) = self.forward_star[zone];
                for i in start as usize..end as usize {
                    blocked[i] = true;
                }
            }
        }
        for zone in 0..self.n_zones {
            if zone != destination.0 {
                for link in self.incoming_by_zone[zone].iter() {
                    blocked[link.0] = true;
                }
            }
        }
    }

    /// reverses `block_centroid_flows`, restoring `blocked` to all-clear.
    pub fn unblock_centroid_flows(&self, blocked: &mut [bool]) {
        blocked.iter_mut().for_each(|b| *b = false);
    }
}

struct RawLink {
    src: NodeId,
    dst: NodeId,
    cost: f64,
    network_link_ids: Vec<u32>,
}

/// builds a [`CompactGraph`] from externally-keyed link records. Nodes are
/// interned on first sight; pass `zones` up front so the first `zones.len()`
/// compact node indices are the centroid/zone nodes, matching the convention
/// `block_centroid_flows` relies on.
pub struct CompactGraphBuilder {
    n_zones: usize,
    block_centroid_flows: bool,
    node_to_index: HashMap<i64, NodeId>,
    coords: Vec<Option<Coord<f64>>>,
    links: Vec<RawLink>,
}

impl CompactGraphBuilder {
    pub fn new(zones: &[i64], block_centroid_flows: bool) -> Self {
        let mut node_to_index = HashMap::new();
        let mut coords = Vec::with_capacity(zones.len());
        for (i, external) in zones.iter().enumerate() {
            node_to_index.insert(*external, NodeId(i));
            coords.push(None);
        }
        Self {
            n_zones: zones.len(),
            block_centroid_flows,
            node_to_index,
            coords,
            links: Vec::new(),
        }
    }

    fn intern(&mut self, external: i64) -> NodeId {
        if let Some(id) = self.node_to_index.get(&external) {
            return *id;
        }
        let id = NodeId(self.node_to_index.len());
        self.node_to_index.insert(external, id);
        self.coords.push(None);
        id
    }

    /// records the WGS84 coordinate of a node, used by the A* heuristic.
    pub fn set_coordinate(&mut self, external: i64, x: f64, y: f64) -> NodeId {
        let id = self.intern(external);
        self.coords[id.0] = Some(coord! {x: x, y: y});
        id
    }

    pub fn add_link(
        &mut self,
        external_src: i64,
        external_dst: i64,
        cost: f64,
        network_link_ids: Vec<u32>,
    ) -> Result<LinkId, GraphError> {
        if !(cost.is_finite() && cost >= 0.0) {
            return Err(GraphError::InvalidCost(cost, external_src, external_dst));
        }
        let src = self.intern(external_src);
        let dst = self.intern(external_dst);
        let id = LinkId(self.links.len());
        self.links.push(RawLink {
            src,
            dst,
            cost,
            network_link_ids,
        });
        Ok(id)
    }

    pub fn build(self) -> CompactGraph {
        let n_nodes = self.node_to_index.len();
        let mut order: Vec<usize> = (0..self.links.len()).collect();
        order.sort_by_key(|&i| self.links[i].src.0);

        let mut head = Vec::with_capacity(order.len());
        let mut src_of = Vec::with_capacity(order.len());
        let mut cost = Vec::with_capacity(order.len());
        let mut compressed_to_network = Vec::with_capacity(order.len());
        let mut network_link_ids = Vec::new();

        for &old_idx in order.iter() {
            let link = &self.links[old_idx];
            head.push(link.dst);
            src_of.push(link.src);
            cost.push(link.cost);
            let start = network_link_ids.len() as u32;
            network_link_ids.extend(link.network_link_ids.iter().copied());
            let end = network_link_ids.len() as u32;
            compressed_to_network.push((start, end));
        }

        let mut forward_star = vec![(0u32, 0u32); n_nodes];
        let mut i = 0usize;
        while i < src_of.len() {
            let node = src_of[i].0;
            let start = i;
            while i < src_of.len() && src_of[i].0 == node {
                i += 1;
            }
            forward_star[node] = (start as u32, i as u32);
        }

        let mut incoming_by_zone: Vec<Vec<LinkId>> = vec![Vec::new(); self.n_zones];
        for (new_id, h) in head.iter().enumerate() {
            if h.0 < self.n_zones {
                incoming_by_zone[h.0].push(LinkId(new_id));
            }
        }

        CompactGraph {
            n_nodes,
            n_zones: self.n_zones,
            block_centroid_flows: self.block_centroid_flows,
            cost: cost.into_boxed_slice(),
            head: head.into_boxed_slice(),
            forward_star: forward_star.into_boxed_slice(),
            compressed_to_network: compressed_to_network.into_boxed_slice(),
            network_link_ids: network_link_ids.into_boxed_slice(),
            node_to_index: self.node_to_index,
            coords: self.coords.into_boxed_slice(),
            incoming_by_zone: incoming_by_zone.into_boxed_slice(),
        }
    }
}
