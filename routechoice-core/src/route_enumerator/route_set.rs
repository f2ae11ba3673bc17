use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::graph::LinkId;

/// an ordered sequence of compact link ids from an origin to a destination.
pub type Route = Vec<LinkId>;

fn hash_route(route: &Route) -> u64 {
    let mut hasher = DefaultHasher::new();
    route.hash(&mut hasher);
    hasher.finish()
}

/// a deduplicated collection of routes for a single OD, keyed by a hash over
/// the ordered link-id sequence (order-sensitive, unlike [`super::BannedLinkSet`]).
#[derive(Debug, Default)]
pub struct RouteSet {
    seen: HashSet<u64>,
    routes: Vec<Route>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    /// inserts `route` if it has not been seen before. returns `true` if it
    /// was newly inserted, `false` if it was a duplicate.
    pub fn insert(&mut self, route: Route) -> bool {
        let hash = hash_route(&route);
        if self.seen.insert(hash) {
            self.routes.push(route);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_identical_sequences() {
        let mut set = RouteSet::new();
        assert!(set.insert(vec![LinkId(0), LinkId(1)]));
        assert!(!set.insert(vec![LinkId(0), LinkId(1)]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn order_sensitive() {
        let mut set = RouteSet::new();
        assert!(set.insert(vec![LinkId(0), LinkId(1)]));
        assert!(set.insert(vec![LinkId(1), LinkId(0)]));
        assert_eq!(set.len(), 2);
    }
}
