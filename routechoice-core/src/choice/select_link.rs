use std::collections::HashMap;

use crate::graph::LinkId;
use crate::route_enumerator::Route;

/// a named `OR(AND(..), AND(..), ...)` query over compact link ids.
#[derive(Debug, Clone, Default)]
pub struct SelectLinkQuery {
    and_sets: Vec<Vec<LinkId>>,
}

impl SelectLinkQuery {
    pub fn new(and_sets: Vec<Vec<LinkId>>) -> Self {
        Self { and_sets }
    }

    /// a route satisfies the query if it contains every link of at least one
    /// AND-set. counts each AND-set's remaining unseen members down as the
    /// route is scanned once; the first AND-set to reach zero short-circuits
    /// the check.
    pub fn is_satisfied_by(&self, route: &[LinkId]) -> bool {
        if self.and_sets.iter().any(|set| set.is_empty()) {
            return true;
        }
        let mut remaining: Vec<HashMap<LinkId, ()>> = self
            .and_sets
            .iter()
            .map(|set| set.iter().map(|&l| (l, ())).collect())
            .collect();
        let mut counts: Vec<usize> = self.and_sets.iter().map(|set| set.len()).collect();

        for &link in route {
            for (i, set) in remaining.iter_mut().enumerate() {
                if counts[i] == 0 {
                    continue;
                }
                if set.remove(&link).is_some() {
                    counts[i] -= 1;
                    if counts[i] == 0 {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// a collection of named select-link queries, evaluated per route.
#[derive(Debug, Clone, Default)]
pub struct SelectLinkSet {
    queries: HashMap<String, SelectLinkQuery>,
}

impl SelectLinkSet {
    pub fn new(queries: HashMap<String, SelectLinkQuery>) -> Self {
        Self { queries }
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SelectLinkQuery)> {
        self.queries.iter()
    }

    /// names of every query that `route` satisfies.
    pub fn matching(&self, route: &Route) -> Vec<&str> {
        self.queries
            .iter()
            .filter(|(_, q)| q.is_satisfied_by(route))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_set_requires_all_members() {
        let q = SelectLinkQuery::new(vec![vec![LinkId(0), LinkId(1)]]);
        assert!(q.is_satisfied_by(&[LinkId(0), LinkId(1), LinkId(2)]));
        assert!(!q.is_satisfied_by(&[LinkId(0), LinkId(2)]));
    }

    #[test]
    fn or_of_and_sets_matches_either() {
        let q = SelectLinkQuery::new(vec![vec![LinkId(0)], vec![LinkId(5)]]);
        assert!(q.is_satisfied_by(&[LinkId(5)]));
        assert!(!q.is_satisfied_by(&[LinkId(9)]));
    }

    #[test]
    fn and_set_on_single_edge_qualifies_triangle_route() {
        let q = SelectLinkQuery::new(vec![vec![LinkId(0)]]);
        assert!(q.is_satisfied_by(&[LinkId(0), LinkId(1)]));
        assert!(!q.is_satisfied_by(&[LinkId(2)]));
    }
}
