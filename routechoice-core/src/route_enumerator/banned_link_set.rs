use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::graph::LinkId;

/// an unordered set of banned (removed) links. Equality is plain set
/// equality; hashing sums a per-element hash modulo the word so that two
/// sets with identical membership hash equally regardless of the order
/// their members were inserted in. This is what lets the BFS-LE queue use a
/// `HashSet<BannedLinkSet>` as its "subgraphs already visited" index.
#[derive(Debug, Clone, Default, Eq)]
pub struct BannedLinkSet {
    members: HashSet<LinkId>,
}

impl BannedLinkSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, link: LinkId) -> bool {
        self.members.contains(&link)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkId> {
        self.members.iter()
    }

    /// returns a new set with `link` added, leaving `self` untouched.
    pub fn with_added(&self, link: LinkId) -> Self {
        let mut members = self.members.clone();
        members.insert(link);
        Self { members }
    }
}

impl PartialEq for BannedLinkSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Hash for BannedLinkSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.members.iter().fold(0u64, |acc, link| {
            let mut member_hasher = DefaultHasher::new();
            link.hash(&mut member_hasher);
            acc.wrapping_add(member_hasher.finish())
        });
        state.write_u64(combined);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_independent_equality_and_hash() {
        let a = BannedLinkSet::empty().with_added(LinkId(1)).with_added(LinkId(2));
        let b = BannedLinkSet::empty().with_added(LinkId(2)).with_added(LinkId(1));
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn distinct_membership_is_unequal() {
        let a = BannedLinkSet::empty().with_added(LinkId(1));
        let b = BannedLinkSet::empty().with_added(LinkId(2));
        assert_ne!(a, b);
    }
}
