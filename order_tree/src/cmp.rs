use core::fmt;

use crate::OrderTree;

/// Trees are equal if they have the same number of nodes and their values are
/// pairwise equal in insertion order. Branch values are compared by their keyed
/// contents (see [ValueRef](crate::ValueRef)), and identities are never
/// compared, so two trees built from the same literal are equal.
impl<K: Ord + Clone, V: PartialEq> PartialEq for OrderTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        (self.len() == other.len())
            && self
                .values()
                .zip(other.values())
                .all(|(lhs, rhs)| lhs == rhs)
    }
}

impl<K: Ord + Clone, V> OrderTree<K, V> {
    /// Compares only the leaf values, ignoring keys, structure and order
    pub fn contents_equal(&self, other: &Self) -> bool
    where
        V: Ord,
    {
        let mut lhs: Vec<&V> = self.leaves().collect();
        let mut rhs: Vec<&V> = other.leaves().collect();
        lhs.sort_unstable();
        rhs.sort_unstable();
        lhs == rhs
    }
}

/// Formats the `path: value` pairs in insertion order
impl<K: fmt::Debug + Ord + Clone, V: fmt::Debug> fmt::Debug for OrderTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pairs()).finish()
    }
}
