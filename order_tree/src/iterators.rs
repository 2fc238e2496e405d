//! Iterators over an `OrderTree` in insertion order

use core::iter::FusedIterator;

use crate::{view::ValueRef, OrderTree, PNode};

/// An iterator over the `PNode`s of an `OrderTree` from the first inserted to
/// the last
pub struct Ptrs<'a, K, V> {
    tree: &'a OrderTree<K, V>,
    front: Option<PNode>,
    back: Option<PNode>,
    // the number of nodes between `front` and `back` inclusive, this is what
    // stops the two ends from passing each other
    len: usize,
}

impl<'a, K, V> Iterator for Ptrs<'a, K, V> {
    type Item = PNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let p = self.front?;
        self.len -= 1;
        self.front = self.tree.nodes.get_link(p).and_then(|link| link.next());
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Ptrs<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None
        }
        let p = self.back?;
        self.len -= 1;
        self.back = self.tree.nodes.get_link(p).and_then(|link| link.prev());
        Some(p)
    }
}

impl<'a, K, V> ExactSizeIterator for Ptrs<'a, K, V> {}

impl<'a, K, V> FusedIterator for Ptrs<'a, K, V> {}

/// An iterator over `(PNode, ValueRef)` in insertion order
pub struct Iter<'a, K, V> {
    ptrs: Ptrs<'a, K, V>,
}

impl<'a, K: Ord + Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (PNode, ValueRef<'a, K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.ptrs.tree;
        self.ptrs.next().map(|p| (p, tree.value_ref(p)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ptrs.size_hint()
    }
}

impl<'a, K: Ord + Clone, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.ptrs.tree;
        self.ptrs.next_back().map(|p| (p, tree.value_ref(p)))
    }
}

impl<'a, K: Ord + Clone, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K: Ord + Clone, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a OrderTree<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (PNode, ValueRef<'a, K, V>);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// All iterators here walk the chain, so they return nodes in the order they
/// were last written regardless of depth.
impl<K: Ord + Clone, V> OrderTree<K, V> {
    /// Iterates over the handles of every node
    pub fn ptrs(&self) -> Ptrs<'_, K, V> {
        Ptrs {
            tree: self,
            front: self.first,
            back: self.last,
            len: self.len(),
        }
    }

    /// Iterates over every node and its value
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { ptrs: self.ptrs() }
    }

    /// Iterates over every value, leaves and branches
    pub fn values(
        &self,
    ) -> impl DoubleEndedIterator<Item = ValueRef<'_, K, V>> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    /// Iterates over the leaf values only
    pub fn leaves(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.values().filter_map(ValueRef::leaf)
    }

    fn path_of(&self, p: PNode) -> &[K] {
        match self.node_path(p) {
            Ok(path) => path,
            Err(_) => unreachable!("chain node is not reachable from the root"),
        }
    }

    /// Iterates over the key path of every node. Paths are cached on the nodes
    /// as they are visited.
    pub fn paths(&self) -> impl DoubleEndedIterator<Item = &[K]> + ExactSizeIterator {
        self.ptrs().map(move |p| self.path_of(p))
    }

    /// Iterates over `(path, value)` for every node
    pub fn pairs(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&[K], ValueRef<'_, K, V>)> + ExactSizeIterator {
        self.iter().map(move |(p, v)| (self.path_of(p), v))
    }

    /// Collects `(path, value)` for every node
    pub fn order(&self) -> Vec<(Vec<K>, ValueRef<'_, K, V>)> {
        self.pairs().map(|(path, v)| (path.to_vec(), v)).collect()
    }
}
