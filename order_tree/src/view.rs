use core::fmt;

use crate::{Literal, OrderTree, PLevel, PNode, Unique};

/// The result of resolving a path, see [OrderTree::at]
pub enum At<'a, K, V> {
    /// The path ends at a live node
    Node(PNode),
    /// The path is empty, so it ends at the level it started from
    Level(BranchRef<'a, K, V>),
    /// The path fell off the tree, so it resolves to the default node
    Default(&'a Unique<Option<V>>),
}

impl<'a, K, V> At<'a, K, V> {
    pub fn node(&self) -> Option<PNode> {
        match self {
            At::Node(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, At::Default(_))
    }
}

impl<'a, K: fmt::Debug + Ord + Clone, V: fmt::Debug> fmt::Debug for At<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            At::Node(p) => f.debug_tuple("Node").field(p).finish(),
            At::Level(branch) => f.debug_tuple("Level").field(branch).finish(),
            At::Default(default) => f.debug_tuple("Default").field(default).finish(),
        }
    }
}

/// A borrowed value in an `OrderTree`
pub enum ValueRef<'a, K, V> {
    Leaf(&'a V),
    Branch(BranchRef<'a, K, V>),
}

impl<'a, K, V> Clone for ValueRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for ValueRef<'a, K, V> {}

impl<'a, K: Ord + Clone, V> ValueRef<'a, K, V> {
    pub fn leaf(self) -> Option<&'a V> {
        match self {
            ValueRef::Leaf(v) => Some(v),
            ValueRef::Branch(_) => None,
        }
    }

    pub fn branch(self) -> Option<BranchRef<'a, K, V>> {
        match self {
            ValueRef::Leaf(_) => None,
            ValueRef::Branch(branch) => Some(branch),
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, ValueRef::Leaf(_))
    }

    /// Clones the value out into a `Literal`
    pub fn to_literal(self) -> Literal<K, V>
    where
        V: Clone,
    {
        match self {
            ValueRef::Leaf(v) => Literal::Leaf(v.clone()),
            ValueRef::Branch(branch) => branch.to_literal(),
        }
    }
}

/// Leaves compare by value and branches compare by their keyed contents,
/// recursively. The insertion order inside a branch does not matter.
impl<'a, 'b, K: Ord + Clone, V: PartialEq> PartialEq<ValueRef<'b, K, V>> for ValueRef<'a, K, V> {
    fn eq(&self, other: &ValueRef<'b, K, V>) -> bool {
        match (self, other) {
            (ValueRef::Leaf(lhs), ValueRef::Leaf(rhs)) => lhs == rhs,
            (ValueRef::Branch(lhs), ValueRef::Branch(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl<'a, K: fmt::Debug + Ord + Clone, V: fmt::Debug> fmt::Debug for ValueRef<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Leaf(v) => fmt::Debug::fmt(v, f),
            ValueRef::Branch(branch) => fmt::Debug::fmt(branch, f),
        }
    }
}

/// A borrowed view of one level of an `OrderTree`. Reads through a view fall
/// back to the tree's default like reads on the tree itself.
pub struct BranchRef<'a, K, V> {
    tree: &'a OrderTree<K, V>,
    level: PLevel,
}

impl<'a, K, V> Clone for BranchRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for BranchRef<'a, K, V> {}

impl<'a, K: Ord + Clone, V> BranchRef<'a, K, V> {
    pub(crate) fn new(tree: &'a OrderTree<K, V>, level: PLevel) -> Self {
        Self { tree, level }
    }

    pub fn level(self) -> PLevel {
        self.level
    }

    /// The branch node holding this level, or `None` for the root
    pub fn node(self) -> Option<PNode> {
        self.tree.levels[self.level].parent
    }

    /// Resolves `path` relative to this level, see [OrderTree::get]
    pub fn get(self, path: &[K]) -> Option<ValueRef<'a, K, V>> {
        self.tree.get_in(self.level, path)
    }

    /// Resolves `path` relative to this level, see [OrderTree::at]
    pub fn at(self, path: &[K]) -> At<'a, K, V> {
        self.tree.at_in(self.level, path)
    }

    /// Returns the node directly under `key`
    pub fn child(self, key: &K) -> Option<PNode> {
        self.tree.levels[self.level].entries.get(key).copied()
    }

    pub fn contains_key(self, key: &K) -> bool {
        self.tree.levels[self.level].entries.contains_key(key)
    }

    /// Number of direct entries
    pub fn len(self) -> usize {
        self.tree.levels[self.level].entries.len()
    }

    pub fn is_empty(self) -> bool {
        self.tree.levels[self.level].entries.is_empty()
    }

    /// Keys in ascending order
    pub fn keys(self) -> impl Iterator<Item = &'a K> {
        self.tree.levels[self.level].entries.keys()
    }

    /// Direct entries in ascending key order
    pub fn entries(self) -> impl Iterator<Item = (&'a K, ValueRef<'a, K, V>)> {
        let tree = self.tree;
        tree.levels[self.level]
            .entries
            .iter()
            .map(move |(key, p)| (key, tree.value_ref(*p)))
    }

    /// This level's own copy of the default value
    pub fn default_value(self) -> Option<&'a V> {
        self.tree.levels[self.level].default.value().as_ref()
    }

    pub fn to_literal(self) -> Literal<K, V>
    where
        V: Clone,
    {
        self.tree.level_literal(self.level)
    }
}

impl<'a, 'b, K: Ord + Clone, V: PartialEq> PartialEq<BranchRef<'b, K, V>> for BranchRef<'a, K, V> {
    fn eq(&self, other: &BranchRef<'b, K, V>) -> bool {
        (self.len() == other.len())
            && self
                .entries()
                .zip(other.entries())
                .all(|((lhs_key, lhs), (rhs_key, rhs))| (lhs_key == rhs_key) && (lhs == rhs))
    }
}

impl<'a, K: fmt::Debug + Ord + Clone, V: fmt::Debug> fmt::Debug for BranchRef<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
