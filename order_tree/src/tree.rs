use std::{collections::BTreeMap, vec};

use tracing::{debug, trace};

use crate::{
    arena::{Arena, ChainArena},
    node::{Item, Node},
    view::{At, BranchRef, ValueRef},
    Error, Literal, PLevel, PNode, Unique,
};

/// One level of an `OrderTree`, either the root or the map behind a branch
/// node
pub(crate) struct Level<K, V> {
    pub(crate) entries: BTreeMap<K, PNode>,
    /// The branch node holding this level, `None` for the root
    pub(crate) parent: Option<PNode>,
    /// This level's copy of the default. Only the root's copy is consulted by
    /// reads, nested copies are kept in sync by `set_default`.
    pub(crate) default: Unique<Option<V>>,
}

impl<K, V> Level<K, V> {
    fn new(default: Unique<Option<V>>) -> Self {
        Self {
            entries: BTreeMap::new(),
            parent: None,
            default,
        }
    }
}

/// A nested map that remembers the global insertion order of every node in
/// it, leaves and branches alike, regardless of depth.
///
/// All nodes live in one `ChainArena` whose single chain is the insertion
/// order, and all levels live in one `Arena`. Nodes refer to their owning
/// level and levels to their branch node by `Ptr`s, so there are no reference
/// cycles. Overwriting a key removes the old node before appending the new
/// one, so the chain is always ordered by most recent (re)insertion.
///
/// ```
/// use order_tree::{literal, OrderTree};
///
/// let mut tree = OrderTree::from_literal(literal!({
///     "a" => { "b" => 4 },
///     "c" => 5,
/// }))
/// .unwrap();
///
/// // nested contents are inserted before the branch holding them
/// let order: Vec<Vec<&str>> = tree.paths().map(|path| path.to_vec()).collect();
/// assert_eq!(order, vec![vec!["a", "b"], vec!["a"], vec!["c"]]);
///
/// // overwriting moves a key to the end
/// tree.set_leaf(&["a", "b"], 6).unwrap();
/// let order: Vec<Vec<&str>> = tree.paths().map(|path| path.to_vec()).collect();
/// assert_eq!(order, vec![vec!["a"], vec!["c"], vec!["a", "b"]]);
///
/// // reads through missing keys fall back to the default
/// assert!(tree.get(&["x", "y"]).is_none());
/// tree.set_default(Some(0));
/// assert_eq!(tree.get(&["x", "y"]).unwrap().leaf(), Some(&0));
/// assert_eq!(tree.get(&["a", "b"]).unwrap().leaf(), Some(&6));
/// ```
pub struct OrderTree<K, V> {
    pub(crate) nodes: ChainArena<PNode, Node<K, V>>,
    pub(crate) levels: Arena<PLevel, Level<K, V>>,
    pub(crate) root: PLevel,
    pub(crate) first: Option<PNode>,
    pub(crate) last: Option<PNode>,
    /// The `seq` of the next appended node
    pub(crate) next_seq: u64,
}

impl<K: Ord + Clone, V> OrderTree<K, V> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        ChainArena::_check_invariants(&this.nodes)?;
        Arena::_check_invariants(&this.levels)?;
        if this.first.is_none() != this.last.is_none() {
            return Err("only one chain endpoint is set")
        }
        if this.first.is_none() != this.nodes.is_empty() {
            return Err("chain endpoints do not match emptiness")
        }
        // walk the chain
        let mut len = 0;
        let mut prev = None;
        let mut tmp = this.first;
        while let Some(p) = tmp {
            let Some(link) = this.nodes.get_link(p) else {
                return Err("chain walks into an invalid node")
            };
            if link.prev() != prev {
                return Err("chain is not continuous")
            }
            if let Some(prev) = prev {
                if this.nodes[prev].seq >= link.t.seq {
                    return Err("chain is not in `seq` order")
                }
            }
            if link.t.seq >= this.next_seq {
                return Err("`seq` from the future")
            }
            len += 1;
            if len > this.nodes.len() {
                return Err("endless chain")
            }
            prev = Some(p);
            tmp = link.next();
        }
        if prev != this.last {
            return Err("`last` is not the end of the chain")
        }
        if len != this.nodes.len() {
            return Err("chain does not contain every node")
        }
        // walk the levels
        match this.levels.get(this.root) {
            Some(root) if root.parent.is_none() => (),
            _ => return Err("bad root level"),
        }
        let mut n_nodes = 0;
        let mut n_levels = 1;
        let mut stack = vec![(this.root, Vec::new())];
        while let Some((level, path)) = stack.pop() {
            let Some(l) = this.levels.get(level) else {
                return Err("branch points to an invalid level")
            };
            for (key, p) in &l.entries {
                let Some(node) = this.nodes.get(*p) else {
                    return Err("entry points to a node that is not in the chain")
                };
                n_nodes += 1;
                if node.owner != level {
                    return Err("node owner does not match its level")
                }
                let mut node_path: Vec<K> = path.clone();
                node_path.push(key.clone());
                if let Some(cached) = node.cached_path.get() {
                    if *cached != node_path {
                        return Err("stale cached path")
                    }
                }
                if let Item::Branch(sub) = node.item() {
                    match this.levels.get(*sub) {
                        Some(sub_level) if sub_level.parent == Some(*p) => (),
                        _ => return Err("branch level does not point back to its node"),
                    }
                    n_levels += 1;
                    stack.push((*sub, node_path));
                }
            }
        }
        if n_nodes != this.nodes.len() {
            return Err("chain and tree are not in correspondence")
        }
        if n_levels != this.levels.len() {
            return Err("detached level")
        }
        Ok(())
    }

    /// Creates an empty tree with a `None` default
    pub fn new() -> Self {
        let mut levels = Arena::new();
        let root = levels.insert(Level::new(Unique::new(None)));
        Self {
            nodes: ChainArena::new(),
            levels,
            root,
            first: None,
            last: None,
            next_seq: 0,
        }
    }

    /// Creates a tree from a `Literal::Map`, inserting entries in their listed
    /// order and nested maps depth-first.
    ///
    /// # Errors
    ///
    /// [Error::InvalidArgument] if `literal` is a leaf
    pub fn from_literal(literal: Literal<K, V>) -> Result<Self, Error>
    where
        V: Clone,
    {
        match literal {
            Literal::Leaf(_) => Err(Error::InvalidArgument(
                "the top level of a tree literal must be a map",
            )),
            Literal::Map(entries) => Ok(entries.into_iter().collect()),
        }
    }

    /// Returns the number of nodes (leaves and branches at every depth)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The earliest node in the insertion order
    pub fn first(&self) -> Option<PNode> {
        self.first
    }

    /// The latest node in the insertion order
    pub fn last(&self) -> Option<PNode> {
        self.last
    }

    /// Returns if `p` is a live node of this tree
    pub fn contains(&self, p: PNode) -> bool {
        self.nodes.contains(p)
    }

    /// A view of the root level
    pub fn root(&self) -> BranchRef<'_, K, V> {
        BranchRef::new(self, self.root)
    }

    /// Returns the value at `path`. A missing key, or a key that continues
    /// past a leaf, resolves to the default value (`None` being the null
    /// default). The empty path returns the root itself.
    pub fn get(&self, path: &[K]) -> Option<ValueRef<'_, K, V>> {
        self.get_in(self.root, path)
    }

    /// Like [OrderTree::get] but returns the node rather than its value, for
    /// callers that need identity
    pub fn at(&self, path: &[K]) -> At<'_, K, V> {
        self.at_in(self.root, path)
    }

    pub(crate) fn at_in(&self, level: PLevel, path: &[K]) -> At<'_, K, V> {
        let mut level = level;
        for (i, key) in path.iter().enumerate() {
            let Some(p) = self.levels[level].entries.get(key).copied() else {
                return At::Default(self.default_node())
            };
            if i + 1 == path.len() {
                return At::Node(p)
            }
            match self.nodes[p].item() {
                Item::Branch(sub) => level = *sub,
                // cannot continue past a leaf
                Item::Leaf(_) => return At::Default(self.default_node()),
            }
        }
        At::Level(BranchRef::new(self, level))
    }

    pub(crate) fn get_in(&self, level: PLevel, path: &[K]) -> Option<ValueRef<'_, K, V>> {
        match self.at_in(level, path) {
            At::Node(p) => Some(self.value_ref(p)),
            At::Level(branch) => Some(ValueRef::Branch(branch)),
            At::Default(default) => default.value().as_ref().map(ValueRef::Leaf),
        }
    }

    pub(crate) fn value_ref(&self, p: PNode) -> ValueRef<'_, K, V> {
        match self.nodes[p].item() {
            Item::Leaf(v) => ValueRef::Leaf(v),
            Item::Branch(level) => ValueRef::Branch(BranchRef::new(self, *level)),
        }
    }

    /// Follows `path` through branches only
    fn resolve_level(&self, path: &[K]) -> Result<PLevel, Error> {
        let mut level = self.root;
        for (depth, key) in path.iter().enumerate() {
            let p = self.levels[level]
                .entries
                .get(key)
                .copied()
                .ok_or(Error::StructuralMismatch { depth })?;
            match self.nodes[p].item() {
                Item::Branch(sub) => level = *sub,
                Item::Leaf(_) => return Err(Error::StructuralMismatch { depth }),
            }
        }
        Ok(level)
    }

    /// Writes `value` at the last key of `path`, returning the new node. All
    /// preceding keys must already resolve to branches. A `Literal::Map`
    /// becomes a nested level whose contents are inserted before its branch
    /// node. If the key already holds a node, that node (and everything under
    /// it) is removed first, so the key moves to the end of the order.
    ///
    /// `V: Clone` is for the copy of the default that every new nested level
    /// keeps, see [OrderTree::set_leaf] for writes without it.
    ///
    /// # Errors
    ///
    /// [Error::InvalidArgument] if `path` is empty,
    /// [Error::StructuralMismatch] if an intermediate key is missing or holds
    /// a leaf
    pub fn set(&mut self, path: &[K], value: Literal<K, V>) -> Result<PNode, Error>
    where
        V: Clone,
    {
        let (level, key) = self.write_target(path)?;
        Ok(self.insert_at(level, key.clone(), value))
    }

    /// Like `self.set(path, Literal::Leaf(value))`, but without needing
    /// `V: Clone`
    ///
    /// # Errors
    ///
    /// See [OrderTree::set]
    pub fn set_leaf(&mut self, path: &[K], value: V) -> Result<PNode, Error> {
        let (level, key) = self.write_target(path)?;
        Ok(self.place(level, key.clone(), Item::Leaf(value)))
    }

    /// The level and key that a write to `path` goes to
    fn write_target<'p>(&self, path: &'p [K]) -> Result<(PLevel, &'p K), Error> {
        let (key, init) = path
            .split_last()
            .ok_or(Error::InvalidArgument("cannot write to the empty path"))?;
        Ok((self.resolve_level(init)?, key))
    }

    /// A new empty level with a copy of the current default
    fn new_level(&mut self) -> PLevel
    where
        V: Clone,
    {
        let default = Unique::new(self.default_value().cloned());
        self.levels.insert(Level::new(default))
    }

    pub(crate) fn insert_at(&mut self, level: PLevel, key: K, value: Literal<K, V>) -> PNode
    where
        V: Clone,
    {
        let entries = match value {
            Literal::Leaf(v) => return self.place(level, key, Item::Leaf(v)),
            Literal::Map(entries) => entries,
        };
        // One frame per nested map whose contents are still being inserted,
        // holding where its branch node goes once they are all in.
        let sub = self.new_level();
        let mut stack = vec![(level, key, sub, entries.into_iter())];
        loop {
            let Some((_, _, sub, rest)) = stack.last_mut() else {
                unreachable!()
            };
            let sub = *sub;
            match rest.next() {
                Some((k, Literal::Leaf(v))) => {
                    self.place(sub, k, Item::Leaf(v));
                }
                Some((k, Literal::Map(entries))) => {
                    let new = self.new_level();
                    stack.push((sub, k, new, entries.into_iter()));
                }
                None => {
                    let Some((level, key, sub, _)) = stack.pop() else {
                        unreachable!()
                    };
                    let p = self.place(level, key, Item::Branch(sub));
                    if stack.is_empty() {
                        return p
                    }
                }
            }
        }
    }

    /// Puts `item` under `key` in `level` as the newest node. Whatever the key
    /// held before is removed first.
    fn place(&mut self, level: PLevel, key: K, item: Item<V>) -> PNode {
        if let Some(old) = self.levels[level].entries.remove(&key) {
            trace!(?old, "overwriting node");
            self.detach(old);
        }
        let sub = match item {
            Item::Branch(sub) => Some(sub),
            Item::Leaf(_) => None,
        };
        let p = self.push_back(item, level);
        if let Some(sub) = sub {
            self.levels[sub].parent = Some(p);
        }
        self.levels[level].entries.insert(key, p);
        p
    }

    /// Appends a node to the end of the chain
    fn push_back(&mut self, item: Item<V>, owner: PLevel) -> PNode {
        let node = Node::new(Unique::new(item), owner, self.next_seq);
        self.next_seq += 1;
        let p = match self.last {
            Some(last) => match self.nodes.insert_end(last, node) {
                Ok(p) => p,
                Err(_) => unreachable!("`last` is not the end of the chain"),
            },
            None => self.nodes.insert_new(node),
        };
        if self.first.is_none() {
            self.first = Some(p);
        }
        self.last = Some(p);
        trace!(?p, "appended node");
        p
    }

    /// Splices `p` out of the chain and returns its node
    pub(crate) fn unlink(&mut self, p: PNode) -> Option<Node<K, V>> {
        let link = self.nodes.remove(p)?;
        let (prev, next) = link.prev_next();
        if self.first == Some(p) {
            self.first = next;
        }
        if self.last == Some(p) {
            self.last = prev;
        }
        trace!(?p, ?prev, ?next, "unlinked node");
        Some(link.t)
    }

    /// Unlinks `p` and everything under it. The caller is responsible for the
    /// entry pointing to `p`. Nested contents come back in insertion order.
    pub(crate) fn detach(&mut self, p: PNode) -> Option<Unique<Literal<K, V>>> {
        let node = self.unlink(p)?;
        Some(node.into_value().map(|item| match item {
            Item::Leaf(v) => Literal::Leaf(v),
            Item::Branch(sub) => self.detach_level(sub),
        }))
    }

    fn detach_level(&mut self, level: PLevel) -> Literal<K, V> {
        // one frame per level being taken apart, with the key it goes under
        let rest = self.take_level(level);
        let mut stack = vec![(None, rest, Vec::new())];
        loop {
            let Some((_, rest, entries)) = stack.last_mut() else {
                unreachable!()
            };
            match rest.next() {
                Some((key, p)) => {
                    let Some(node) = self.unlink(p) else {
                        unreachable!("entry points to a node that is not in the chain")
                    };
                    match node.into_value().into_inner() {
                        Item::Leaf(v) => entries.push((key, Literal::Leaf(v))),
                        Item::Branch(sub) => {
                            let rest = self.take_level(sub);
                            stack.push((Some(key), rest, Vec::new()));
                        }
                    }
                }
                None => {
                    let Some((key, _, entries)) = stack.pop() else {
                        unreachable!()
                    };
                    let lit = Literal::Map(entries);
                    match (key, stack.last_mut()) {
                        (Some(key), Some((_, _, parent))) => parent.push((key, lit)),
                        _ => return lit,
                    }
                }
            }
        }
    }

    /// Removes `level` from the arena and returns its entries in insertion
    /// order
    fn take_level(&mut self, level: PLevel) -> vec::IntoIter<(K, PNode)> {
        let Some(level) = self.levels.remove(level) else {
            unreachable!("branch points to an invalid level")
        };
        let mut entries: Vec<(K, PNode)> = level.entries.into_iter().collect();
        entries.sort_unstable_by_key(|(_, p)| self.nodes[p].seq);
        entries.into_iter()
    }

    /// Resolves all but the last key of `path` as branches (the same rule as
    /// [OrderTree::set]), and if the last key exists, removes its node and
    /// returns its contents.
    ///
    /// # Errors
    ///
    /// [Error::InvalidArgument] if `path` is empty,
    /// [Error::StructuralMismatch] if an intermediate key is missing or holds
    /// a leaf
    pub fn delete(&mut self, path: &[K]) -> Result<Option<Unique<Literal<K, V>>>, Error> {
        let (key, init) = path
            .split_last()
            .ok_or(Error::InvalidArgument("cannot delete the empty path"))?;
        let level = self.resolve_level(init)?;
        match self.levels[level].entries.get(key).copied() {
            Some(p) => self.remove(p).map(Some),
            None => Ok(None),
        }
    }

    /// The value behind the default node
    pub fn default_value(&self) -> Option<&V> {
        self.default_node().value().as_ref()
    }

    /// The identity wrapped default, which is never part of the chain
    pub fn default_node(&self) -> &Unique<Option<V>> {
        &self.levels[self.root].default
    }

    /// Creates a new default node and copies `value` into the default of every
    /// currently nested level
    pub fn set_default(&mut self, value: Option<V>)
    where
        V: Clone,
    {
        let mut n = 0;
        let mut stack = vec![self.root];
        while let Some(level) = stack.pop() {
            for p in self.levels[level].entries.values() {
                if let Item::Branch(sub) = self.nodes[p].item() {
                    stack.push(*sub);
                }
            }
            self.levels[level].default = Unique::new(value.clone());
            n += 1;
        }
        debug!(levels = n, "propagated default");
    }

    /// Returns a mutable reference to the value of the leaf at `p`. This does
    /// not change the order. Returns `None` if `p` is invalid or is a branch.
    pub fn value_mut(&mut self, p: PNode) -> Option<&mut V> {
        match self.nodes.get_mut(p)?.item_mut() {
            Item::Leaf(v) => Some(v),
            Item::Branch(_) => None,
        }
    }

    /// Snapshots the contents as a literal, listing the entries of every
    /// level in insertion order. `other.set(path, tree.to_literal())` copies a
    /// whole tree into `other` with the same relative order.
    pub fn to_literal(&self) -> Literal<K, V>
    where
        V: Clone,
    {
        self.level_literal(self.root)
    }

    /// The direct entries of `level` in insertion order
    fn ordered_entries(&self, level: PLevel) -> vec::IntoIter<(&K, PNode)> {
        let mut entries: Vec<(&K, PNode)> = self.levels[level]
            .entries
            .iter()
            .map(|(key, p)| (key, *p))
            .collect();
        entries.sort_unstable_by_key(|(_, p)| self.nodes[p].seq);
        entries.into_iter()
    }

    pub(crate) fn level_literal(&self, level: PLevel) -> Literal<K, V>
    where
        V: Clone,
    {
        let mut stack = vec![(None, self.ordered_entries(level), Vec::new())];
        loop {
            let Some((_, rest, entries)) = stack.last_mut() else {
                unreachable!()
            };
            match rest.next() {
                Some((key, p)) => match self.nodes[p].item() {
                    Item::Leaf(v) => entries.push((key.clone(), Literal::Leaf(v.clone()))),
                    Item::Branch(sub) => {
                        stack.push((Some(key), self.ordered_entries(*sub), Vec::new()))
                    }
                },
                None => {
                    let Some((key, _, entries)) = stack.pop() else {
                        unreachable!()
                    };
                    let lit = Literal::Map(entries);
                    match (key, stack.last_mut()) {
                        (Some(key), Some((_, _, parent))) => parent.push((key.clone(), lit)),
                        _ => return lit,
                    }
                }
            }
        }
    }
}

impl<K: Ord + Clone, V> Default for OrderTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, Literal<K, V>)> for OrderTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, Literal<K, V>)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (key, value) in iter {
            tree.insert_at(tree.root, key, value);
        }
        tree
    }
}
