use std::cell::OnceCell;

use tracing::trace;
use uuid::Uuid;

use crate::{view::ValueRef, Error, Literal, OrderTree, PLevel, PNode, Ptr, Unique};

/// What a node wraps
pub(crate) enum Item<V> {
    Leaf(V),
    /// A nested level
    Branch(PLevel),
}

/// A node in the insertion order chain
pub(crate) struct Node<K, V> {
    value: Unique<Item<V>>,
    /// The level whose entries hold this node
    pub(crate) owner: PLevel,
    /// Position in the insertion order. Strictly increases along the chain,
    /// but with gaps left by removals.
    pub(crate) seq: u64,
    /// Set on the first path lookup. Nodes never move between keys, so this
    /// only has to be dropped along with the node.
    pub(crate) cached_path: OnceCell<Vec<K>>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(value: Unique<Item<V>>, owner: PLevel, seq: u64) -> Self {
        Self {
            value,
            owner,
            seq,
            cached_path: OnceCell::new(),
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.value.id()
    }

    pub(crate) fn item(&self) -> &Item<V> {
        self.value.value()
    }

    pub(crate) fn item_mut(&mut self) -> &mut Item<V> {
        self.value.value_mut()
    }

    pub(crate) fn into_value(self) -> Unique<Item<V>> {
        self.value
    }
}

impl<K: Ord + Clone, V> OrderTree<K, V> {
    /// Returns the identity of the node at `p`, or `None` if `p` is not live
    pub fn id(&self, p: PNode) -> Option<Uuid> {
        self.nodes.get(p).map(Node::id)
    }

    /// Returns the value of the node at `p`, or `None` if `p` is not live
    pub fn value_of(&self, p: PNode) -> Option<ValueRef<'_, K, V>> {
        if self.nodes.contains(p) {
            Some(self.value_ref(p))
        } else {
            None
        }
    }

    /// Returns the key path from the root to the node at `p`. The path is
    /// found by identity and cached on the node.
    ///
    /// # Errors
    ///
    /// [Error::PathNotFound] if `p` is not live,
    /// [Error::InvalidArgument] if `p` is `PNode::invalid()`
    pub fn node_path(&self, p: PNode) -> Result<&[K], Error> {
        let Some(node) = self.nodes.get(p) else {
            return Err(if p == PNode::invalid() {
                Error::InvalidArgument("`PNode::invalid()` never addresses a node")
            } else {
                Error::PathNotFound
            })
        };
        if let Some(path) = node.cached_path.get() {
            return Ok(path)
        }
        let path = self.strict_path(p)?;
        Ok(node.cached_path.get_or_init(|| path))
    }

    /// Removes the node at `p` from the chain and from its level. If it is a
    /// branch, everything under it is removed too. Returns the removed
    /// contents under the identity the node had.
    ///
    /// # Errors
    ///
    /// [Error::PathNotFound] if `p` is not live, which includes a second
    /// removal through the same handle
    pub fn remove(&mut self, p: PNode) -> Result<Unique<Literal<K, V>>, Error> {
        let key = self
            .node_path(p)?
            .last()
            .cloned()
            .ok_or(Error::PathNotFound)?;
        let owner = self.nodes[p].owner;
        self.levels[owner].entries.remove(&key);
        trace!(?p, "removing node");
        self.detach(p).ok_or(Error::PathNotFound)
    }

    /// Compares the insertion order of the node at `p` with the node having
    /// the identity `other`. `Less` means `p` was inserted before `other`.
    ///
    /// This walks outward from `p` in both directions at once, so it is
    /// proportional to the distance between the nodes.
    ///
    /// # Errors
    ///
    /// [Error::PathNotFound] if `p` is not live,
    /// [Error::CrossTreeComparison] if `other` is not in this tree
    pub fn compare(&self, p: PNode, other: Uuid) -> Result<core::cmp::Ordering, Error> {
        use core::cmp::Ordering::*;
        let link = self.nodes.get_link(p).ok_or(Error::PathNotFound)?;
        if link.t.id() == other {
            return Ok(Equal)
        }
        let (mut prev, mut next) = link.prev_next();
        loop {
            if prev.is_none() && next.is_none() {
                return Err(Error::CrossTreeComparison)
            }
            if let Some(p_prev) = prev {
                let link = self.nodes.get_link(p_prev).ok_or(Error::PathNotFound)?;
                if link.t.id() == other {
                    return Ok(Greater)
                }
                prev = link.prev();
            }
            if let Some(p_next) = next {
                let link = self.nodes.get_link(p_next).ok_or(Error::PathNotFound)?;
                if link.t.id() == other {
                    return Ok(Less)
                }
                next = link.next();
            }
        }
    }

    /// Returns if the node at `p` was inserted before the node with identity
    /// `other`
    ///
    /// # Errors
    ///
    /// See [OrderTree::compare]
    pub fn before(&self, p: PNode, other: Uuid) -> Result<bool, Error> {
        Ok(self.compare(p, other)?.is_lt())
    }

    /// Returns if the node at `p` was inserted after the node with identity
    /// `other`
    ///
    /// # Errors
    ///
    /// See [OrderTree::compare]
    pub fn after(&self, p: PNode, other: Uuid) -> Result<bool, Error> {
        Ok(self.compare(p, other)?.is_gt())
    }
}
