use crate::{
    node::{Item, Node},
    view::ValueRef,
    Error, OrderTree, PNode, Ptr,
};

impl<K: Ord + Clone, V> OrderTree<K, V> {
    /// Depth-first pre-order search over the levels in ascending key order,
    /// returning the path to the first node `f` accepts
    fn find_path<F: FnMut(PNode, &Node<K, V>) -> bool>(&self, mut f: F) -> Option<Vec<K>> {
        // `path` holds one key less than `stack` has levels
        let mut path = Vec::new();
        let mut stack = vec![self.levels[self.root].entries.iter()];
        while let Some(entries) = stack.last_mut() {
            match entries.next() {
                Some((key, p)) => {
                    let node = &self.nodes[p];
                    path.push(key.clone());
                    if f(*p, node) {
                        return Some(path)
                    }
                    match node.item() {
                        Item::Branch(sub) => stack.push(self.levels[*sub].entries.iter()),
                        Item::Leaf(_) => {
                            path.pop();
                        }
                    }
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        None
    }

    /// Returns the path to a leaf equal to `value`, or `None` if there is no
    /// such leaf. With duplicate values, the first match in ascending key order
    /// (depth-first) is returned, which is not necessarily the earliest
    /// inserted.
    pub fn path(&self, value: &V) -> Option<Vec<K>>
    where
        V: PartialEq,
    {
        self.find_path(|_, node| matches!(node.item(), Item::Leaf(v) if v == value))
    }

    /// Returns the path to the first value, leaf or branch, that `pred` accepts
    pub fn path_by<F: FnMut(ValueRef<'_, K, V>) -> bool>(&self, mut pred: F) -> Option<Vec<K>> {
        self.find_path(|p, _| pred(self.value_ref(p)))
    }

    /// Like [OrderTree::path] but not finding anything is an error
    ///
    /// # Errors
    ///
    /// [Error::PathNotFound] if no leaf equals `value`
    pub fn try_path(&self, value: &V) -> Result<Vec<K>, Error>
    where
        V: PartialEq,
    {
        self.path(value).ok_or(Error::PathNotFound)
    }

    /// Like [OrderTree::path_by] but not finding anything is an error
    ///
    /// # Errors
    ///
    /// [Error::PathNotFound] if `pred` accepts nothing
    pub fn try_path_by<F: FnMut(ValueRef<'_, K, V>) -> bool>(
        &self,
        pred: F,
    ) -> Result<Vec<K>, Error> {
        self.path_by(pred).ok_or(Error::PathNotFound)
    }

    /// Searches for the node at `p` by its identity, ignoring any cached path.
    /// Prefer [OrderTree::node_path], which caches the result.
    ///
    /// # Errors
    ///
    /// [Error::InvalidArgument] if `p` is `PNode::invalid()`,
    /// [Error::PathNotFound] if `p` is not live
    pub fn strict_path(&self, p: PNode) -> Result<Vec<K>, Error> {
        if p == PNode::invalid() {
            return Err(Error::InvalidArgument(
                "`PNode::invalid()` never addresses a node",
            ))
        }
        let id = self.id(p).ok_or(Error::PathNotFound)?;
        self.find_path(|_, node| node.id() == id)
            .ok_or(Error::PathNotFound)
    }
}
