use core::{
    borrow::Borrow,
    ops::{Index, IndexMut},
};

use crate::{arena::Arena, Ptr};

/// This represents a link in a `ChainArena` that has a public `t: T` field and
/// `Option<P>` interlinks to the previous and next links.
pub struct Link<P: Ptr, T> {
    pub(crate) prev_next: (Option<P>, Option<P>),
    pub t: T,
}

impl<P: Ptr, T> Link<P, T> {
    /// Get a `Ptr` to the previous `Link` in the chain before `self`. Returns
    /// `None` if `self` is at the start of the chain.
    pub fn prev(&self) -> Option<P> {
        self.prev_next.0
    }

    /// Get a `Ptr` to the next `Link` in the chain after `self`. Returns
    /// `None` if `self` is at the end of the chain.
    pub fn next(&self) -> Option<P> {
        self.prev_next.1
    }

    /// Shorthand for `(self.prev(), self.next())`
    pub fn prev_next(&self) -> (Option<P>, Option<P>) {
        self.prev_next
    }

    fn new(prev_next: (Option<P>, Option<P>), t: T) -> Self {
        Self { prev_next, t }
    }
}

/// A doubly-linked-list based on an `Arena`, with `O(1)` appending and
/// removal. The `OrderTree` threads its global insertion order through one of
/// these, so nodes at any depth share a single chain without any node owning
/// its neighbors.
///
/// The public interface has been designed such that it is not possible to
/// break the doubly linked invariant that each interlink `Ptr` from one link
/// to its neighbor has exactly one corresponding interlink `Ptr` pointing from
/// the neighbor back to itself.
pub struct ChainArena<P: Ptr, T> {
    a: Arena<P, Link<P, T>>,
}

impl<P: Ptr, T> ChainArena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        Arena::_check_invariants(&this.a)?;
        for (p, link) in this.a.iter() {
            if let Some(prev) = link.prev() {
                if prev == p {
                    return Err("cyclic link")
                }
                match this.a.get(prev) {
                    Some(prev) => {
                        if prev.next() != Some(p) {
                            return Err("interlink does not correspond")
                        }
                    }
                    None => return Err("prev node does not exist"),
                }
            }
            // there are going to be duplicate checks but this must be done for invariant
            // breaking cases
            if let Some(next) = link.next() {
                if next == p {
                    return Err("cyclic link")
                }
                match this.a.get(next) {
                    Some(next) => {
                        if next.prev() != Some(p) {
                            return Err("interlink does not correspond")
                        }
                    }
                    None => return Err("next node does not exist"),
                }
            }
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self { a: Arena::new() }
    }

    /// Returns the number of links in the arena
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Inserts `t` as a single link in a new chain and returns a `Ptr` to it
    pub fn insert_new(&mut self, t: T) -> P {
        self.a.insert(Link::new((None, None), t))
    }

    /// Inserts `t` as the new end link of a chain which has `p_end` as its
    /// preexisting end link. Returns ownership of `t` if `p_end` is not valid
    /// or is not the end of a chain
    pub fn insert_end(&mut self, p_end: P, t: T) -> Result<P, T> {
        if !matches!(self.a.get(p_end), Some(link) if link.next().is_none()) {
            // invalid or not at end of chain
            return Err(t)
        }
        let res = self.a.insert(Link::new((Some(p_end), None), t));
        self.a[p_end].prev_next.1 = Some(res);
        Ok(res)
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        self.a.contains(p)
    }

    /// Returns a reference to a link pointed to by `p`. Returns `None` if `p`
    /// is invalid.
    #[must_use]
    pub fn get_link(&self, p: P) -> Option<&Link<P, T>> {
        self.a.get(p)
    }

    /// Returns a `&T` reference pointed to by `p`. Returns `None` if `p` is
    /// invalid.
    #[must_use]
    pub fn get(&self, p: P) -> Option<&T> {
        self.a.get(p).map(|link| &link.t)
    }

    /// Returns a `&mut T` reference pointed to by `p`. Returns `None` if `p`
    /// is invalid.
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        self.a.get_mut(p).map(|link| &mut link.t)
    }

    /// Removes the link at `p`. If the link is in the middle of the chain, the
    /// neighbors of `p` are rerouted to be neighbors of each other so that the
    /// chain remains continuous. Returns `None` if `p` is not valid.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<Link<P, T>> {
        let link = self.a.remove(p)?;
        match link.prev_next() {
            (None, None) => (),
            (None, Some(p1)) => {
                self.a[p1].prev_next.0 = None;
            }
            (Some(p0), None) => {
                self.a[p0].prev_next.1 = None;
            }
            (Some(p0), Some(p1)) => {
                self.a[p0].prev_next.1 = Some(p1);
                self.a[p1].prev_next.0 = Some(p0);
            }
        }
        Some(link)
    }
}

impl<P: Ptr, T> Default for ChainArena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for ChainArena<P, T> {
    type Output = T;

    fn index(&self, index: B) -> &Self::Output {
        self.get(*index.borrow())
            .expect("indexed `ChainArena` with invalidated `Ptr`")
    }
}

impl<P: Ptr, T, B: Borrow<P>> IndexMut<B> for ChainArena<P, T> {
    fn index_mut(&mut self, index: B) -> &mut Self::Output {
        self.get_mut(*index.borrow())
            .expect("indexed `ChainArena` with invalidated `Ptr`")
    }
}
