use core::{
    borrow::Borrow,
    marker::PhantomData,
    mem,
    num::NonZeroU64,
    ops::{Index, IndexMut},
};

use Entry::*;

use crate::ptr::{gen_two, next_gen, Ptr};

/// Internal entry for an `Arena`.
pub(crate) enum Entry<T> {
    /// A free entry with no `T`. The `usize` points to the next free entry,
    /// except if it points to the self entry in which case it is the last free
    /// entry.
    Free(usize),
    /// An entry allocated for a `(gen, T)` pair in the arena.
    Allocated(NonZeroU64, T),
}

/// A generational arena. Every `T` is addressed by a `P: Ptr` that is
/// invalidated forever once the `T` is removed: freed entries are reused by
/// later insertions, but under a newer generation, so a removed handle can
/// never alias a newer `T`. Generations are claimed from a counter shared by
/// all arenas, so a `P` from another arena is never valid here either.
pub struct Arena<P: Ptr, T> {
    /// # Invariants
    ///
    /// - The generation value is at least 2, so that `Ptr::invalid` never
    ///   works, and no other arena allocates under any generation this one
    ///   has had
    /// - If there are free entries, all `Free` entries have their freelist
    ///   nodes in a single linked list with the start being pointed to by
    ///   `freelist_root` and the end pointing to itself
    /// - If there are no free entries, `freelist_root` is `None`
    /// - During an invalidation, the arena `gen` is advanced _and_ the
    ///   allocation in question is turned into a `Free`. Newer allocations use
    ///   the new `gen` value.
    m: Vec<Entry<T>>,
    /// Number of `T` currently contained in the arena
    len: usize,
    /// Points to the root of the chain of freelist nodes
    freelist_root: Option<usize>,
    gen: NonZeroU64,
    _boo: PhantomData<fn() -> P>,
}

impl<P: Ptr, T> Arena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        if this.gen < gen_two() {
            return Err("bad generation")
        }
        let mut n_allocated = 0;
        for entry in &this.m {
            match entry {
                Allocated(gen, _) => {
                    if *gen > this.gen {
                        return Err("allocation from the future")
                    }
                    n_allocated += 1;
                }
                Free(_) => (),
            }
        }
        let n_free = this.m.len() - n_allocated;
        if this.len != n_allocated {
            return Err("len != n_allocated")
        }
        // checking freelist integrity
        let mut freelist_len = 0;
        if let Some(root) = this.freelist_root {
            let mut tmp_inx = root;
            for i in 0.. {
                if let Some(Free(inx)) = this.m.get(tmp_inx) {
                    freelist_len += 1;
                    if *inx == tmp_inx {
                        // last one
                        break
                    }
                    tmp_inx = *inx;
                } else {
                    return Err("bad freelist node")
                }
                if i > this.m.len() {
                    return Err("endless loop")
                }
            }
        }
        if freelist_len != n_free {
            return Err("freelist discontinuous")
        }
        Ok(())
    }

    /// Creates a new arena of type `T`, which are pointed to by `P`s.
    pub fn new() -> Self {
        Self {
            m: Vec::new(),
            len: 0,
            freelist_root: None,
            gen: next_gen(),
            _boo: PhantomData,
        }
    }

    /// Returns the number of `T` in the arena
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the arena
    pub fn capacity(&self) -> usize {
        self.m.len()
    }

    /// Return the arena generation counter. It strictly increases with every
    /// invalidation operation performed on this arena.
    pub fn gen(&self) -> NonZeroU64 {
        self.gen
    }

    fn inc_gen(&mut self) {
        self.gen = next_gen();
    }

    /// Inserts `t` into the arena and returns a `Ptr` to it. Free entries are
    /// reused before the arena grows.
    pub fn insert(&mut self, t: T) -> P {
        let gen = self.gen;
        if let Some(inx) = self.freelist_root {
            let next = match mem::replace(&mut self.m[inx], Allocated(gen, t)) {
                Free(next) => next,
                Allocated(..) => unreachable!(),
            };
            if next == inx {
                // end of freelist
                self.freelist_root = None;
            } else {
                // move to next node in the freelist
                self.freelist_root = Some(next);
            }
            self.len += 1;
            P::_from_raw(inx, gen)
        } else {
            let inx = self.m.len();
            self.m.push(Allocated(gen, t));
            self.len += 1;
            P::_from_raw(inx, gen)
        }
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        matches!(self.m.get(p.inx()), Some(Allocated(gen, _)) if *gen == p.gen())
    }

    /// Returns a reference to a `T` pointed to by `p`. Returns `None` if `p` is
    /// invalid.
    #[must_use]
    pub fn get(&self, p: P) -> Option<&T> {
        match self.m.get(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable reference to a `T` pointed to by `p`. Returns `None`
    /// if `p` is invalid.
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        match self.m.get_mut(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Removes the `T` pointed to by `p`, returns the `T`, and invalidates old
    /// `Ptr`s to the `T`. Does no invalidation and returns `None` if `p` is
    /// invalid.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<T> {
        if !self.contains(p) {
            return None
        }
        let freelist_ptr = if let Some(free) = self.freelist_root {
            // points to previous root
            free
        } else {
            // points to itself
            p.inx()
        };
        let old = mem::replace(&mut self.m[p.inx()], Free(freelist_ptr));
        self.freelist_root = Some(p.inx());
        self.len -= 1;
        self.inc_gen();
        match old {
            Allocated(_, t) => Some(t),
            Free(_) => unreachable!(),
        }
    }

    /// Iterates over all valid `(P, &T)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> {
        self.m.iter().enumerate().filter_map(|(inx, entry)| match entry {
            Allocated(gen, t) => Some((P::_from_raw(inx, *gen), t)),
            Free(_) => None,
        })
    }
}

impl<P: Ptr, T> Default for Arena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for Arena<P, T> {
    type Output = T;

    fn index(&self, inx: B) -> &T {
        let p: P = *inx.borrow();
        self.get(p).expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T, B: Borrow<P>> IndexMut<B> for Arena<P, T> {
    fn index_mut(&mut self, inx: B) -> &mut T {
        let p: P = *inx.borrow();
        self.get_mut(p)
            .expect("indexed arena with invalidated `Ptr`")
    }
}
