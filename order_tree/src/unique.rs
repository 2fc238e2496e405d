use core::fmt;

use uuid::Uuid;

/// Wraps a value with an identity that is separate from value equality.
///
/// Two `Unique`s wrapping equal values compare equal with `==`, but each one
/// has its own id that is minted in `Unique::new` and never reused. This is
/// what tells two insertions of the same value apart.
///
/// ```
/// use order_tree::Unique;
///
/// let a = Unique::new(4);
/// let b = Unique::new(4);
/// assert_eq!(a, b);
/// assert!(a.value_eq(&b));
/// assert!(!a.identity_eq(&b));
/// assert_ne!(a.id(), b.id());
/// assert_eq!(a.value(), b.value());
/// ```
pub struct Unique<T> {
    id: Uuid,
    value: T,
}

impl<T> Unique<T> {
    /// Wraps `value` under a freshly minted id
    pub fn new(value: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replaces the wrapped value and returns the old one. The identity is
    /// kept.
    pub fn replace(&mut self, value: T) -> T {
        core::mem::replace(&mut self.value, value)
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns if `self` and `other` are the same identity
    pub fn identity_eq<U>(&self, other: &Unique<U>) -> bool {
        self.id == other.id
    }

    /// Returns if the wrapped values are equal, regardless of identity
    pub fn value_eq<U>(&self, other: &Unique<U>) -> bool
    where
        T: PartialEq<U>,
    {
        self.value == other.value
    }

    /// Converts the wrapped value while keeping the identity
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Unique<U> {
        Unique {
            id: self.id,
            value: f(self.value),
        }
    }
}

impl<T: PartialEq> PartialEq for Unique<T> {
    /// Value equality, see [Unique::identity_eq] for identity
    fn eq(&self, other: &Self) -> bool {
        self.value_eq(other)
    }
}

impl<T: fmt::Debug> fmt::Debug for Unique<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "Unique({} => {:#?})", self.id, self.value)
        } else {
            write!(f, "Unique({} => {:?})", self.id, self.value)
        }
    }
}
