/// A nested mapping literal, used to supply contents to an `OrderTree` and to
/// hand back the contents of removed nodes.
///
/// `Map` keeps its entries in the order they are listed. That order is the
/// insertion order when the literal is written into a tree, with nested maps
/// inserted depth-first (a map's contents land in the chain before the branch
/// node holding them).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal<K, V> {
    Leaf(V),
    Map(Vec<(K, Literal<K, V>)>),
}

impl<K, V> Literal<K, V> {
    /// Returns the leaf value if `self` is a leaf
    pub fn leaf(&self) -> Option<&V> {
        match self {
            Literal::Leaf(v) => Some(v),
            Literal::Map(_) => None,
        }
    }

    /// Returns the entries if `self` is a map
    pub fn entries(&self) -> Option<&[(K, Literal<K, V>)]> {
        match self {
            Literal::Leaf(_) => None,
            Literal::Map(entries) => Some(entries),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Literal::Leaf(_))
    }

    /// Number of leaves and maps in `self`, not counting `self`
    pub fn count_nodes(&self) -> usize {
        match self {
            Literal::Leaf(_) => 0,
            Literal::Map(entries) => entries
                .iter()
                .map(|(_, lit)| 1 + lit.count_nodes())
                .sum(),
        }
    }
}

impl<K, V> FromIterator<(K, Literal<K, V>)> for Literal<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, Literal<K, V>)>>(iter: I) -> Self {
        Literal::Map(iter.into_iter().collect())
    }
}

/// Builds a [Literal](crate::Literal) from nested `key => value` braces. Leaf
/// values must be single token trees, so wrap anything longer such as `-1` or
/// `x + 1` in parenthesis.
///
/// ```
/// use order_tree::{literal, Literal};
///
/// let lit = literal!({
///     "a" => { "b" => 4 },
///     "c" => (-5),
/// });
/// assert_eq!(
///     lit,
///     Literal::Map(vec![
///         ("a", Literal::Map(vec![("b", Literal::Leaf(4))])),
///         ("c", Literal::Leaf(-5)),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! literal {
    ({ $($key:expr => $val:tt),* $(,)? }) => {
        $crate::Literal::Map(::std::vec![$(($key, $crate::literal!($val))),*])
    };
    ($leaf:expr) => {
        $crate::Literal::Leaf($leaf)
    };
}
