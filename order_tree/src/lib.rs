//! A nested map that records the global insertion order of every node.
//!
//! An ordered map only orders its own direct entries. An [OrderTree] orders
//! every node ever written anywhere in it, leaves and branches at any depth,
//! in one sequence, and keeps that sequence consistent as keys are
//! overwritten or deleted. Each node also carries an identity (see [Unique])
//! that is independent of its value, so two equal values written at two
//! different times are told apart, and the key path to any node can be
//! recovered.
//!
//! ```
//! use order_tree::{literal, OrderTree};
//!
//! let mut tree = OrderTree::new();
//! let a = tree.set_leaf(&["a"], 4).unwrap();
//! let b = tree.set_leaf(&["b"], 4).unwrap();
//! assert!(tree.before(a, tree.id(b).unwrap()).unwrap());
//!
//! // overwriting is a removal followed by an insertion at the end
//! let a = tree.set_leaf(&["a"], 5).unwrap();
//! assert!(tree.after(a, tree.id(b).unwrap()).unwrap());
//! let order: Vec<&[&str]> = tree.paths().collect();
//! assert_eq!(order, [&["b"][..], &["a"][..]]);
//!
//! // nested maps enter the order depth-first, before their branch node
//! tree.set(&["c"], literal!({ "d" => 6 })).unwrap();
//! assert_eq!(tree.node_path(tree.last().unwrap()).unwrap(), ["c"]);
//! assert_eq!(tree.path(&6), Some(vec!["c", "d"]));
//! ```

// there is no need for unsafe code, handles are checked by generation
#![deny(unsafe_code)]

mod arena;
mod cmp;
mod error;
pub mod iterators;
mod literal;
mod node;
mod ptr;
mod search;
#[cfg(feature = "serde_support")]
mod serde;
mod tree;
mod unique;
mod view;

pub use error::Error;
pub use literal::Literal;
pub use ptr::{PLevel, PNode, Ptr};
pub use tree::OrderTree;
pub use unique::Unique;
pub use uuid::Uuid;
pub use view::{At, BranchRef, ValueRef};

/// Internal data structures used by `OrderTree`, exposed for testing
#[cfg(feature = "expose_internal_utils")]
pub mod utils {
    pub use crate::arena::{Arena, ChainArena, Link};
}
