use order_tree::{literal, ptr_struct, Literal, OrderTree};

pub type Tree = OrderTree<&'static str, i64>;

/// Nested literal with repeated values and three levels of nesting
pub fn std_literal() -> Literal<&'static str, i64> {
    literal!({
        "from" => {
            "a" => {
                "b" => 4,
                "c" => 4,
            },
        },
        "to" => {
            "d" => 4,
            "e" => 4,
            "to_to" => {
                "f" => 5,
                "g" => 6,
                "h" => 7,
            },
        },
    })
}

/// The paths of `std_tree` in insertion order, nested contents before the
/// branches holding them
pub fn std_order() -> Vec<Vec<&'static str>> {
    vec![
        vec!["from", "a", "b"],
        vec!["from", "a", "c"],
        vec!["from", "a"],
        vec!["from"],
        vec!["to", "d"],
        vec!["to", "e"],
        vec!["to", "to_to", "f"],
        vec!["to", "to_to", "g"],
        vec!["to", "to_to", "h"],
        vec!["to", "to_to"],
        vec!["to"],
    ]
}

pub fn std_tree() -> Tree {
    let tree = OrderTree::from_literal(std_literal()).unwrap();
    check(&tree);
    tree
}

/// Collects the paths in insertion order
pub fn paths<K: Ord + Clone, V>(tree: &OrderTree<K, V>) -> Vec<Vec<K>> {
    tree.paths().map(|path| path.to_vec()).collect()
}

pub fn check<K: Ord + Clone, V>(tree: &OrderTree<K, V>) {
    if let Err(e) = OrderTree::_check_invariants(tree) {
        panic!("{e}");
    }
}

/// Installs a `tracing` subscriber that writes to the test output, if one is
/// not already installed
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

ptr_struct!(P0);
