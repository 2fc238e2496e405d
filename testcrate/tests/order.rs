use order_tree::{literal, Error, Literal, OrderTree};
use testcrate::{check, init_tracing, paths, std_order, std_tree, Tree};

#[test]
fn depth_first_literal() {
    init_tracing();
    let tree = OrderTree::from_literal(literal!({
        "a" => { "b" => 4 },
        "c" => 5,
    }))
    .unwrap();
    check(&tree);
    assert_eq!(paths(&tree), vec![vec!["a", "b"], vec!["a"], vec!["c"]]);
    assert_eq!(tree.len(), 3);

    let tree = std_tree();
    assert_eq!(paths(&tree), std_order());
    let leaves: Vec<i64> = tree.leaves().copied().collect();
    assert_eq!(leaves, vec![4, 4, 4, 4, 5, 6, 7]);
}

#[test]
fn overwrite_moves_to_end() {
    let mut tree = Tree::new();
    tree.set_leaf(&["a"], 4).unwrap();
    tree.set_leaf(&["b"], 4).unwrap();
    assert_eq!(paths(&tree), vec![vec!["a"], vec!["b"]]);
    tree.set_leaf(&["a"], 5).unwrap();
    check(&tree);
    assert_eq!(paths(&tree), vec![vec!["b"], vec!["a"]]);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(&["a"]).unwrap().leaf(), Some(&5));
}

#[test]
fn overwrite_branch_removes_descendants() {
    let mut tree = std_tree();
    let h = tree.at(&["to", "to_to", "h"]).node().unwrap();
    tree.set_leaf(&["to"], 0).unwrap();
    check(&tree);
    assert!(!tree.contains(h));
    assert_eq!(paths(&tree), vec![
        vec!["from", "a", "b"],
        vec!["from", "a", "c"],
        vec!["from", "a"],
        vec!["from"],
        vec!["to"],
    ]);
    // reads past the new leaf fall back to the default
    assert!(tree.get(&["to", "to_to", "h"]).is_none());
}

#[test]
fn nested_writes() {
    let mut tree = std_tree();
    tree.set_leaf(&["from", "a", "d"], 4).unwrap();
    assert_eq!(tree.get(&["from", "a", "d"]).unwrap().leaf(), Some(&4));
    tree.set_leaf(&["from", "a", "e"], 6).unwrap();
    assert_eq!(
        tree.root()
            .get(&["from"])
            .unwrap()
            .branch()
            .unwrap()
            .get(&["a", "e"])
            .unwrap()
            .leaf(),
        Some(&6)
    );
    tree.set(&["to", "x"], literal!({ "y" => { "z" => 1 } }))
        .unwrap();
    check(&tree);
    let mut expected = std_order();
    expected.extend([
        vec!["from", "a", "d"],
        vec!["from", "a", "e"],
        vec!["to", "x", "y", "z"],
        vec!["to", "x", "y"],
        vec!["to", "x"],
    ]);
    assert_eq!(paths(&tree), expected);
}

#[test]
fn write_through_missing_branch() {
    let mut tree = Tree::new();
    assert_eq!(
        tree.set_leaf(&["a", "b", "c"], 4),
        Err(Error::StructuralMismatch { depth: 0 })
    );
    tree.set_leaf(&["a"], 1).unwrap();
    // through a leaf
    assert_eq!(
        tree.set_leaf(&["a", "b"], 4),
        Err(Error::StructuralMismatch { depth: 0 })
    );
    tree.set(&["x"], literal!({})).unwrap();
    assert_eq!(
        tree.set_leaf(&["x", "y", "z"], 4),
        Err(Error::StructuralMismatch { depth: 1 })
    );
    assert!(matches!(tree.set_leaf(&[], 4), Err(Error::InvalidArgument(_))));
    assert!(matches!(tree.delete(&[]), Err(Error::InvalidArgument(_))));
    assert_eq!(
        tree.delete(&["q", "r"]),
        Err(Error::StructuralMismatch { depth: 0 })
    );
    // failed writes change nothing
    check(&tree);
    assert_eq!(paths(&tree), vec![vec!["a"], vec!["x"]]);
}

#[test]
fn delete() {
    let mut tree = std_tree();
    let removed = tree.delete(&["to", "to_to"]).unwrap().unwrap();
    check(&tree);
    assert_eq!(
        *removed.value(),
        literal!({ "f" => 5, "g" => 6, "h" => 7 })
    );
    assert_eq!(paths(&tree), vec![
        vec!["from", "a", "b"],
        vec!["from", "a", "c"],
        vec!["from", "a"],
        vec!["from"],
        vec!["to", "d"],
        vec!["to", "e"],
        vec!["to"],
    ]);
    // deleting an absent final key is not an error
    assert_eq!(tree.delete(&["to", "to_to"]), Ok(None));
    assert_eq!(tree.delete(&["nothing"]), Ok(None));

    for path in std_order().iter().rev() {
        tree.delete(path).unwrap_or_default();
        check(&tree);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
}

#[test]
fn iteration() {
    let tree = std_tree();
    assert_eq!(tree.iter().len(), 11);
    assert_eq!(tree.ptrs().next(), tree.first());
    assert_eq!(tree.ptrs().next_back(), tree.last());

    let mut rev: Vec<Vec<&str>> = tree.paths().rev().map(|path| path.to_vec()).collect();
    rev.reverse();
    assert_eq!(rev, std_order());

    // both ends meet in the middle
    let mut ptrs = tree.ptrs();
    let mut n = 0;
    while let Some(_) = ptrs.next() {
        n += 1;
        if ptrs.next_back().is_some() {
            n += 1;
        }
    }
    assert_eq!(n, 11);

    let order = tree.order();
    for ((path, value), (expected, p)) in order.iter().zip(std_order().iter().zip(tree.ptrs())) {
        assert_eq!(path, expected);
        assert_eq!(*value, tree.value_of(p).unwrap());
        assert_eq!(Some(*value), tree.get(path));
    }
    for ((path, value), (p, value2)) in tree.pairs().zip(&tree) {
        assert_eq!(tree.node_path(p).unwrap(), path);
        assert_eq!(value, value2);
    }
    assert_eq!(tree.values().filter(|v| !v.is_leaf()).count(), 4);
}

#[test]
fn debug_renders_order() {
    let tree = OrderTree::from_literal(literal!({
        "a" => { "b" => 4 },
        "c" => 5,
    }))
    .unwrap();
    assert_eq!(
        format!("{tree:?}"),
        r#"{["a", "b"]: 4, ["a"]: {"b": 4}, ["c"]: 5}"#
    );
}

#[test]
fn from_literal() {
    assert!(matches!(
        Tree::from_literal(literal!(4)),
        Err(Error::InvalidArgument(_))
    ));
    let tree: Tree = std_tree().to_literal().entries().unwrap().iter().cloned().collect();
    check(&tree);
    assert_eq!(tree, std_tree());

    // copying a tree under a key of another
    let mut other = Tree::new();
    other.set(&["copy"], std_tree().to_literal()).unwrap();
    check(&other);
    let expected: Vec<Vec<&str>> = std_order()
        .into_iter()
        .map(|path| [vec!["copy"], path].concat())
        .chain([vec!["copy"]])
        .collect();
    assert_eq!(paths(&other), expected);
}

#[test]
fn literals_keep_insertion_order() {
    let mut flat = Tree::new();
    flat.set_leaf(&["b"], 1).unwrap();
    flat.set_leaf(&["a"], 2).unwrap();
    assert_eq!(flat.to_literal(), literal!({ "b" => 1, "a" => 2 }));
    let copy = Tree::from_literal(flat.to_literal()).unwrap();
    check(&copy);
    assert_eq!(paths(&copy), vec![vec!["b"], vec!["a"]]);
    assert_eq!(copy, flat);

    let mut src = Tree::new();
    src.set_leaf(&["b"], 1).unwrap();
    src.set(&["m"], Literal::Map(vec![])).unwrap();
    src.set_leaf(&["m", "z"], 2).unwrap();
    src.set_leaf(&["m", "y"], 3).unwrap();
    src.set_leaf(&["a"], 4).unwrap();
    let lit = src.to_literal();
    assert_eq!(
        lit,
        literal!({ "b" => 1, "m" => { "z" => 2, "y" => 3 }, "a" => 4 })
    );
    assert_eq!(
        src.get(&["m"]).unwrap().branch().unwrap().to_literal(),
        literal!({ "z" => 2, "y" => 3 })
    );

    // copying keeps the relative order at every level
    let mut other = Tree::new();
    other.set(&["copy"], lit).unwrap();
    check(&other);
    assert_eq!(paths(&other), vec![
        vec!["copy", "b"],
        vec!["copy", "m", "z"],
        vec!["copy", "m", "y"],
        vec!["copy", "m"],
        vec!["copy", "a"],
        vec!["copy"],
    ]);

    // so do removed contents
    let removed = src.delete(&["m"]).unwrap().unwrap();
    check(&src);
    assert_eq!(removed.into_inner(), literal!({ "z" => 2, "y" => 3 }));
}

#[test]
fn leaf_writes_without_clone() {
    #[derive(Debug, PartialEq)]
    struct Token(u8);

    let mut tree: OrderTree<u8, Token> = OrderTree::new();
    let p = tree.set_leaf(&[0], Token(1)).unwrap();
    tree.set_leaf(&[1], Token(2)).unwrap();
    tree.set_leaf(&[0], Token(3)).unwrap();
    check(&tree);
    assert!(!tree.contains(p));
    assert_eq!(tree.get(&[0]).unwrap().leaf(), Some(&Token(3)));
    assert_eq!(paths(&tree), vec![vec![1], vec![0]]);
    assert_eq!(
        tree.delete(&[1]).unwrap().unwrap().into_inner(),
        Literal::Leaf(Token(2))
    );
    assert_eq!(tree.set_leaf(&[0, 1], Token(4)), Err(Error::StructuralMismatch { depth: 0 }));
}

/// Takes apart a chain of single entry maps without recursing, returning how
/// many maps there were
fn unnest(mut lit: Literal<u32, i64>) -> u32 {
    let mut depth = 0;
    while let Literal::Map(mut entries) = lit {
        assert_eq!(entries.len(), 1);
        lit = entries.pop().unwrap().1;
        depth += 1;
    }
    assert_eq!(lit, Literal::Leaf(-1));
    depth
}

#[test]
fn deep_nesting() {
    const DEPTH: u32 = 10_000;
    let mut lit = Literal::Leaf(-1);
    for key in (0..DEPTH).rev() {
        lit = Literal::Map(vec![(key, lit)]);
    }
    let mut tree: OrderTree<u32, i64> = OrderTree::from_literal(lit).unwrap();
    check(&tree);
    assert_eq!(tree.len(), DEPTH as usize);

    let deepest: Vec<u32> = (0..DEPTH).collect();
    let leaf = tree.first().unwrap();
    assert_eq!(tree.node_path(leaf).unwrap(), &deepest[..]);
    assert_eq!(tree.path(&-1), Some(deepest));
    assert!(tree.before(leaf, tree.id(tree.last().unwrap()).unwrap()).unwrap());

    tree.set_default(Some(7));
    assert_eq!(tree.get(&[0, 1, 5]).unwrap().leaf(), Some(&7));
    let inner = tree.at(&[0, 1]).node().unwrap();
    assert_eq!(
        tree.value_of(inner).unwrap().branch().unwrap().default_value(),
        Some(&7)
    );

    assert_eq!(unnest(tree.to_literal()), DEPTH);
    let removed = tree.delete(&[0]).unwrap().unwrap();
    assert_eq!(unnest(removed.into_inner()), DEPTH - 1);
    check(&tree);
    assert!(tree.is_empty());
}
