use std::cmp::Ordering;

use order_tree::{Error, Literal, OrderTree, ValueRef};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use testcrate::{check, init_tracing, paths};

macro_rules! next_inx {
    ($rng:ident, $len:expr) => {
        $rng.next_u32() as usize % $len
    };
}

// the depth that paths and literals are kept within
const MAX_DEPTH: usize = 3;
const N_KEYS: u32 = 4;

/// Every node as `(path, value)` in insertion order, `None` for branches
type Model = Vec<(Vec<u8>, Option<u64>)>;

fn lookup<'a>(model: &'a Model, path: &[u8]) -> Option<&'a Option<u64>> {
    model.iter().find(|(p, _)| p == path).map(|(_, v)| v)
}

/// Mirrors the rule for resolving all but the last key on writes
fn resolve(model: &Model, init: &[u8]) -> Result<(), Error> {
    for depth in 0..init.len() {
        match lookup(model, &init[..=depth]) {
            Some(None) => (),
            _ => return Err(Error::StructuralMismatch { depth }),
        }
    }
    Ok(())
}

/// Mirrors a read, `Err` meaning that the default is read
fn read(model: &Model, path: &[u8]) -> Result<Option<u64>, ()> {
    for i in 0..path.len() {
        match lookup(model, &path[..=i]) {
            None => return Err(()),
            Some(v) if i + 1 == path.len() => return Ok(*v),
            Some(Some(_)) => return Err(()),
            Some(None) => (),
        }
    }
    unreachable!()
}

fn remove_under(model: &mut Model, path: &[u8]) -> bool {
    let len = model.len();
    model.retain(|(p, _)| !p.starts_with(path));
    model.len() != len
}

fn push_literal(model: &mut Model, path: Vec<u8>, lit: &Literal<u8, u64>) {
    match lit {
        Literal::Leaf(v) => model.push((path, Some(*v))),
        Literal::Map(entries) => {
            for (key, lit) in entries {
                let mut sub = path.clone();
                sub.push(*key);
                push_literal(model, sub, lit);
            }
            model.push((path, None));
        }
    }
}

fn rand_path(rng: &mut Xoshiro128StarStar, max_len: usize) -> Vec<u8> {
    let len = 1 + next_inx!(rng, max_len);
    (0..len).map(|_| (rng.next_u32() % N_KEYS) as u8).collect()
}

fn rand_literal(rng: &mut Xoshiro128StarStar, counter: &mut u64, depth: usize) -> Literal<u8, u64> {
    if (depth == 0) || ((rng.next_u32() % 3) != 0) {
        *counter += 1;
        Literal::Leaf(*counter)
    } else {
        let mut keys = vec![];
        for _ in 0..(rng.next_u32() % 3) {
            let key = (rng.next_u32() % N_KEYS) as u8;
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Literal::Map(
            keys.into_iter()
                .map(|key| (key, rand_literal(rng, counter, depth - 1)))
                .collect(),
        )
    }
}

#[test]
fn fuzz_tree() {
    init_tracing();
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    // leaf values are unique so that value searches are unambiguous
    let mut counter = 0u64;

    let mut tree: OrderTree<u8, u64> = OrderTree::new();
    let mut model: Model = vec![];
    let mut default: Option<u64> = None;

    let mut op_inx;
    let mut max_len = 0;
    let mut n_structural = 0;
    for _ in 0..10_000 {
        check(&tree);
        let expected: Vec<Vec<u8>> = model.iter().map(|(path, _)| path.clone()).collect();
        assert_eq!(paths(&tree), expected);
        assert_eq!(tree.len(), model.len());
        assert_eq!(tree.is_empty(), model.is_empty());
        let leaves: Vec<u64> = model.iter().filter_map(|(_, v)| *v).collect();
        assert_eq!(tree.leaves().copied().collect::<Vec<_>>(), leaves);
        let len = model.len();
        max_len = max_len.max(len);

        op_inx = rng.next_u32() % 1000;
        match op_inx {
            0..=399 => {
                // set
                let path = rand_path(&mut rng, MAX_DEPTH);
                let lit = rand_literal(&mut rng, &mut counter, MAX_DEPTH - path.len());
                let (key, init) = path.split_last().unwrap();
                let res = tree.set(&path, lit.clone());
                match resolve(&model, init) {
                    Ok(()) => {
                        let p = res.unwrap();
                        remove_under(&mut model, &path);
                        push_literal(&mut model, path.clone(), &lit);
                        assert_eq!(tree.last(), Some(p));
                        assert_eq!(tree.node_path(p).unwrap().last(), Some(key));
                    }
                    Err(e) => {
                        n_structural += 1;
                        assert_eq!(res, Err(e));
                    }
                }
            }
            400..=549 => {
                // delete
                let path = rand_path(&mut rng, MAX_DEPTH);
                let res = tree.delete(&path);
                match resolve(&model, &path[..(path.len() - 1)]) {
                    Ok(()) => {
                        let expected = lookup(&model, &path).is_some();
                        assert_eq!(res.unwrap().is_some(), expected);
                        assert_eq!(remove_under(&mut model, &path), expected);
                    }
                    Err(e) => assert_eq!(res, Err(e)),
                }
            }
            550..=699 => {
                // remove
                if len != 0 {
                    let p = tree.ptrs().nth(next_inx!(rng, len)).unwrap();
                    let path = tree.node_path(p).unwrap().to_vec();
                    let id = tree.id(p).unwrap();
                    let removed = tree.remove(p).unwrap();
                    assert_eq!(removed.id(), id);
                    let n = model.len();
                    remove_under(&mut model, &path);
                    assert_eq!(removed.value().count_nodes(), n - model.len() - 1);
                    assert_eq!(tree.remove(p).unwrap_err(), Error::PathNotFound);
                }
            }
            700..=849 => {
                // get
                let path = rand_path(&mut rng, MAX_DEPTH + 1);
                let value = tree.get(&path);
                match read(&model, &path) {
                    Ok(Some(v)) => assert_eq!(value.unwrap().leaf(), Some(&v)),
                    Ok(None) => assert!(matches!(value, Some(ValueRef::Branch(_)))),
                    Err(()) => {
                        assert_eq!(value.and_then(ValueRef::leaf), default.as_ref());
                        assert!(tree.at(&path).is_default());
                    }
                }
            }
            850..=899 => {
                // path
                if len != 0 {
                    let (path, v) = &model[next_inx!(rng, len)];
                    if let Some(v) = v {
                        assert_eq!(tree.path(v).as_ref(), Some(path));
                    }
                }
                assert_eq!(tree.path(&u64::MAX), None);
            }
            900..=979 => {
                // compare
                if len != 0 {
                    let i = next_inx!(rng, len);
                    let j = next_inx!(rng, len);
                    let p = tree.ptrs().nth(i).unwrap();
                    let q = tree.ptrs().nth(j).unwrap();
                    let ord = tree.compare(p, tree.id(q).unwrap()).unwrap();
                    assert_eq!(ord, i.cmp(&j));
                    assert_eq!(tree.before(p, tree.id(q).unwrap()).unwrap(), ord == Ordering::Less);
                }
            }
            980..=999 => {
                // set_default
                default = if (rng.next_u32() & 1) == 0 {
                    None
                } else {
                    counter += 1;
                    Some(counter)
                };
                tree.set_default(default);
                assert_eq!(tree.default_value(), default.as_ref());
            }
            _ => unreachable!(),
        }
    }
    assert!(max_len > 10);
    assert!(n_structural > 0);
}
