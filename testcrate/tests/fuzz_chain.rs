use std::collections::HashMap;

use order_tree::{utils::ChainArena, Ptr};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use testcrate::P0;

macro_rules! next_inx {
    ($rng:ident, $len:ident) => {
        $rng.next_u32() as usize % $len
    };
}

#[test]
#[allow(clippy::type_complexity)]
fn fuzz_chain() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);

    // unique id for checking that the correct elements are returned
    let mut counter = 0u64;
    let mut new_t = || {
        counter += 1;
        counter
    };

    let mut list: Vec<u64> = vec![];

    let mut a: ChainArena<P0, u64> = ChainArena::new();
    let mut b: HashMap<u64, (P0, (Option<u64>, Option<u64>))> = HashMap::new();

    let invalid = a.insert_new(u64::MAX);
    a.remove(invalid).unwrap();
    let mut op_inx;
    let mut max_len = 0;

    for _ in 0..50_000 {
        assert_eq!(a.len(), list.len());
        assert_eq!(b.len(), a.len());
        assert_eq!(a.is_empty(), list.is_empty());
        let len = list.len();
        max_len = max_len.max(len);
        if let Err(e) = ChainArena::_check_invariants(&a) {
            panic!("{e}");
        }
        op_inx = rng.next_u32() % 1000;
        match op_inx {
            0..=49 => {
                // insert_new
                let t = new_t();
                list.push(t);
                let p = a.insert_new(t);
                b.insert(t, (p, (None, None)));
            }
            50..=349 => {
                // insert_end
                if len != 0 {
                    let mut t0 = list[next_inx!(rng, len)];
                    let t = new_t();
                    if b[&t0].1 .1.is_some() {
                        // not the end of its chain
                        assert_eq!(a.insert_end(b[&t0].0, t), Err(t));
                        while let Some(t1) = b[&t0].1 .1 {
                            t0 = t1;
                        }
                    }
                    let p = a.insert_end(b[&t0].0, t).unwrap();
                    b.get_mut(&t0).unwrap().1 .1 = Some(t);
                    b.insert(t, (p, (Some(t0), None)));
                    list.push(t);
                } else {
                    assert_eq!(a.insert_end(invalid, 0), Err(0));
                }
            }
            350..=679 => {
                // remove
                if len != 0 {
                    let t = list.swap_remove(next_inx!(rng, len));
                    let p = b[&t].0;
                    match b[&t].1 {
                        (None, None) => (),
                        (None, Some(t1)) => {
                            b.get_mut(&t1).unwrap().1 .0 = None;
                        }
                        (Some(t0), None) => {
                            b.get_mut(&t0).unwrap().1 .1 = None;
                        }
                        (Some(t0), Some(t1)) => {
                            b.get_mut(&t0).unwrap().1 .1 = Some(t1);
                            b.get_mut(&t1).unwrap().1 .0 = Some(t0);
                        }
                    }
                    assert_eq!(a.remove(p).unwrap().t, t);
                    b.remove(&t);
                    assert!(a.remove(p).is_none());
                } else {
                    assert!(a.remove(invalid).is_none());
                }
            }
            680..=999 => {
                // get_link
                if len != 0 {
                    let t = list[next_inx!(rng, len)];
                    let (p, (prev, next)) = b[&t];
                    assert!(a.contains(p));
                    let link = a.get_link(p).unwrap();
                    assert_eq!(link.t, t);
                    assert_eq!(link.prev(), prev.map(|t0| b[&t0].0));
                    assert_eq!(link.next(), next.map(|t1| b[&t1].0));
                    assert_eq!(a[p], t);
                    *a.get_mut(p).unwrap() = t;
                } else {
                    assert!(a.get_link(invalid).is_none());
                    assert!(a.get(P0::invalid()).is_none());
                }
            }
            _ => unreachable!(),
        }
    }
    assert!(max_len > 100);
}
