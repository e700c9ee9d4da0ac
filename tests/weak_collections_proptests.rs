// Weak collection property tests.
//
// Property 1: WeakList matches a Vec model of live slots.
//  - Model: ordered Vec<Option<usize>> of pool indices (None = stored null).
//    Killing a pool entry removes every model slot for that index.
//  - Invariant: len() == model length; to_vec() matches model order;
//    contains() agrees for every live pool entry and for null.
//  - Version: add always bumps, remove bumps iff a slot matched, clear bumps
//    iff any slot existed; kill/revive never bump.
//
// Property 2: the same stream of adds into a list and a set.
//  - Invariant: list keeps every add, set keeps one per distinct value.
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::rc::{self, Rc};
use weak_collections::{WeakList, WeakSet};

const POOL: usize = 5;

#[derive(Clone, Debug)]
enum Op {
    Add(usize),
    AddNull,
    Remove(usize),
    RemoveNull,
    Kill(usize),
    Revive(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..POOL).prop_map(Op::Add),
        1 => Just(Op::AddNull),
        2 => (0..POOL).prop_map(Op::Remove),
        1 => Just(Op::RemoveNull),
        2 => (0..POOL).prop_map(Op::Kill),
        2 => (0..POOL).prop_map(Op::Revive),
        1 => Just(Op::Clear),
    ]
}

// Property 1: list contents, order and versioning against the model.
proptest! {
    #[test]
    fn prop_weak_list_model(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let list: WeakList<rc::Weak<usize>> = WeakList::new();
        let mut pool: Vec<Option<Rc<usize>>> = (0..POOL).map(|i| Some(Rc::new(i))).collect();
        let mut model: Vec<Option<usize>> = Vec::new();

        for op in ops {
            let version = list.version();
            let expect_bump = match op {
                Op::Add(i) => {
                    match pool[i].clone() {
                        Some(rc) => {
                            list.add(&rc);
                            model.push(Some(i));
                            true
                        }
                        None => false,
                    }
                }
                Op::AddNull => {
                    list.add(None);
                    model.push(None);
                    true
                }
                Op::Remove(i) => {
                    let found = model.iter().position(|x| *x == Some(i));
                    let removed = list.remove(&Rc::new(i));
                    prop_assert_eq!(removed, found.is_some());
                    if let Some(p) = found {
                        model.remove(p);
                    }
                    removed
                }
                Op::RemoveNull => {
                    let found = model.iter().position(Option::is_none);
                    prop_assert_eq!(list.remove(None), found.is_some());
                    if let Some(p) = found {
                        model.remove(p);
                    }
                    found.is_some()
                }
                Op::Kill(i) => {
                    pool[i] = None;
                    model.retain(|x| *x != Some(i));
                    false
                }
                Op::Revive(i) => {
                    if pool[i].is_none() {
                        pool[i] = Some(Rc::new(i));
                    }
                    false
                }
                Op::Clear => {
                    let any = list.slot_len() > 0;
                    list.clear();
                    model.clear();
                    any
                }
            };
            prop_assert_eq!(list.version() != version, expect_bump);

            prop_assert_eq!(list.len(), model.len());
            let items: Vec<Option<usize>> = list.to_vec().into_iter().map(|x| x.map(|r| *r)).collect();
            prop_assert_eq!(&items, &model);
            for (i, entry) in pool.iter().enumerate() {
                if let Some(rc) = entry {
                    prop_assert_eq!(list.contains(rc), model.contains(&Some(i)));
                }
            }
            prop_assert_eq!(list.contains(None), model.contains(&None));
        }
    }
}

// Property 2: list counts every add, set counts distinct values.
proptest! {
    #[test]
    fn prop_list_vs_set_duplicates(adds in proptest::collection::vec(proptest::option::of(0..POOL), 0..40)) {
        let pool: Vec<Rc<usize>> = (0..POOL).map(Rc::new).collect();
        let list: WeakList<rc::Weak<usize>> = WeakList::new();
        let set: WeakSet<rc::Weak<usize>> = WeakSet::new();
        let mut distinct = BTreeSet::new();

        for a in &adds {
            let item = a.map(|i| &pool[i]);
            list.add(item);
            let fresh = distinct.insert(*a);
            prop_assert_eq!(set.add(item), fresh);
        }
        prop_assert_eq!(list.len(), adds.len());
        prop_assert_eq!(set.len(), distinct.len());
        for a in &distinct {
            prop_assert!(set.contains(a.map(|i| &pool[i])));
        }
    }
}
