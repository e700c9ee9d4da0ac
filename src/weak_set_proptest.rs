#![cfg(test)]

// Property tests for WeakSet kept inside the crate so they can inspect the
// slot store directly (null-slot uniqueness, no duplicate live targets).

use crate::weak::WeakHandle;
use crate::weak_set::WeakSet;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::rc::{self, Rc};

const POOL: usize = 6;

#[derive(Clone, Debug)]
enum Op {
    Add(usize),
    AddNull,
    Remove(usize),
    RemoveNull,
    Kill(usize),
    Revive(usize),
    Union(Vec<usize>, bool),
    Intersect(Vec<usize>, bool),
    Except(Vec<usize>, bool),
    SymExcept(Vec<usize>, bool),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    let idx = 0..POOL;
    let other = (proptest::collection::vec(0..POOL, 0..5), any::<bool>());
    prop_oneof![
        idx.clone().prop_map(Op::Add),
        Just(Op::AddNull),
        idx.clone().prop_map(Op::Remove),
        Just(Op::RemoveNull),
        idx.clone().prop_map(Op::Kill),
        idx.prop_map(Op::Revive),
        other.clone().prop_map(|(v, n)| Op::Union(v, n)),
        other.clone().prop_map(|(v, n)| Op::Intersect(v, n)),
        other.clone().prop_map(|(v, n)| Op::Except(v, n)),
        other.prop_map(|(v, n)| Op::SymExcept(v, n)),
        Just(Op::Clear),
    ]
}

#[derive(Default, Clone, PartialEq, Debug)]
struct Model {
    present: BTreeSet<usize>,
    null: bool,
}

impl Model {
    fn len(&self) -> usize {
        self.present.len() + usize::from(self.null)
    }
}

// Items of an operand: alive pool entries plus an optional null.
fn operand(
    pool: &[Option<Rc<usize>>],
    idxs: &[usize],
    null: bool,
) -> (Vec<Option<Rc<usize>>>, BTreeSet<usize>) {
    let mut items = Vec::new();
    let mut model = BTreeSet::new();
    for &i in idxs {
        if let Some(rc) = &pool[i] {
            items.push(Some(rc.clone()));
            model.insert(i);
        }
    }
    if null {
        items.push(None);
    }
    (items, model)
}

// Property: state-machine equivalence against a BTreeSet of live indices.
// - Dead targets are absent everywhere, without any version bump.
// - Mutations bump the version iff the member set changed.
// - The store never holds two null slots or two equal live targets.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_weak_set_state_machine(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let set: WeakSet<rc::Weak<usize>> = WeakSet::new();
        let mut pool: Vec<Option<Rc<usize>>> = (0..POOL).map(|i| Some(Rc::new(i))).collect();
        let mut model = Model::default();

        for op in ops {
            let before = model.clone();
            let version = set.version();
            // Kill/Revive never bump; clear bumps iff any slot (even a dead one) existed.
            let expect_bump = match op {
                Op::Kill(_) | Op::Revive(_) => Some(false),
                Op::Clear => Some(set.slot_len() > 0),
                _ => None,
            };
            match op {
                Op::Add(i) => {
                    if let Some(rc) = pool[i].clone() {
                        let added = set.add(&rc);
                        prop_assert_eq!(added, model.present.insert(i));
                    }
                }
                Op::AddNull => {
                    let added = set.add(None);
                    prop_assert_eq!(added, !model.null);
                    model.null = true;
                }
                Op::Remove(i) => {
                    let probe = Rc::new(i);
                    let removed = set.remove(&probe);
                    prop_assert_eq!(removed, model.present.remove(&i));
                }
                Op::RemoveNull => {
                    prop_assert_eq!(set.remove(None), model.null);
                    model.null = false;
                }
                Op::Kill(i) => {
                    pool[i] = None;
                    model.present.remove(&i);
                }
                Op::Revive(i) => {
                    if pool[i].is_none() {
                        pool[i] = Some(Rc::new(i));
                    }
                }
                Op::Union(idxs, null) => {
                    let (items, other) = operand(&pool, &idxs, null);
                    set.union_with(items);
                    model.present.extend(other);
                    model.null |= null;
                }
                Op::Intersect(idxs, null) => {
                    let (items, other) = operand(&pool, &idxs, null);
                    set.intersect_with(items);
                    model.present.retain(|i| other.contains(i));
                    model.null &= null;
                }
                Op::Except(idxs, null) => {
                    let (items, other) = operand(&pool, &idxs, null);
                    set.except_with(items);
                    model.present.retain(|i| !other.contains(i));
                    model.null &= !null;
                }
                Op::SymExcept(idxs, null) => {
                    let (items, other) = operand(&pool, &idxs, null);
                    set.symmetric_except_with(items);
                    model.present = model.present.symmetric_difference(&other).copied().collect();
                    model.null ^= null;
                }
                Op::Clear => {
                    set.clear();
                    model = Model::default();
                }
            }

            let bumped = set.version() != version;
            match expect_bump {
                Some(expected) => prop_assert_eq!(bumped, expected),
                None => prop_assert_eq!(bumped, before != model),
            }

            let nulls = set.inspect(|s| s.iter().filter(|h| h.is_empty_sentinel()).count());
            prop_assert!(nulls <= 1);

            prop_assert_eq!(set.len(), model.len());
            for (i, entry) in pool.iter().enumerate() {
                if let Some(rc) = entry {
                    prop_assert_eq!(set.contains(rc), model.present.contains(&i));
                }
            }
            prop_assert_eq!(set.contains(None), model.null);

            let live: Vec<usize> =
                set.inspect(|s| s.iter().filter_map(WeakHandle::try_resolve).map(|r| *r).collect());
            let distinct: BTreeSet<usize> = live.iter().copied().collect();
            prop_assert_eq!(distinct.len(), live.len());
        }
    }
}
