//! WeakSet: weak references deduplicated by item equality, with set algebra.
//!
//! Lookup is a linear scan over live slots. A weak slot cannot be indexed
//! by its target's hash because the target may be reclaimed while the slot
//! is still stored, so every membership check resolves and compares.
//! Set algebra against another operand of `m` items is therefore `O(n*m)`.
//!
//! Algebra is defined over the members that resolve at call time: a dead
//! slot is absent. Operations collect `other` up front (holding strong
//! pointers for its items) before touching any slot, and bump the version
//! at most once per call.

use crate::collection::{WeakCollection, WeakCollectionView};
use crate::cursor::{DeadSlots, Iter};
use crate::error::{CopyToError, IterError};
use crate::read_only::ReadOnlyWeakCollection;
use crate::store::Shared;
use crate::weak::{Resurrection, WeakElement, WeakHandle};
use std::rc::Rc;

/// A set of weak references. At most one null slot, and no two live slots
/// with equal targets.
///
/// Iteration order is unspecified. Dead slots are skipped by iteration and
/// dropped by the next sweep (`len`, `iter`, `copy_to`, mutating algebra).
///
/// ```
/// use std::rc::{self, Rc};
/// use weak_collections::WeakSet;
///
/// let a = Rc::new("a");
/// let b = Rc::new("b");
/// let set: WeakSet<rc::Weak<&str>> = WeakSet::new();
/// assert!(set.add(&a));
/// assert!(!set.add(&Rc::new("a")));
/// set.add(None);
/// set.union_with([a.clone(), b.clone()]);
/// assert_eq!(set.len(), 3);
/// ```
pub struct WeakSet<W: WeakElement> {
    shared: Rc<Shared<W>>,
}

fn collect_other<W, I>(other: I) -> Vec<Option<W::Strong>>
where
    W: WeakElement,
    I: IntoIterator,
    I::Item: Into<Option<W::Strong>>,
{
    other.into_iter().map(Into::into).collect()
}

fn distinct<S: PartialEq>(items: Vec<Option<S>>) -> Vec<Option<S>> {
    let mut out: Vec<Option<S>> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl<W: WeakElement> WeakSet<W> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Rc::new(Shared::with_capacity(capacity)),
        }
    }

    /// Number of slots after sweeping; the null member counts once.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical slot count without sweeping.
    pub fn slot_len(&self) -> usize {
        self.shared.slot_len()
    }

    pub fn version(&self) -> u64 {
        self.shared.version()
    }

    pub fn clear(&self) {
        self.shared.clear();
    }

    pub fn remove_dead_references(&self) -> bool {
        self.shared.sweep()
    }

    pub fn to_vec(&self) -> Vec<Option<W::Strong>> {
        self.shared.to_vec()
    }

    pub fn copy_to(
        &self,
        destination: &mut [Option<W::Strong>],
        start: usize,
    ) -> Result<(), CopyToError> {
        self.shared.copy_to(destination, start)
    }

    /// Sweep, then return a cursor bound to the current version. Targets that
    /// die during iteration are skipped.
    pub fn iter(&self) -> Iter<W> {
        Iter::new(self.shared.clone(), DeadSlots::Skip)
    }

    pub fn to_read_only(&self) -> ReadOnlyWeakCollection<W> {
        ReadOnlyWeakCollection::new(self.shared.clone(), DeadSlots::Skip)
    }

    pub fn is_read_only(&self) -> bool {
        false
    }

    fn members(&self) -> Vec<Option<W::Strong>> {
        self.shared.read(|s| s.members())
    }
}

impl<W> WeakSet<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    /// Insert `item` unless an equal member (or, for `None`, the null member)
    /// is already present. Returns whether it was inserted.
    pub fn add<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        self.add_with(item, Resurrection::Ignore)
    }

    pub fn add_with<'a>(
        &self,
        item: impl Into<Option<&'a W::Strong>>,
        resurrection: Resurrection,
    ) -> bool
    where
        W::Strong: 'a,
    {
        let item = item.into();
        let added = self.shared.edit(|s| {
            if s.contains(item) {
                return false;
            }
            s.push(WeakHandle::from_item(item, resurrection));
            true
        });
        if added {
            self.shared.bump();
        }
        added
    }

    pub fn contains<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        self.shared.contains(item.into())
    }

    pub fn remove<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        let item = item.into();
        let removed = self.shared.edit(|s| s.retain(|h| !h.matches(item)));
        if removed > 0 {
            self.shared.bump();
        }
        removed > 0
    }

    fn finish_algebra(&self, op: &'static str, changed: usize) {
        if changed > 0 {
            let version = self.shared.bump();
            tracing::trace!(op, changed, version, "weak set modified");
        }
    }

    /// Add every item of `other` not already present.
    pub fn union_with<I>(&self, other: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        if other.is_empty() {
            return;
        }
        let added = self.shared.edit(|s| {
            let mut added = 0;
            for item in &other {
                if !s.contains(item.as_ref()) {
                    s.push(WeakHandle::from_item(item.as_ref(), Resurrection::Ignore));
                    added += 1;
                }
            }
            added
        });
        self.finish_algebra("union_with", added);
    }

    /// Keep only members that also appear in `other`.
    pub fn intersect_with<I>(&self, other: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        self.shared.sweep();
        let removed = self
            .shared
            .edit(|s| s.retain(|h| other.iter().any(|o| h.matches(o.as_ref()))));
        self.finish_algebra("intersect_with", removed);
    }

    /// Remove every member that appears in `other`.
    pub fn except_with<I>(&self, other: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        if other.is_empty() {
            return;
        }
        self.shared.sweep();
        let removed = self
            .shared
            .edit(|s| s.retain(|h| !other.iter().any(|o| h.matches(o.as_ref()))));
        self.finish_algebra("except_with", removed);
    }

    /// Keep members not in `other` and add items of `other` not in the set.
    pub fn symmetric_except_with<I>(&self, other: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = distinct(collect_other::<W, I>(other));
        if other.is_empty() {
            return;
        }
        self.shared.sweep();
        let changed = self.shared.edit(|s| {
            let mut changed = 0;
            for item in &other {
                match s.position(item.as_ref()) {
                    Some(index) => {
                        s.remove_at(index);
                    }
                    None => {
                        s.push(WeakHandle::from_item(item.as_ref(), Resurrection::Ignore));
                    }
                }
                changed += 1;
            }
            changed
        });
        self.finish_algebra("symmetric_except_with", changed);
    }

    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        self.members().iter().all(|m| other.contains(m))
    }

    /// Subset, and `other` has at least one item that is not a member.
    pub fn is_proper_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        let mine = self.members();
        mine.iter().all(|m| other.contains(m)) && other.iter().any(|o| !mine.contains(o))
    }

    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        let mine = self.members();
        other.iter().all(|o| mine.contains(o))
    }

    /// Superset, and the set has at least one member missing from `other`.
    pub fn is_proper_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        let mine = self.members();
        other.iter().all(|o| mine.contains(o)) && mine.iter().any(|m| !other.contains(m))
    }

    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        let mine = self.members();
        other.iter().any(|o| mine.contains(o))
    }

    /// Same cardinality and mutual containment. The cardinality check uses
    /// the number of items in `other` as given, so an operand with
    /// duplicates never equals the set.
    pub fn set_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Option<W::Strong>>,
    {
        let other = collect_other::<W, I>(other);
        if self.len() != other.len() {
            return false;
        }
        let mine = self.members();
        mine.iter().all(|m| other.contains(m)) && other.iter().all(|o| mine.contains(o))
    }
}

#[cfg(test)]
impl<W: WeakElement> WeakSet<W> {
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&crate::store::SlotStore<W>) -> R) -> R {
        self.shared.read(f)
    }
}

impl<W: WeakElement> Default for WeakSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeakElement> core::fmt::Debug for WeakSet<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeakSet")
            .field("slots", &self.slot_len())
            .field("version", &self.version())
            .finish()
    }
}

impl<'a, W> Extend<&'a W::Strong> for WeakSet<W>
where
    W: WeakElement,
    W::Strong: PartialEq + 'a,
{
    fn extend<I: IntoIterator<Item = &'a W::Strong>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, W> FromIterator<&'a W::Strong> for WeakSet<W>
where
    W: WeakElement,
    W::Strong: PartialEq + 'a,
{
    fn from_iter<I: IntoIterator<Item = &'a W::Strong>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<W: WeakElement> IntoIterator for &WeakSet<W> {
    type Item = Result<Option<W::Strong>, IterError>;
    type IntoIter = Iter<W>;

    fn into_iter(self) -> Iter<W> {
        self.iter()
    }
}

impl<W> WeakCollectionView<W> for WeakSet<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn contains(&self, item: Option<&W::Strong>) -> bool {
        WeakSet::contains(self, item)
    }

    fn len(&self) -> usize {
        WeakSet::len(self)
    }

    fn iter(&self) -> Iter<W> {
        WeakSet::iter(self)
    }

    fn is_read_only(&self) -> bool {
        false
    }
}

impl<W> WeakCollection<W> for WeakSet<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn add_with(&self, item: Option<&W::Strong>, resurrection: Resurrection) -> bool {
        WeakSet::add_with(self, item, resurrection)
    }

    fn remove(&self, item: Option<&W::Strong>) -> bool {
        WeakSet::remove(self, item)
    }

    fn clear(&self) {
        WeakSet::clear(self)
    }

    fn copy_to(
        &self,
        destination: &mut [Option<W::Strong>],
        start: usize,
    ) -> Result<(), CopyToError> {
        WeakSet::copy_to(self, destination, start)
    }

    fn remove_dead_references(&self) -> bool {
        WeakSet::remove_dead_references(self)
    }

    fn to_read_only(&self) -> ReadOnlyWeakCollection<W> {
        WeakSet::to_read_only(self)
    }
}
