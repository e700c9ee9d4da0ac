//! WeakList: insertion-ordered bag of weak references.

use crate::collection::{WeakCollection, WeakCollectionView};
use crate::cursor::{DeadSlots, Iter};
use crate::error::{CopyToError, IterError};
use crate::read_only::ReadOnlyWeakCollection;
use crate::store::Shared;
use crate::weak::{Resurrection, WeakElement, WeakHandle};
use std::rc::Rc;

/// An ordered list of weak references that never keeps its items alive.
///
/// Duplicates are allowed and insertion order is preserved. Slots whose
/// target was reclaimed stay in place until a sweep, which `len`,
/// `is_empty`, `iter`, `to_vec` and `copy_to` run first.
///
/// Mutating methods take `&self`: a cursor obtained from `iter` does not
/// borrow the list, it detects structural changes at runtime instead.
///
/// ```
/// use std::rc::{self, Rc};
/// use weak_collections::WeakList;
///
/// let a = Rc::new(1);
/// let list: WeakList<rc::Weak<i32>> = WeakList::new();
/// list.add(&a);
/// list.add(None);
/// assert_eq!(list.len(), 2);
/// drop(a);
/// assert_eq!(list.len(), 1);
/// ```
pub struct WeakList<W: WeakElement> {
    shared: Rc<Shared<W>>,
}

impl<W: WeakElement> WeakList<W> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Rc::new(Shared::with_capacity(capacity)),
        }
    }

    /// Append `item`, or a null slot for `None`. Always bumps the version.
    pub fn add<'a>(&self, item: impl Into<Option<&'a W::Strong>>)
    where
        W::Strong: 'a,
    {
        self.add_with(item, Resurrection::Ignore)
    }

    pub fn add_with<'a>(&self, item: impl Into<Option<&'a W::Strong>>, resurrection: Resurrection)
    where
        W::Strong: 'a,
    {
        let handle = WeakHandle::from_item(item.into(), resurrection);
        self.shared.edit(|s| s.push(handle));
        self.shared.bump();
    }

    /// Number of slots after sweeping dead references. Null slots count.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical slot count without sweeping; includes slots whose target died.
    pub fn slot_len(&self) -> usize {
        self.shared.slot_len()
    }

    /// Structural version. Changes on add, successful remove and non-empty clear.
    pub fn version(&self) -> u64 {
        self.shared.version()
    }

    /// Drop every slot. A no-op on an empty list leaves the version alone.
    pub fn clear(&self) {
        self.shared.clear();
    }

    /// Sweep dead slots. Returns whether any were dropped; never bumps the version.
    pub fn remove_dead_references(&self) -> bool {
        self.shared.sweep()
    }

    /// Resolved items in order. Null slots give `None`.
    pub fn to_vec(&self) -> Vec<Option<W::Strong>> {
        self.shared.to_vec()
    }

    /// Copy resolved items into `destination[start..]`.
    pub fn copy_to(
        &self,
        destination: &mut [Option<W::Strong>],
        start: usize,
    ) -> Result<(), CopyToError> {
        self.shared.copy_to(destination, start)
    }

    /// Sweep, then return a cursor bound to the current version. Dead targets
    /// met during iteration keep their position and read as `None`.
    pub fn iter(&self) -> Iter<W> {
        Iter::new(self.shared.clone(), DeadSlots::Yield)
    }

    pub fn to_read_only(&self) -> ReadOnlyWeakCollection<W> {
        ReadOnlyWeakCollection::new(self.shared.clone(), DeadSlots::Yield)
    }

    pub fn is_read_only(&self) -> bool {
        false
    }
}

impl<W> WeakList<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    /// Linear scan; dead slots never match and are not purged here.
    pub fn contains<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        self.shared.contains(item.into())
    }

    /// Remove the first slot equal to `item` (or the first null for `None`).
    pub fn remove<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        let item = item.into();
        let removed = self.shared.edit(|s| match s.position(item) {
            Some(index) => s.remove_at(index).is_some(),
            None => false,
        });
        if removed {
            self.shared.bump();
        }
        removed
    }
}

impl<W: WeakElement> Default for WeakList<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeakElement> core::fmt::Debug for WeakList<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeakList")
            .field("slots", &self.slot_len())
            .field("version", &self.version())
            .finish()
    }
}

impl<'a, W> Extend<&'a W::Strong> for WeakList<W>
where
    W: WeakElement,
    W::Strong: 'a,
{
    fn extend<I: IntoIterator<Item = &'a W::Strong>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, W> FromIterator<&'a W::Strong> for WeakList<W>
where
    W: WeakElement,
    W::Strong: 'a,
{
    fn from_iter<I: IntoIterator<Item = &'a W::Strong>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<W: WeakElement> IntoIterator for &WeakList<W> {
    type Item = Result<Option<W::Strong>, IterError>;
    type IntoIter = Iter<W>;

    fn into_iter(self) -> Iter<W> {
        self.iter()
    }
}

impl<W> WeakCollectionView<W> for WeakList<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn contains(&self, item: Option<&W::Strong>) -> bool {
        WeakList::contains(self, item)
    }

    fn len(&self) -> usize {
        WeakList::len(self)
    }

    fn iter(&self) -> Iter<W> {
        WeakList::iter(self)
    }

    fn is_read_only(&self) -> bool {
        false
    }
}

impl<W> WeakCollection<W> for WeakList<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn add_with(&self, item: Option<&W::Strong>, resurrection: Resurrection) -> bool {
        WeakList::add_with(self, item, resurrection);
        true
    }

    fn remove(&self, item: Option<&W::Strong>) -> bool {
        WeakList::remove(self, item)
    }

    fn clear(&self) {
        WeakList::clear(self)
    }

    fn copy_to(
        &self,
        destination: &mut [Option<W::Strong>],
        start: usize,
    ) -> Result<(), CopyToError> {
        WeakList::copy_to(self, destination, start)
    }

    fn remove_dead_references(&self) -> bool {
        WeakList::remove_dead_references(self)
    }

    fn to_read_only(&self) -> ReadOnlyWeakCollection<W> {
        WeakList::to_read_only(self)
    }
}
