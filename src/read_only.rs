//! Read-only view over a weak container.

use crate::collection::WeakCollectionView;
use crate::cursor::{DeadSlots, Iter};
use crate::error::IterError;
use crate::store::Shared;
use crate::weak::WeakElement;
use std::rc::Rc;

/// Exposes `contains`, `len` and iteration over a live `WeakList` or
/// `WeakSet`. It shares the container's storage, it is not a snapshot: reads
/// see later changes and may sweep dead slots. There is no way back to the
/// mutable container from here.
pub struct ReadOnlyWeakCollection<W: WeakElement> {
    shared: Rc<Shared<W>>,
    dead: DeadSlots,
}

impl<W: WeakElement> ReadOnlyWeakCollection<W> {
    pub(crate) fn new(shared: Rc<Shared<W>>, dead: DeadSlots) -> Self {
        Self { shared, dead }
    }

    pub fn len(&self) -> usize {
        self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor with the iteration semantics of the wrapped container kind.
    pub fn iter(&self) -> Iter<W> {
        Iter::new(self.shared.clone(), self.dead)
    }

    pub fn is_read_only(&self) -> bool {
        true
    }
}

impl<W> ReadOnlyWeakCollection<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    pub fn contains<'a>(&self, item: impl Into<Option<&'a W::Strong>>) -> bool
    where
        W::Strong: 'a,
    {
        self.shared.contains(item.into())
    }
}

impl<W: WeakElement> Clone for ReadOnlyWeakCollection<W> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            dead: self.dead,
        }
    }
}

impl<W: WeakElement> core::fmt::Debug for ReadOnlyWeakCollection<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadOnlyWeakCollection")
            .field("slots", &self.shared.slot_len())
            .field("version", &self.shared.version())
            .finish()
    }
}

impl<W: WeakElement> IntoIterator for &ReadOnlyWeakCollection<W> {
    type Item = Result<Option<W::Strong>, IterError>;
    type IntoIter = Iter<W>;

    fn into_iter(self) -> Iter<W> {
        self.iter()
    }
}

impl<W> WeakCollectionView<W> for ReadOnlyWeakCollection<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn contains(&self, item: Option<&W::Strong>) -> bool {
        ReadOnlyWeakCollection::contains(self, item)
    }

    fn len(&self) -> usize {
        ReadOnlyWeakCollection::len(self)
    }

    fn iter(&self) -> Iter<W> {
        ReadOnlyWeakCollection::iter(self)
    }

    fn is_read_only(&self) -> bool {
        true
    }
}
