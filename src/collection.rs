//! Capability traits shared by `WeakList`, `WeakSet` and the read-only view.
//!
//! The containers are independent types; these traits only describe the
//! operations callers can rely on regardless of container kind.

use crate::cursor::Iter;
use crate::error::CopyToError;
use crate::read_only::ReadOnlyWeakCollection;
use crate::weak::{Resurrection, WeakElement};

/// Read operations. This is everything a `ReadOnlyWeakCollection` exposes.
pub trait WeakCollectionView<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    fn contains(&self, item: Option<&W::Strong>) -> bool;

    /// Live slot count. Sweeps dead slots first.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Iter<W>;

    fn is_read_only(&self) -> bool;
}

/// Mutating operations common to both containers.
pub trait WeakCollection<W>: WeakCollectionView<W>
where
    W: WeakElement,
    W::Strong: PartialEq,
{
    /// Store `item` (or a null for `None`). Returns whether a slot was added;
    /// always true for lists.
    fn add_with(&self, item: Option<&W::Strong>, resurrection: Resurrection) -> bool;

    fn add(&self, item: Option<&W::Strong>) -> bool {
        self.add_with(item, Resurrection::Ignore)
    }

    fn remove(&self, item: Option<&W::Strong>) -> bool;

    fn clear(&self);

    fn copy_to(&self, destination: &mut [Option<W::Strong>], start: usize)
        -> Result<(), CopyToError>;

    fn remove_dead_references(&self) -> bool;

    fn to_read_only(&self) -> ReadOnlyWeakCollection<W>;
}
