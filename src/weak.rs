//! Weak pointer capability and the per-slot handle stored by the containers.

use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// A weak pointer type that can be stored in a weak collection.
///
/// Implemented for `std::rc::Weak<T>` and `std::sync::Weak<T>`. Containers
/// are parameterized by the weak type, e.g. `WeakList<rc::Weak<str>>`, and
/// accept and yield the matching strong type.
pub trait WeakElement {
    /// The strong pointer this weak pointer is created from.
    type Strong: Clone;

    /// Downgrade a strong pointer.
    fn new(strong: &Self::Strong) -> Self;

    /// Try to resolve the target; `None` once it has been reclaimed.
    fn view(&self) -> Option<Self::Strong>;

    /// True when the target can no longer be resolved.
    fn is_expired(&self) -> bool {
        self.view().is_none()
    }
}

impl<T: ?Sized> WeakElement for rc::Weak<T> {
    type Strong = Rc<T>;

    fn new(strong: &Rc<T>) -> Self {
        Rc::downgrade(strong)
    }

    fn view(&self) -> Option<Rc<T>> {
        self.upgrade()
    }

    fn is_expired(&self) -> bool {
        self.strong_count() == 0
    }
}

impl<T: ?Sized> WeakElement for sync::Weak<T> {
    type Strong = Arc<T>;

    fn new(strong: &Arc<T>) -> Self {
        Arc::downgrade(strong)
    }

    fn view(&self) -> Option<Arc<T>> {
        self.upgrade()
    }

    fn is_expired(&self) -> bool {
        self.strong_count() == 0
    }
}

/// Whether a slot's weak pointer may observe a target revived after
/// finalization ("long" weak reference).
///
/// `std` weak pointers stop resolving as soon as the strong count reaches
/// zero and never observe resurrection, so both policies resolve the same
/// way. The policy is still recorded on each slot.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Resurrection {
    #[default]
    Ignore,
    Track,
}

/// One container slot: either a stored null or a weak pointer.
///
/// A `Live` slot whose target died stays in the container until a sweep
/// drops it; it never turns into `Empty`.
#[derive(Clone)]
pub(crate) enum WeakHandle<W> {
    Empty,
    Live { weak: W, resurrection: Resurrection },
}

impl<W: WeakElement> WeakHandle<W> {
    pub(crate) fn from_item(item: Option<&W::Strong>, resurrection: Resurrection) -> Self {
        match item {
            None => WeakHandle::Empty,
            Some(strong) => WeakHandle::Live {
                weak: W::new(strong),
                resurrection,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn is_empty_sentinel(&self) -> bool {
        matches!(self, WeakHandle::Empty)
    }

    /// Resolve a `Live` slot. `Empty` and dead slots both give `None`.
    pub(crate) fn try_resolve(&self) -> Option<W::Strong> {
        match self {
            WeakHandle::Empty => None,
            WeakHandle::Live { weak, .. } => weak.view(),
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        match self {
            WeakHandle::Empty => false,
            WeakHandle::Live { weak, .. } => weak.is_expired(),
        }
    }

    #[cfg(test)]
    pub(crate) fn resurrection(&self) -> Option<Resurrection> {
        match self {
            WeakHandle::Empty => None,
            WeakHandle::Live { resurrection, .. } => Some(*resurrection),
        }
    }

    /// Membership test used by scans: `Empty` matches `None`, a live slot
    /// matches an equal target, a dead slot matches nothing.
    pub(crate) fn matches(&self, item: Option<&W::Strong>) -> bool
    where
        W::Strong: PartialEq,
    {
        match (self, item) {
            (WeakHandle::Empty, None) => true,
            (WeakHandle::Live { weak, .. }, Some(item)) => {
                weak.view().is_some_and(|target| target == *item)
            }
            _ => false,
        }
    }
}

impl<W> core::fmt::Debug for WeakHandle<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WeakHandle::Empty => f.write_str("Empty"),
            WeakHandle::Live { resurrection, .. } => f
                .debug_struct("Live")
                .field("resurrection", resurrection)
                .finish_non_exhaustive(),
        }
    }
}
