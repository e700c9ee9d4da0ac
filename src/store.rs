//! Slot storage shared by every container kind.
//!
//! `SlotStore` keeps handles in a generational `SlotMap` and remembers
//! insertion order in a key vector. Keys stay valid across unrelated
//! removals and never alias a later slot, which lets a cursor snapshot the
//! key sequence and keep going after a sweep removed slots under it.
//!
//! `Shared` wraps the store with the structural version and a scan marker
//! that reports nested access from user `PartialEq`. It sits behind an `Rc` so cursors and read-only views observe the
//! live container rather than a copy.

use crate::error::CopyToError;
use crate::version::StructuralVersion;
use crate::weak::{WeakElement, WeakHandle};
use core::cell::RefCell;
use slotmap::{DefaultKey, SlotMap};

pub(crate) struct SlotStore<W> {
    slots: SlotMap<DefaultKey, WeakHandle<W>>,
    // Same key set as `slots`, in insertion order.
    order: Vec<DefaultKey>,
}

impl<W: WeakElement> SlotStore<W> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn push(&mut self, handle: WeakHandle<W>) -> DefaultKey {
        let k = self.slots.insert(handle);
        self.order.push(k);
        k
    }

    pub(crate) fn get(&self, key: DefaultKey) -> Option<&WeakHandle<W>> {
        self.slots.get(key)
    }

    /// Handles in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &WeakHandle<W>> + '_ {
        self.order.iter().filter_map(|&k| self.slots.get(k))
    }

    pub(crate) fn keys(&self) -> Vec<DefaultKey> {
        self.order.clone()
    }

    pub(crate) fn contains(&self, item: Option<&W::Strong>) -> bool
    where
        W::Strong: PartialEq,
    {
        self.iter().any(|h| h.matches(item))
    }

    pub(crate) fn position(&self, item: Option<&W::Strong>) -> Option<usize>
    where
        W::Strong: PartialEq,
    {
        self.iter().position(|h| h.matches(item))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<WeakHandle<W>> {
        if index >= self.order.len() {
            return None;
        }
        let k = self.order.remove(index);
        self.slots.remove(k)
    }

    /// Keep only the slots for which `keep` returns true, preserving order.
    /// Returns the number of slots dropped.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&WeakHandle<W>) -> bool,
    {
        let before = self.order.len();
        let slots = &mut self.slots;
        self.order.retain(|&k| {
            let kept = slots.get(k).is_some_and(&mut keep);
            if !kept {
                slots.remove(k);
            }
            kept
        });
        before - self.order.len()
    }

    /// Drop every live slot whose target is gone. Front to back, single pass.
    pub(crate) fn sweep(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.retain(|h| !h.is_dead())
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    /// Resolved value of every slot in order; `Empty` and dead slots give `None`.
    pub(crate) fn resolve_all(&self) -> Vec<Option<W::Strong>> {
        self.iter().map(|h| h.try_resolve()).collect()
    }

    /// Currently resolvable members: the stored null as `None`, live targets
    /// as `Some`. Dead slots are left out.
    pub(crate) fn members(&self) -> Vec<Option<W::Strong>> {
        self.iter()
            .filter_map(|h| match h {
                WeakHandle::Empty => Some(None),
                WeakHandle::Live { weak, .. } => weak.view().map(Some),
            })
            .collect()
    }
}

/// Set while a `read`/`edit` closure runs. Scans call user `PartialEq`;
/// if that code reaches back into the same container, debug builds panic
/// here with a named message. Release builds skip the flag and rely on the
/// `RefCell` borrow check.
#[derive(Debug, Default)]
struct ScanMarker {
    #[cfg(debug_assertions)]
    busy: core::cell::Cell<bool>,
}

impl ScanMarker {
    fn begin(&self) -> ScanScope<'_> {
        #[cfg(debug_assertions)]
        assert!(
            !self.busy.replace(true),
            "reentrancy detected: weak collection accessed from inside its own scan"
        );
        ScanScope { marker: self }
    }

    fn end(&self) {
        #[cfg(debug_assertions)]
        self.busy.set(false);
    }
}

struct ScanScope<'a> {
    marker: &'a ScanMarker,
}

impl Drop for ScanScope<'_> {
    fn drop(&mut self) {
        self.marker.end();
    }
}

pub(crate) struct Shared<W> {
    store: RefCell<SlotStore<W>>,
    version: StructuralVersion,
    scan: ScanMarker,
}

impl<W: WeakElement> Shared<W> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            store: RefCell::new(SlotStore::with_capacity(capacity)),
            version: StructuralVersion::new(),
            scan: ScanMarker::default(),
        }
    }

    pub(crate) fn version(&self) -> u64 {
        self.version.current()
    }

    pub(crate) fn bump(&self) -> u64 {
        self.version.bump()
    }

    /// Run `f` with shared access to the store.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&SlotStore<W>) -> R) -> R {
        let _scan = self.scan.begin();
        let store = self.store.borrow();
        f(&*store)
    }

    /// Run `f` with exclusive access to the store. Does not bump the version;
    /// callers that change slots structurally call `bump` themselves.
    pub(crate) fn edit<R>(&self, f: impl FnOnce(&mut SlotStore<W>) -> R) -> R {
        let _scan = self.scan.begin();
        let mut store = self.store.borrow_mut();
        f(&mut *store)
    }

    /// Physical slot count, dead slots included.
    pub(crate) fn slot_len(&self) -> usize {
        self.read(|s| s.len())
    }

    pub(crate) fn sweep(&self) -> bool {
        let removed = self.edit(|s| s.sweep());
        if removed > 0 {
            tracing::trace!(removed, "swept dead weak references");
        }
        removed > 0
    }

    /// Live count: sweeps first, then counts what is left.
    pub(crate) fn len(&self) -> usize {
        self.sweep();
        self.slot_len()
    }

    pub(crate) fn contains(&self, item: Option<&W::Strong>) -> bool
    where
        W::Strong: PartialEq,
    {
        self.read(|s| s.contains(item))
    }

    /// Resolved items in slot order, after a sweep.
    pub(crate) fn to_vec(&self) -> Vec<Option<W::Strong>> {
        self.sweep();
        self.read(|s| s.resolve_all())
    }

    pub(crate) fn copy_to(
        &self,
        destination: &mut [Option<W::Strong>],
        start: usize,
    ) -> Result<(), CopyToError> {
        let len = destination.len();
        if start > len {
            return Err(CopyToError::StartOutOfRange { start, len });
        }
        let items = self.to_vec();
        let available = len - start;
        if available < items.len() {
            return Err(CopyToError::InsufficientCapacity {
                available,
                required: items.len(),
            });
        }
        for (slot, item) in destination[start..].iter_mut().zip(items) {
            *slot = item;
        }
        Ok(())
    }

    pub(crate) fn clear(&self) -> bool {
        let cleared = self.edit(|s| {
            if s.is_empty() {
                return 0;
            }
            let n = s.len();
            s.clear();
            n
        });
        if cleared == 0 {
            return false;
        }
        let version = self.bump();
        tracing::trace!(cleared, version, "cleared weak collection");
        true
    }
}
