//! Versioned, fail-fast cursor over a weak collection.
//!
//! A cursor captures the container's structural version when it is
//! created. Every `move_next`, `current` and `reset` compares that captured
//! version with the live one and fails with `IterError::Invalidated` on a
//! mismatch. `reset` never refreshes the captured version.
//!
//! States: `NotStarted -> InProgress -> Finished`, plus `Disposed`, reachable
//! from any state through `dispose`. Once `Finished`, `move_next` keeps
//! returning `Ok(false)` until the container changes, then it fails like
//! any other call.
//!
//! On the first `move_next` the cursor snapshots the generational slot keys.
//! A sweep does not bump the version, so slots may disappear under a running
//! cursor; their keys then stop resolving and are handled like dead slots.

use crate::error::IterError;
use crate::store::Shared;
use crate::weak::{WeakElement, WeakHandle};
use slotmap::DefaultKey;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CursorState {
    NotStarted,
    InProgress,
    Finished,
    Disposed,
}

/// What the cursor does with a slot whose target is gone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DeadSlots {
    /// Keep the position and report `None` (list semantics).
    Yield,
    /// Step over it (set semantics).
    Skip,
}

enum Resolved<S> {
    Gone,
    Null,
    Target(S),
}

/// Cursor returned by `iter()` on the weak containers and their read-only view.
///
/// Besides the explicit cursor protocol, `Iter` is an [`Iterator`] yielding
/// `Ok(item)` per position. An invalidation is yielded once as `Err` and the
/// iterator then ends.
pub struct Iter<W: WeakElement> {
    shared: Rc<Shared<W>>,
    version: u64,
    dead: DeadSlots,
    state: CursorState,
    keys: Vec<DefaultKey>,
    next: usize,
    current: Option<W::Strong>,
    fused: bool,
}

impl<W: WeakElement> Iter<W> {
    /// Sweeps the container, then binds to its current version.
    pub(crate) fn new(shared: Rc<Shared<W>>, dead: DeadSlots) -> Self {
        shared.sweep();
        let version = shared.version();
        Self {
            shared,
            version,
            dead,
            state: CursorState::NotStarted,
            keys: Vec::new(),
            next: 0,
            current: None,
            fused: false,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Version of the owning container this cursor is bound to.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn check_disposed(&self) -> Result<(), IterError> {
        if self.state == CursorState::Disposed {
            return Err(IterError::Disposed);
        }
        Ok(())
    }

    fn check_version(&self) -> Result<(), IterError> {
        let live = self.shared.version();
        if live != self.version {
            tracing::debug!(captured = self.version, live, "weak collection iterator invalidated");
            return Err(IterError::Invalidated);
        }
        Ok(())
    }

    fn resolve(&self, key: DefaultKey) -> Resolved<W::Strong> {
        self.shared.read(|s| match s.get(key) {
            None => Resolved::Gone,
            Some(WeakHandle::Empty) => Resolved::Null,
            Some(WeakHandle::Live { weak, .. }) => match weak.view() {
                Some(target) => Resolved::Target(target),
                None => Resolved::Gone,
            },
        })
    }

    fn finish(&mut self) {
        self.state = CursorState::Finished;
        self.keys = Vec::new();
        self.current = None;
    }

    /// Advance to the next position. Returns `Ok(false)` once exhausted.
    pub fn move_next(&mut self) -> Result<bool, IterError> {
        self.check_disposed()?;
        self.check_version()?;
        if self.state == CursorState::Finished {
            return Ok(false);
        }

        if self.state == CursorState::NotStarted {
            self.keys = self.shared.read(|s| s.keys());
            self.next = 0;
            self.state = CursorState::InProgress;
        }

        while self.next < self.keys.len() {
            let key = self.keys[self.next];
            self.next += 1;
            match self.resolve(key) {
                Resolved::Target(target) => {
                    self.current = Some(target);
                    return Ok(true);
                }
                Resolved::Null => {
                    self.current = None;
                    return Ok(true);
                }
                Resolved::Gone => match self.dead {
                    DeadSlots::Yield => {
                        self.current = None;
                        return Ok(true);
                    }
                    DeadSlots::Skip => continue,
                },
            }
        }

        self.finish();
        Ok(false)
    }

    /// Item at the cursor. `Ok(None)` is a stored null (or, for lists, a
    /// target that died).
    pub fn current(&self) -> Result<Option<&W::Strong>, IterError> {
        self.check_disposed()?;
        self.check_version()?;
        match self.state {
            CursorState::NotStarted => Err(IterError::NotStarted),
            CursorState::Finished => Err(IterError::Finished),
            CursorState::Disposed => Err(IterError::Disposed),
            CursorState::InProgress => Ok(self.current.as_ref()),
        }
    }

    /// Rewind to `NotStarted`. Only succeeds while the container is still at
    /// the version the cursor was created with.
    pub fn reset(&mut self) -> Result<(), IterError> {
        self.check_disposed()?;
        self.check_version()?;
        self.state = CursorState::NotStarted;
        self.keys = Vec::new();
        self.next = 0;
        self.current = None;
        self.fused = false;
        Ok(())
    }

    /// Release the cursor's hold on the current item. Every later cursor
    /// operation fails with `IterError::Disposed`.
    pub fn dispose(&mut self) {
        self.state = CursorState::Disposed;
        self.keys = Vec::new();
        self.current = None;
    }
}

impl<W: WeakElement> Iterator for Iter<W> {
    type Item = Result<Option<W::Strong>, IterError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.move_next() {
            Ok(true) => Some(Ok(self.current.clone())),
            Ok(false) => None,
            Err(e) => {
                self.fused = true;
                Some(Err(e))
            }
        }
    }
}

impl<W: WeakElement> core::fmt::Debug for Iter<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("dead", &self.dead)
            .finish_non_exhaustive()
    }
}
