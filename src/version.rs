//! Structural version counter.
//!
//! Bumped once per call that adds, removes or clears slots. Sweeps and
//! queries never bump it. The increment is atomic only so that a single
//! bump is never observed half-written; the containers are not `Sync`.

use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct StructuralVersion(AtomicU64);

impl StructuralVersion {
    pub(crate) const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}
