//! weak-collections: list and set containers that hold weak references,
//! sweep reclaimed entries lazily and hand out fail-fast cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: containers that never extend the lifetime of what they hold,
//!   while still behaving like ordinary collections (count, containment,
//!   copy-out, iteration) for code written against collection contracts.
//! - Layers:
//!   - `WeakElement`: capability over a runtime weak pointer
//!     (`rc::Weak`, `sync::Weak`): downgrade, try-resolve, expiry test.
//!   - `WeakHandle`: one slot, either a stored null (`Empty`) or a weak
//!     pointer (`Live`). A dead `Live` slot is not a null.
//!   - `SlotStore`: generational slot storage plus insertion order; knows
//!     how to scan, retain and sweep.
//!   - `Shared`: store + structural version + scan marker, behind an
//!     `Rc` so containers, cursors and read-only views share one state.
//!   - `WeakList` / `WeakSet`: the public containers. `Iter` is the
//!     versioned cursor; `ReadOnlyWeakCollection` the narrowed view.
//!
//! Constraints
//! - Single-threaded: containers are `!Send`/`!Sync` (they sit on `Rc` and
//!   `RefCell`). The version counter is atomic only so that one increment
//!   cannot be observed torn; it is not a locking discipline.
//! - No hashing of weak slots. Membership is a linear scan that resolves
//!   each slot and compares with the item's `PartialEq`.
//! - No operation blocks or allocates per slot beyond the store itself.
//!
//! Structural version vs. sweeping
//! - The version is bumped once per call that adds, removes or clears
//!   slots, and only when something actually changed.
//! - A referent dying never bumps it. Neither does a sweep, even though a
//!   sweep physically drops slots. `len`, `is_empty`, `iter`, `to_vec` and
//!   `copy_to` sweep first; `contains` and `remove` only skip dead slots.
//!
//! Cursors
//! - `iter()` sweeps, then binds a cursor to the current version. Any later
//!   structural change makes `move_next`/`current`/`reset` fail with
//!   `IterError::Invalidated`; there is no silent resync.
//! - Mutators take `&self`, so the borrow checker does not forbid mutating
//!   while a cursor is alive; the version check catches it at runtime.
//! - Lists keep positions: a target that dies mid-iteration reads as
//!   `None`. Sets skip such slots.
//!
//! Reentrancy policy
//! - User `PartialEq` runs while the store is borrowed. Calling back into
//!   the same container from there is a bug; debug builds panic with a
//!   dedicated message, release builds hit the `RefCell` borrow check.
//!
//! Notes and non-goals
//! - No ordering guarantee for `WeakSet` (it happens to be insertion order).
//! - No persistence, no cross-thread sharing.
//! - `Resurrection` is recorded per slot, but `std` weak pointers never
//!   observe a resurrected target, so both policies resolve identically.

mod collection;
mod cursor;
mod error;
mod read_only;
mod store;
mod version;
mod weak;
mod weak_list;
mod weak_set;
mod weak_set_proptest;

// Public surface
pub use collection::{WeakCollection, WeakCollectionView};
pub use cursor::{CursorState, Iter};
pub use error::{CopyToError, IterError};
pub use read_only::ReadOnlyWeakCollection;
pub use weak::{Resurrection, WeakElement};
pub use weak_list::WeakList;
pub use weak_set::WeakSet;
