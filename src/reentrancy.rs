//! Debug-only reentrancy guard.
//!
//! `ChainedHashMap` calls into user code only through `K: Hash` and `K: Eq`.
//! If such a callback reaches back into the same map while a chain is being
//! walked or relinked, the guard panics in debug builds and reports which
//! operation was interrupted. Release builds compile it away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map tracker; public methods open a section with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Sync in every build profile; Send so a map can move into a Mutex.
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosync: PhantomData,
        }
    }

    /// Enter a guarded section for `op`. Debug builds panic if another
    /// section of the same tracker is still open.
    #[inline]
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    pub fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrancy detected: `{op}` called while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes the section on drop.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
