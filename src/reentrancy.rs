//! Debug-only reentrancy guard.
//!
//! `HashTable` calls into user code (`PartialEq` and `Hashable`) while a
//! chain is being scanned or the bucket array is being rebuilt. A user impl
//! that reaches back into the same table at that point would observe a
//! half-relocated structure, so in debug builds entering twice panics with
//! the container's name. In release builds this compiles to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-instance tracker. Embed it in a container and guard public
/// entry-points with `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    #[cfg(debug_assertions)]
    owner: &'static str,
    // Containers are single-threaded; keep the tracker !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    /// `owner` is only used in the panic message.
    pub const fn new(owner: &'static str) -> Self {
        #[cfg(not(debug_assertions))]
        let _ = owner;
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            #[cfg(debug_assertions)]
            owner,
            _nosend: PhantomData,
        }
    }

    /// Enter a guarded section.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(
                d == 0,
                "reentrancy detected: nested entry into {}",
                self.owner
            );
            self.depth.set(d + 1);
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _z: PhantomData }
        }
    }
}

impl Clone for DebugReentrancy {
    /// A clone starts outside any guarded section.
    fn clone(&self) -> Self {
        #[cfg(debug_assertions)]
        {
            Self::new(self.owner)
        }
        #[cfg(not(debug_assertions))]
        {
            Self::new("")
        }
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
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
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}
