//! Re-entry guards.
//!
//! A wait pumps the main loop, and the main loop may call straight back
//! into the function that is waiting. A [`ReentryGuard`] counts how
//! deep a call site (or one object's method) currently is; a
//! [`ReentryScope`] bumps that count for its lifetime and remembers
//! whether it was the outermost entry.
//!
//! Three shapes:
//!
//! ```ignore
//! fn refresh() {
//!     reentry_guard!();              // whole function, `return;` when nested
//!     ...
//! }
//!
//! fn poll_sd() -> bool {
//!     reentry_guard!(false);         // return a sentinel when nested
//!     ...
//! }
//!
//! fn tick() {
//!     reentry_enter!(flush);         // block scope, named
//!     if !flush.is_reentered() {
//!         flush_bookmarks();
//!     }
//!     update_statusbar();            // still runs when nested
//! }
//!
//! impl Sensor {
//!     fn sample(&self) {
//!         reentry_guard_obj!(self.guard); // one count per instance
//!         ...
//!     }
//! }
//! ```
//!
//! Counts are restored exactly when a scope drops, including on early
//! return and unwind. Guards are neither `Clone` nor `Copy`, and a live
//! scope borrows its guard so the guard can't move out from under it.

use core::cell::Cell;

use critical_section::Mutex;
use log::trace;

pub struct ReentryGuard {
    depth: Mutex<Cell<u32>>,
}

impl ReentryGuard {
    pub const fn new() -> Self {
        Self {
            depth: Mutex::new(Cell::new(0)),
        }
    }

    #[must_use = "the guard is released when the scope is dropped"]
    pub fn enter(&self) -> ReentryScope<'_> {
        let depth = critical_section::with(|cs| {
            let d = self.depth.borrow(cs);
            let n = d.get() + 1;
            d.set(n);
            n
        });
        let reentered = depth > 1;
        if reentered {
            trace!("re-entered guarded section (depth {})", depth);
        }
        ReentryScope {
            guard: self,
            reentered,
        }
    }

    pub fn depth(&self) -> u32 {
        critical_section::with(|cs| self.depth.borrow(cs).get())
    }

    /// At least one scope on this guard is live.
    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }
}

impl Default for ReentryGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReentryScope<'a> {
    guard: &'a ReentryGuard,
    reentered: bool,
}

impl ReentryScope<'_> {
    /// True if another scope on the same guard was already live when
    /// this one was created. Fixed at creation.
    #[must_use]
    pub fn is_reentered(&self) -> bool {
        self.reentered
    }
}

impl Drop for ReentryScope<'_> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            let d = self.guard.depth.borrow(cs);
            d.set(d.get() - 1);
        });
    }
}

/// Guard the rest of the enclosing function with a call-site guard.
///
/// Each expansion owns its own `static` counter, shared by every call
/// through that site. On re-entry the function returns immediately,
/// with the given value if one is supplied.
#[macro_export]
macro_rules! reentry_guard {
    ($($ret:expr)?) => {
        let __reentry_scope = {
            static GUARD: $crate::kernel::reentry::ReentryGuard =
                $crate::kernel::reentry::ReentryGuard::new();
            GUARD.enter()
        };
        if __reentry_scope.is_reentered() {
            return $($ret)?;
        }
    };
}

/// Bind a named call-site scope without returning; check
/// `name.is_reentered()` to skip just the sensitive part.
#[macro_export]
macro_rules! reentry_enter {
    ($name:ident) => {
        let $name = {
            static GUARD: $crate::kernel::reentry::ReentryGuard =
                $crate::kernel::reentry::ReentryGuard::new();
            GUARD.enter()
        };
    };
}

/// Like [`reentry_guard!`] but counted on a caller-owned guard, e.g. a
/// field, so each instance is tracked independently.
#[macro_export]
macro_rules! reentry_guard_obj {
    ($guard:expr $(, $ret:expr)?) => {
        let __reentry_scope = $crate::kernel::reentry::ReentryGuard::enter(&$guard);
        if __reentry_scope.is_reentered() {
            return $($ret)?;
        }
    };
}
