// Wait depth: how many wait loops are live on the call stack
//
// Every delay/wait-until enters a WaitScope for its whole loop. Code the
// pump re-enters (diagnostics, the pump callback itself) can ask
// in_wait() without a flag threaded through every call.
// cs: riscv32imc has no atomic add

use core::cell::Cell;

use critical_section::Mutex;

/// The process-wide wait depth.
pub static WAIT_DEPTH: WaitDepth = WaitDepth::new();

pub struct WaitDepth {
    depth: Mutex<Cell<u32>>,
}

impl WaitDepth {
    pub const fn new() -> Self {
        Self {
            depth: Mutex::new(Cell::new(0)),
        }
    }

    /// Mark a wait loop as live until the returned scope drops.
    #[must_use = "the wait ends when the scope is dropped"]
    pub fn enter(&self) -> WaitScope<'_> {
        critical_section::with(|cs| {
            let d = self.depth.borrow(cs);
            d.set(d.get() + 1);
        });
        WaitScope { owner: self }
    }

    pub fn depth(&self) -> u32 {
        critical_section::with(|cs| self.depth.borrow(cs).get())
    }

    pub fn in_wait(&self) -> bool {
        self.depth() > 0
    }
}

impl Default for WaitDepth {
    fn default() -> Self {
        Self::new()
    }
}

/// Live wait marker. Scopes nest strictly (LIFO).
pub struct WaitScope<'a> {
    owner: &'a WaitDepth,
}

impl Drop for WaitScope<'_> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            let d = self.owner.depth.borrow(cs);
            d.set(d.get() - 1);
        });
    }
}

/// Is any wait loop (anywhere on the stack) currently pumping?
pub fn in_wait() -> bool {
    WAIT_DEPTH.in_wait()
}
