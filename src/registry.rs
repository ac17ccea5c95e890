//! Thread registry and snapshot assembly.
//!
//! The registry is the only structure touched by more than one thread. It
//! maps `std::thread::ThreadId` to a per-thread slot and remembers
//! first-registration order. The map is mutated only when a thread starts
//! tracing for the first time; steady-state lookups take the read lock and
//! never contend with each other.
//!
//! Each slot's call stack sits behind its own mutex. Only the owning thread
//! mutates it, so the lock is uncontended except for the brief moment a
//! snapshot copies the slot's completed roots (copy-then-read: the snapshot
//! clones the ordered slot list under the read lock, releases it, then
//! visits slots one at a time).
//!
//! A registry is owned by its tracer instance. It is never a process-wide
//! singleton, so independent tracers observe disjoint sets of threads.

use crate::report::{ThreadIdent, ThreadResult, TraceResult};
use crate::stack::CallStack;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// One thread's registry entry: immutable identity plus its call stack.
#[derive(Debug)]
pub(crate) struct ThreadSlot {
    ident: ThreadIdent,
    stack: Mutex<CallStack>,
}

impl ThreadSlot {
    fn new(ordinal: u64, name: Option<String>) -> Self {
        Self {
            ident: ThreadIdent { ordinal, name },
            stack: Mutex::new(CallStack::default()),
        }
    }

    /// The registration identity of the owning thread.
    pub(crate) fn ident(&self) -> &ThreadIdent {
        &self.ident
    }

    /// Locks the slot's call stack.
    pub(crate) fn lock(&self) -> MutexGuard<'_, CallStack> {
        self.stack.lock()
    }

    /// Copies the slot's completed roots into an immutable per-thread result.
    ///
    /// An open frame contributes nothing; a slot with no completed roots
    /// yields an empty result with zero elapsed.
    fn to_thread_result(&self) -> ThreadResult {
        let stack = self.stack.lock();
        let methods = stack.completed_roots().to_vec();
        drop(stack);

        let elapsed = methods.iter().map(|method| method.elapsed).sum();
        ThreadResult {
            thread: self.ident.clone(),
            elapsed,
            methods,
        }
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_id: HashMap<ThreadId, Arc<ThreadSlot>>,
    /// Slots in first-registration order; drives snapshot ordering.
    order: Vec<Arc<ThreadSlot>>,
}

/// Concurrency-safe mapping from thread identity to that thread's slot.
#[derive(Debug, Default)]
pub(crate) struct ThreadRegistry {
    inner: RwLock<RegistryInner>,
}

impl ThreadRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the calling thread's slot, registering it on first use.
    ///
    /// Registration double-checks under the write lock: two threads racing
    /// their first `start_trace` both end up with distinct slots, and a
    /// thread racing itself against a concurrent registration keeps the slot
    /// inserted first.
    pub(crate) fn slot_for_current(&self) -> Arc<ThreadSlot> {
        let current = thread::current();
        let id = current.id();

        if let Some(slot) = self.inner.read().by_id.get(&id) {
            return Arc::clone(slot);
        }

        let mut inner = self.inner.write();
        if let Some(slot) = inner.by_id.get(&id) {
            return Arc::clone(slot);
        }

        let ordinal = inner.order.len() as u64 + 1;
        let slot = Arc::new(ThreadSlot::new(ordinal, current.name().map(str::to_owned)));
        inner.by_id.insert(id, Arc::clone(&slot));
        inner.order.push(Arc::clone(&slot));
        tracing::debug!(ordinal, name = ?slot.ident().name, "registered tracing thread");
        slot
    }

    /// Returns the calling thread's slot only if it has already registered.
    ///
    /// Used by `stop_trace`: a stop on a never-registered thread is a
    /// protocol violation and must not create a registry entry.
    pub(crate) fn existing_slot_for_current(&self) -> Option<Arc<ThreadSlot>> {
        let id = thread::current().id();
        self.inner.read().by_id.get(&id).map(Arc::clone)
    }

    /// Materializes an immutable snapshot of all registered threads.
    pub(crate) fn snapshot(&self) -> TraceResult {
        let slots: Vec<Arc<ThreadSlot>> = self.inner.read().order.to_vec();

        let threads = slots.iter().map(|slot| slot.to_thread_result()).collect();
        TraceResult { threads }
    }
}
