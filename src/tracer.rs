//! The tracer facade.
//!
//! A [`Tracer`] owns one thread registry and one time source behind an
//! `Arc`, so handles clone cheaply and can be shared across the threads
//! being traced. Independent tracer instances share nothing: each observes
//! only the threads that traced through it.

use crate::clock::{TimeSource, WallClock};
use crate::error::TraceError;
use crate::ident::MethodIdent;
use crate::registry::ThreadRegistry;
use crate::report::TraceResult;
use std::fmt;
use std::sync::Arc;

struct TracerInner {
    registry: ThreadRegistry,
    clock: Arc<dyn TimeSource>,
}

/// Measures wall-clock duration of instrumented invocations and
/// reconstructs, per thread, their nesting structure.
///
/// # Example
///
/// ```
/// use calltrace::{Tracer, start_trace};
///
/// fn work(tracer: &Tracer) {
///     start_trace!(tracer);
///     // ... the traced section ...
///     tracer.stop_trace().expect("balanced stop");
/// }
///
/// let tracer = Tracer::new();
/// work(&tracer);
/// let result = tracer.trace_result();
/// assert_eq!(result.thread_count(), 1);
/// assert_eq!(result.threads[0].methods[0].method_name, "work");
/// ```
#[derive(Clone)]
pub struct Tracer {
    inner: Arc<TracerInner>,
}

impl Tracer {
    /// Creates a tracer backed by the monotonic wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring the tracer.
    #[must_use]
    pub fn builder() -> TracerBuilder {
        TracerBuilder::default()
    }

    /// Records entry into a method on the calling thread.
    ///
    /// The new frame is parented to the thread's current innermost open
    /// frame, if any. Use [`start_trace!`](crate::start_trace) to resolve
    /// `ident` from the call site without naming it.
    pub fn start_trace(&self, ident: MethodIdent) {
        let slot = self.inner.registry.slot_for_current();
        let mut stack = slot.lock();
        let now = self.inner.clock.now();
        tracing::trace!(%ident, depth = stack.depth(), "start trace");
        stack.start(ident, now);
    }

    /// Records exit from the most recently entered, not-yet-exited method on
    /// the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an unbalanced-stop [`TraceError`] if no frame is open on this
    /// thread. The violation affects neither other threads' state nor
    /// results already recorded on this thread.
    pub fn stop_trace(&self) -> Result<(), TraceError> {
        let now = self.inner.clock.now();
        let Some(slot) = self.inner.registry.existing_slot_for_current() else {
            tracing::warn!("stop_trace on a thread that never started a trace");
            return Err(
                TraceError::unbalanced_stop().with_context("thread never started a trace")
            );
        };
        let mut stack = slot.lock();
        match stack.stop(now) {
            Ok(()) => {
                tracing::trace!(depth = stack.depth(), "stop trace");
                Ok(())
            }
            Err(err) => {
                drop(stack);
                tracing::warn!(
                    thread = slot.ident().ordinal,
                    "stop_trace without matching start_trace"
                );
                Err(err.with_context(format!("thread #{}", slot.ident().ordinal)))
            }
        }
    }

    /// Returns an immutable snapshot of all threads' completed trace trees.
    ///
    /// Threads appear in first-start order. Open frames are excluded; they
    /// surface in a later snapshot once stopped. The call never blocks
    /// ongoing tracing beyond briefly copying each thread's completed roots.
    #[must_use]
    pub fn trace_result(&self) -> TraceResult {
        let result = self.inner.registry.snapshot();
        tracing::debug!(threads = result.thread_count(), "assembled trace snapshot");
        result
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("clock", &format_args!("Arc<dyn TimeSource>(..)"))
            .finish_non_exhaustive()
    }
}

/// Configures and builds [`Tracer`]s.
#[derive(Default)]
pub struct TracerBuilder {
    time_source: Option<Arc<dyn TimeSource>>,
}

impl TracerBuilder {
    /// Creates a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time source used for all timestamps.
    ///
    /// Defaults to [`WallClock`]. Tests typically pass a
    /// [`ManualClock`](crate::ManualClock) to assert exact elapsed values.
    #[must_use]
    pub fn time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(source);
        self
    }

    /// Builds the tracer.
    #[must_use]
    pub fn build(self) -> Tracer {
        Tracer {
            inner: Arc::new(TracerInner {
                registry: ThreadRegistry::new(),
                clock: self
                    .time_source
                    .unwrap_or_else(|| Arc::new(WallClock::new())),
            }),
        }
    }
}

impl fmt::Debug for TracerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracerBuilder")
            .field("time_source", &self.time_source.is_some())
            .finish()
    }
}
