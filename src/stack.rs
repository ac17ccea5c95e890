//! Per-thread call-stack discipline.
//!
//! A [`CallStack`] turns a thread's sequence of start/stop events into a
//! properly nested tree of completed invocations. Parentage is positional:
//! the frame below the top of the stack is the top frame's parent, so frames
//! hold no back-references. On `stop`, the popped frame is converted into an
//! immutable [`MethodResult`] and attached bottom-up to the new top frame's
//! children or, when the stack empties, to the thread's completed roots.
//!
//! The stack itself does no locking: exclusivity is provided by the registry
//! slot that owns it.

use crate::error::TraceError;
use crate::ident::MethodIdent;
use crate::report::MethodResult;
use std::time::Duration;

/// An in-flight (not yet stopped) invocation.
#[derive(Debug)]
struct Frame {
    ident: MethodIdent,
    started_at: Duration,
    children: Vec<MethodResult>,
}

/// One thread's open frames plus its completed top-level invocations.
#[derive(Debug, Default)]
pub(crate) struct CallStack {
    frames: Vec<Frame>,
    roots: Vec<MethodResult>,
}

impl CallStack {
    /// Pushes a new open frame, parented to the current top of the stack.
    pub(crate) fn start(&mut self, ident: MethodIdent, now: Duration) {
        self.frames.push(Frame {
            ident,
            started_at: now,
            children: Vec::new(),
        });
    }

    /// Pops the top frame and records it as a completed invocation.
    ///
    /// Errors with an unbalanced-stop protocol violation if no frame is
    /// open; the recorded state is left untouched in that case.
    pub(crate) fn stop(&mut self, now: Duration) -> Result<(), TraceError> {
        let Some(frame) = self.frames.pop() else {
            return Err(TraceError::unbalanced_stop());
        };

        // Saturating: sub-resolution jitter must not underflow.
        let elapsed = now.saturating_sub(frame.started_at);
        let (class_name, method_name) = frame.ident.into_parts();
        let result = MethodResult {
            class_name,
            method_name,
            elapsed,
            inner: frame.children,
        };

        match self.frames.last_mut() {
            Some(parent) => parent.children.push(result),
            None => self.roots.push(result),
        }

        Ok(())
    }

    /// Completed top-level invocations recorded so far, in call order.
    pub(crate) fn completed_roots(&self) -> &[MethodResult] {
        &self.roots
    }

    /// Number of currently open frames.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}
