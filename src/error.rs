//! Error types for tracing operations.
//!
//! The only failure the engine itself can produce is a protocol violation:
//! a `stop_trace` with no matching open frame on the calling thread. The
//! serializer and writer surfaces add rendering and delivery failures.
//! Identity-resolution degradation and snapshots taken while frames are
//! still open are not errors.

use std::fmt;
use std::io;

/// The kind of tracing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceErrorKind {
    /// `stop_trace` was called with no open frame on the calling thread.
    ///
    /// Accepting the call would silently misattribute timing to the
    /// mis-paired ancestor frame, so it is surfaced at the call site
    /// instead. Other threads' state is unaffected.
    UnbalancedStop,
    /// A serializer failed to render a snapshot.
    Serialize,
    /// A writer failed to deliver serialized output to its sink.
    Io,
}

/// An error from a tracing, serialization, or writing operation.
///
/// # Example
///
/// ```
/// use calltrace::Tracer;
///
/// let tracer = Tracer::new();
/// let err = tracer.stop_trace().unwrap_err();
/// assert!(err.is_unbalanced_stop());
/// ```
#[derive(Debug, Clone)]
pub struct TraceError {
    kind: TraceErrorKind,
    context: Option<String>,
}

impl TraceError {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: TraceErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Creates an unbalanced-stop protocol violation.
    #[must_use]
    pub const fn unbalanced_stop() -> Self {
        Self::new(TraceErrorKind::UnbalancedStop)
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> TraceErrorKind {
        self.kind
    }

    /// Returns `true` if this is an unbalanced-stop protocol violation.
    #[must_use]
    pub const fn is_unbalanced_stop(&self) -> bool {
        matches!(self.kind, TraceErrorKind::UnbalancedStop)
    }

    /// Adds context to the error.
    #[must_use]
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    /// Returns the error context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            TraceErrorKind::UnbalancedStop => {
                "stop_trace called with no matching start_trace on this thread"
            }
            TraceErrorKind::Serialize => "failed to serialize trace result",
            TraceErrorKind::Io => "failed to write trace result",
        };

        write!(f, "{msg}")?;

        if let Some(ctx) = &self.context {
            write!(f, ": {ctx}")?;
        }

        Ok(())
    }
}

impl std::error::Error for TraceError {}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        Self::new(TraceErrorKind::Io).with_context(err.to_string())
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(TraceErrorKind::Serialize).with_context(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_stop_kind_and_predicate() {
        let err = TraceError::unbalanced_stop();
        assert_eq!(err.kind(), TraceErrorKind::UnbalancedStop);
        assert!(err.is_unbalanced_stop());
    }

    #[test]
    fn with_context_shows_in_display() {
        let err = TraceError::unbalanced_stop().with_context("thread #3");
        assert_eq!(err.context(), Some("thread #3"));

        let display = err.to_string();
        assert!(display.contains("no matching start_trace"));
        assert!(display.contains("thread #3"));
    }

    #[test]
    fn io_error_converts_with_message() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = TraceError::from(io_err);
        assert_eq!(err.kind(), TraceErrorKind::Io);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn display_per_kind() {
        assert!(
            TraceError::new(TraceErrorKind::Serialize)
                .to_string()
                .contains("serialize")
        );
        assert!(
            TraceError::new(TraceErrorKind::Io)
                .to_string()
                .contains("write")
        );
    }
}
