//! Calltrace: an in-process wall-clock tracer for concurrent code.
//!
//! # Overview
//!
//! Calltrace measures the wall-clock duration of instrumented method
//! invocations across concurrently executing threads and reconstructs, per
//! thread, the nesting structure of those invocations as a tree — "who
//! called whom, for how long."
//!
//! Instrumentation is a matched pair: [`start_trace!`] on entry (the macro
//! resolves the enclosing method's identity at the call site, so nothing is
//! spelled out by hand) and [`Tracer::stop_trace`] on exit. A
//! [`Tracer::trace_result`] call assembles an immutable snapshot of every
//! thread's completed call trees, ready to hand to a serializer.
//!
//! # Core Guarantees
//!
//! - **Strict nesting**: per thread, start/stop obey stack discipline; a
//!   stop always completes the most recently started open frame
//! - **No cross-thread contention in steady state**: each thread's stack is
//!   exclusively owned; only first registration takes the shared write lock
//! - **Instance isolation**: tracers share no state; independent instances
//!   never observe each other's threads
//! - **Hard-fail protocol violations**: an unmatched stop is surfaced as an
//!   error at the call site, never silently absorbed
//! - **Pure value snapshots**: results are bottom-up immutable trees with no
//!   back-references, safe to serialize without synchronization
//!
//! # Module Structure
//!
//! - [`ident`]: call-site method identity resolution
//! - [`clock`]: pluggable time sources (wall clock, manual test clock)
//! - [`report`]: the immutable result model
//! - [`error`]: error taxonomy
//! - [`serialize`]: JSON and XML serializers
//! - [`writer`]: console and file writers
//!
//! # Example
//!
//! ```
//! use calltrace::{JsonSerializer, Tracer, start_trace};
//!
//! fn handle_request(tracer: &Tracer) {
//!     start_trace!(tracer);
//!     load_payload(tracer);
//!     tracer.stop_trace().expect("balanced stop");
//! }
//!
//! fn load_payload(tracer: &Tracer) {
//!     start_trace!(tracer);
//!     tracer.stop_trace().expect("balanced stop");
//! }
//!
//! let tracer = Tracer::new();
//! handle_request(&tracer);
//!
//! let result = tracer.trace_result();
//! assert_eq!(result.threads[0].methods[0].method_name, "handle_request");
//! assert_eq!(result.threads[0].methods[0].inner[0].method_name, "load_payload");
//! # let _ = calltrace::TraceSerializer::serialize(&JsonSerializer::new(), &result);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod ident;
pub mod report;
pub mod serialize;
pub mod writer;

mod registry;
mod stack;
mod tracer;

pub use clock::{ManualClock, TimeSource, WallClock};
pub use error::{TraceError, TraceErrorKind};
pub use ident::{MethodIdent, UNKNOWN};
pub use report::{MethodResult, ThreadIdent, ThreadResult, TraceResult};
pub use serialize::{JsonSerializer, TraceSerializer, XmlSerializer};
pub use tracer::{Tracer, TracerBuilder};
pub use writer::{ConsoleWriter, FileWriter, TraceWriter};
