//! Method identity resolution.
//!
//! Stable Rust offers no reliable way for a callee to inspect its caller's
//! frame, so identity is resolved at the call site instead: the
//! [`method_ident!`](crate::method_ident) macro expands *inside the caller's
//! function body* and captures the enclosing function's type path at compile
//! time via `core::any::type_name` on a nested anchor fn. The caller still
//! never spells out its own name.
//!
//! Resolution degrades, it never fails: a path that cannot be parsed yields
//! the [`UNKNOWN`] placeholder for both fields, and tracing proceeds
//! normally. Timing and nesting never depend on identity resolution.

use std::fmt;

/// Placeholder used for both identity fields when resolution degrades.
pub const UNKNOWN: &str = "<unknown>";

/// The resolved identity of an instrumented method.
///
/// `class_name` is the best-known declaring scope: the `impl` type for
/// methods, the enclosing module's last path segment for free functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodIdent {
    class_name: String,
    method_name: String,
}

impl MethodIdent {
    /// Creates an identity from explicit names.
    #[must_use]
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }

    /// The placeholder identity used when resolution degrades.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// Parses an identity out of a function type path as produced by
    /// `core::any::type_name` on a fn item nested in the instrumented
    /// function (e.g. `app::worker::Pool::drain::__ident_anchor`).
    ///
    /// The trailing anchor segment and any `{{closure}}` segments are
    /// stripped; per-segment generic arguments are dropped. The last
    /// remaining segment is the method name, the one before it the declaring
    /// scope. Anything unparseable degrades to [`MethodIdent::unknown`].
    #[must_use]
    pub fn from_fn_path(path: &str) -> Self {
        let mut segments: Vec<&str> = path
            .split("::")
            .map(|segment| segment.split('<').next().unwrap_or(segment))
            .filter(|segment| !segment.is_empty() && *segment != "{{closure}}")
            .collect();

        if segments.last() == Some(&"__ident_anchor") {
            segments.pop();
        }

        match segments.as_slice() {
            [] => Self::unknown(),
            [method] => Self::new(UNKNOWN, *method),
            [.., class, method] => Self::new(*class, *method),
        }
    }

    /// Returns the declaring-type (or module) name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Returns `true` if both fields are the degradation placeholder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.class_name == UNKNOWN && self.method_name == UNKNOWN
    }

    /// Consumes the identity, yielding `(class_name, method_name)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.class_name, self.method_name)
    }
}

impl fmt::Display for MethodIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class_name, self.method_name)
    }
}

/// Resolves the [`MethodIdent`] of the function this macro expands in.
///
/// Expansion plants an anchor fn inside the caller's body and reads its type
/// path, so the identity is known at compile time and the caller passes no
/// names.
#[macro_export]
macro_rules! method_ident {
    () => {{
        fn __ident_anchor() {}
        fn __path_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::MethodIdent::from_fn_path(__path_of(__ident_anchor))
    }};
}

/// Records entry into the enclosing function on the given tracer.
///
/// Equivalent to `tracer.start_trace(method_ident!())`; pair it with
/// [`Tracer::stop_trace`](crate::Tracer::stop_trace) on every exit path.
#[macro_export]
macro_rules! start_trace {
    ($tracer:expr) => {
        $tracer.start_trace($crate::method_ident!())
    };
}
