//! Immutable trace report model.
//!
//! Completed invocations are modeled as values built bottom-up: children are
//! finalized before the parent they attach to, so the finished tree holds no
//! back-references or cycles and can be handed to serializers without
//! synchronization.
//!
//! Elapsed times are kept as full-precision [`Duration`]s in memory and
//! serialized as integer milliseconds under `elapsed_ms`.

use serde::{Serialize, Serializer};
use std::time::Duration;

fn serialize_duration_ms<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = elapsed.as_millis().min(u128::from(u64::MAX)) as u64;
    serializer.serialize_u64(millis)
}

/// A completed method invocation and its nested callees.
///
/// `inner` is ordered by call order; siblings on one thread are always
/// sequential by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodResult {
    /// Declaring-type (or module) name of the invoked method.
    pub class_name: String,
    /// Name of the invoked method.
    pub method_name: String,
    /// Wall-clock time between the matched start and stop.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_duration_ms")]
    pub elapsed: Duration,
    /// Completed invocations nested directly under this one, in call order.
    pub inner: Vec<MethodResult>,
}

/// Serializable identity of a traced thread.
///
/// `std::thread::ThreadId` is opaque on stable Rust, so threads are
/// identified by the order in which they first started tracing, plus the OS
/// thread name when one was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadIdent {
    /// 1-based first-registration index within the owning tracer.
    pub ordinal: u64,
    /// The thread's name, if it had one at registration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// All completed top-level invocations recorded on one thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadResult {
    /// Identity of the thread that recorded these invocations.
    pub thread: ThreadIdent,
    /// Sum of the top-level invocations' elapsed times.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_duration_ms")]
    pub elapsed: Duration,
    /// Completed top-level invocations, in call order.
    pub methods: Vec<MethodResult>,
}

/// An immutable, point-in-time snapshot of all threads' completed trees.
///
/// Threads appear in first-registration order. A thread with an open frame
/// at snapshot time contributes only its already-completed roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceResult {
    /// One entry per thread that has started tracing, in first-start order.
    pub threads: Vec<ThreadResult>,
}

impl TraceResult {
    /// Returns the number of threads observed by this snapshot.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Returns `true` if no thread has started tracing yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Returns the sum of all threads' elapsed times.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.threads.iter().map(|thread| thread.elapsed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(class: &str, method: &str, ms: u64) -> MethodResult {
        MethodResult {
            class_name: class.to_owned(),
            method_name: method.to_owned(),
            elapsed: Duration::from_millis(ms),
            inner: Vec::new(),
        }
    }

    #[test]
    fn total_elapsed_sums_threads() {
        let result = TraceResult {
            threads: vec![
                ThreadResult {
                    thread: ThreadIdent {
                        ordinal: 1,
                        name: None,
                    },
                    elapsed: Duration::from_millis(100),
                    methods: vec![leaf("A", "a", 100)],
                },
                ThreadResult {
                    thread: ThreadIdent {
                        ordinal: 2,
                        name: Some("worker".to_owned()),
                    },
                    elapsed: Duration::from_millis(50),
                    methods: vec![leaf("B", "b", 50)],
                },
            ],
        };

        assert_eq!(result.thread_count(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.total_elapsed(), Duration::from_millis(150));
    }

    #[test]
    fn serializes_elapsed_as_millis() {
        let mut root = leaf("Example", "outer", 120);
        root.inner.push(leaf("Example", "inner", 40));

        let result = TraceResult {
            threads: vec![ThreadResult {
                thread: ThreadIdent {
                    ordinal: 1,
                    name: Some("main".to_owned()),
                },
                elapsed: Duration::from_millis(120),
                methods: vec![root],
            }],
        };

        let value = serde_json::to_value(&result).expect("report serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "threads": [{
                    "thread": { "ordinal": 1, "name": "main" },
                    "elapsed_ms": 120,
                    "methods": [{
                        "class_name": "Example",
                        "method_name": "outer",
                        "elapsed_ms": 120,
                        "inner": [{
                            "class_name": "Example",
                            "method_name": "inner",
                            "elapsed_ms": 40,
                            "inner": []
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn nameless_thread_omits_name_key() {
        let ident = ThreadIdent {
            ordinal: 3,
            name: None,
        };
        let value = serde_json::to_value(&ident).expect("ident serializes");
        assert_eq!(value, serde_json::json!({ "ordinal": 3 }));
    }

    #[test]
    fn sub_millisecond_elapsed_truncates_to_zero() {
        let value = serde_json::to_value(leaf("A", "a", 0)).expect("leaf serializes");
        assert_eq!(value["elapsed_ms"], serde_json::json!(0));
    }
}
