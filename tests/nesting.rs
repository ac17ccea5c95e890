//! Nesting properties: an instrumented method invoked inside another traced
//! section becomes a child of it, with identity resolved from the call site
//! and child timing contained in the parent's.

use calltrace::{Tracer, start_trace};
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_millis(50);

fn outer_method(tracer: &Tracer) {
    start_trace!(tracer);
    inner_method(tracer);
    tracer.stop_trace().expect("balanced stop");
}

fn inner_method(tracer: &Tracer) {
    start_trace!(tracer);
    thread::sleep(WAIT);
    tracer.stop_trace().expect("balanced stop");
}

#[test]
fn nested_invocation_becomes_single_child() {
    let tracer = Tracer::new();
    outer_method(&tracer);

    let result = tracer.trace_result();
    assert_eq!(result.thread_count(), 1);

    let roots = &result.threads[0].methods;
    assert_eq!(roots.len(), 1);

    let outer = &roots[0];
    assert_eq!(outer.method_name, "outer_method");
    assert_eq!(outer.inner.len(), 1);

    let inner = &outer.inner[0];
    assert_eq!(inner.method_name, "inner_method");
    assert_eq!(inner.class_name, "nesting");
    assert!(inner.inner.is_empty());

    assert!(outer.elapsed >= inner.elapsed);
    assert!(inner.elapsed >= WAIT);
}

#[test]
fn sequential_siblings_keep_call_order() {
    let tracer = Tracer::new();

    start_trace!(tracer);
    inner_method(&tracer);
    inner_method(&tracer);
    tracer.stop_trace().expect("balanced stop");

    let result = tracer.trace_result();
    let root = &result.threads[0].methods[0];
    assert_eq!(root.inner.len(), 2);
    assert!(root.inner.iter().all(|child| child.method_name == "inner_method"));
    assert!(root.elapsed >= root.inner[0].elapsed + root.inner[1].elapsed);
}
