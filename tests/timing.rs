//! Wall-clock timing properties: recorded elapsed time covers the traced
//! sleep, on one thread and across independent threads.

use calltrace::{Tracer, start_trace};
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_millis(50);
const THREADS: usize = 4;

fn timed_method(tracer: &Tracer) {
    start_trace!(tracer);
    thread::sleep(WAIT);
    tracer.stop_trace().expect("balanced stop");
}

#[test]
fn single_thread_elapsed_covers_sleep() {
    let tracer = Tracer::new();
    timed_method(&tracer);

    let result = tracer.trace_result();
    assert_eq!(result.thread_count(), 1);
    assert!(result.threads[0].elapsed >= WAIT);
}

#[test]
fn independent_threads_accumulate_elapsed() {
    let tracer = Tracer::new();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let tracer = tracer.clone();
            thread::spawn(move || timed_method(&tracer))
        })
        .collect();
    for handle in handles {
        handle.join().expect("traced thread completes");
    }

    let result = tracer.trace_result();
    assert_eq!(result.thread_count(), THREADS);
    assert!(result.total_elapsed() >= WAIT * THREADS as u32);
}

#[test]
fn thread_elapsed_is_sum_of_its_roots() {
    let tracer = Tracer::new();
    timed_method(&tracer);
    timed_method(&tracer);

    let result = tracer.trace_result();
    assert_eq!(result.thread_count(), 1);
    let thread = &result.threads[0];
    assert_eq!(thread.methods.len(), 2);
    let sum: Duration = thread.methods.iter().map(|method| method.elapsed).sum();
    assert_eq!(thread.elapsed, sum);
}
