//! Demonstration program for the calltrace tracer.
//!
//! Runs a small instrumented workload — a simple method, a layered method
//! calling into it, and a parallel method fanning out onto worker threads —
//! then writes the resulting snapshot as JSON or XML to stdout or a file.

use calltrace::{
    ConsoleWriter, FileWriter, JsonSerializer, TraceSerializer, TraceWriter, Tracer,
    XmlSerializer, start_trace,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "calltrace", about = "Trace a demo workload and print the call trees")]
struct Args {
    /// Output format for the trace snapshot.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the snapshot to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Xml,
}

fn simple_method(tracer: &Tracer) {
    start_trace!(tracer);
    thread::sleep(Duration::from_millis(25));
    tracer.stop_trace().expect("balanced stop");
}

fn layered_method(tracer: &Tracer) {
    start_trace!(tracer);
    simple_method(tracer);
    simple_method(tracer);
    thread::sleep(Duration::from_millis(40));
    tracer.stop_trace().expect("balanced stop");
}

fn deep_method(tracer: &Tracer) {
    start_trace!(tracer);
    simple_method(tracer);
    layered_method(tracer);
    layered_method(tracer);
    thread::sleep(Duration::from_millis(40));
    tracer.stop_trace().expect("balanced stop");
}

fn parallel_method(tracer: &Tracer) {
    start_trace!(tracer);

    let workers: Vec<thread::JoinHandle<()>> = [
        ("worker-simple", simple_method as fn(&Tracer)),
        ("worker-layered", layered_method),
        ("worker-deep", deep_method),
    ]
    .into_iter()
    .map(|(name, work)| {
        let tracer = tracer.clone();
        thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || work(&tracer))
            .expect("spawn worker thread")
    })
    .collect();

    for worker in workers {
        worker.join().expect("worker thread completes");
    }

    thread::sleep(Duration::from_millis(25));
    tracer.stop_trace().expect("balanced stop");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let tracer = Tracer::new();
    parallel_method(&tracer);

    let result = tracer.trace_result();
    let serializer: Box<dyn TraceSerializer> = match args.format {
        Format::Json => Box::new(JsonSerializer::new()),
        Format::Xml => Box::new(XmlSerializer::new()),
    };

    match &args.out {
        Some(path) => FileWriter::new(path).write(&result, serializer.as_ref())?,
        None => ConsoleWriter::new().write(&result, serializer.as_ref())?,
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("calltrace: {err}");
        std::process::exit(1);
    }
}
