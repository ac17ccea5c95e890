//! Writers delivering serialized traces to a sink.
//!
//! A writer pairs a snapshot with a [`TraceSerializer`] and delivers the
//! rendered text to its sink: standard output or a file path.

use crate::error::{TraceError, TraceErrorKind};
use crate::report::TraceResult;
use crate::serialize::TraceSerializer;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

/// Delivers a serialized [`TraceResult`] to a sink.
pub trait TraceWriter {
    /// Serializes `result` and writes it to the sink.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures and io-kind [`TraceError`]s from the
    /// sink.
    fn write(
        &self,
        result: &TraceResult,
        serializer: &dyn TraceSerializer,
    ) -> Result<(), TraceError>;
}

/// Writes serialized traces to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter;

impl ConsoleWriter {
    /// Creates a console writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TraceWriter for ConsoleWriter {
    fn write(
        &self,
        result: &TraceResult,
        serializer: &dyn TraceSerializer,
    ) -> Result<(), TraceError> {
        let text = serializer.serialize(result)?;
        tracing::debug!(format = serializer.format_name(), "writing trace to stdout");

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
        handle.flush()?;
        Ok(())
    }
}

/// Writes serialized traces to a file, replacing any existing content.
#[derive(Debug, Clone)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    /// Creates a file writer targeting `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceWriter for FileWriter {
    fn write(
        &self,
        result: &TraceResult,
        serializer: &dyn TraceSerializer,
    ) -> Result<(), TraceError> {
        let text = serializer.serialize(result)?;
        tracing::debug!(
            format = serializer.format_name(),
            path = %self.path.display(),
            "writing trace to file"
        );

        fs::write(&self.path, text).map_err(|err| {
            TraceError::new(TraceErrorKind::Io)
                .with_context(format!("{}: {err}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{MethodResult, ThreadIdent, ThreadResult};
    use crate::serialize::{JsonSerializer, XmlSerializer};
    use std::time::Duration;

    fn sample() -> TraceResult {
        TraceResult {
            threads: vec![ThreadResult {
                thread: ThreadIdent {
                    ordinal: 1,
                    name: None,
                },
                elapsed: Duration::from_millis(5),
                methods: vec![MethodResult {
                    class_name: "Example".to_owned(),
                    method_name: "run".to_owned(),
                    elapsed: Duration::from_millis(5),
                    inner: Vec::new(),
                }],
            }],
        }
    }

    #[test]
    fn file_writer_round_trips_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("trace.json");

        FileWriter::new(&path)
            .write(&sample(), &JsonSerializer::compact())
            .expect("file write succeeds");

        let text = fs::read_to_string(&path).expect("written file readable");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["threads"][0]["methods"][0]["method_name"], "run");
    }

    #[test]
    fn file_writer_replaces_existing_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("trace.xml");
        fs::write(&path, "stale").expect("seed file");

        FileWriter::new(&path)
            .write(&sample(), &XmlSerializer::new())
            .expect("file write succeeds");

        let text = fs::read_to_string(&path).expect("written file readable");
        assert!(!text.contains("stale"));
        assert!(text.contains("<trace_result>"));
    }

    #[test]
    fn file_writer_error_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing-dir").join("trace.json");

        let err = FileWriter::new(&path)
            .write(&sample(), &JsonSerializer::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing-dir"));
    }

    #[test]
    fn console_writer_accepts_snapshot() {
        ConsoleWriter::new()
            .write(&sample(), &JsonSerializer::compact())
            .expect("stdout write succeeds");
    }
}
