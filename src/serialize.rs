//! Serializers rendering a [`TraceResult`] to text.
//!
//! A serializer maps the snapshot to a complete textual document whose
//! structure mirrors the model: `TraceResult` → `ThreadResult[]` →
//! `MethodResult[]` recursively, preserving field names and nesting order.
//! Serializers only read the snapshot; they perform no I/O (see
//! [`writer`](crate::writer) for delivery).

use crate::error::TraceError;
use crate::report::{MethodResult, ThreadResult, TraceResult};
use std::fmt::Write as _;

/// Maps a [`TraceResult`] to a textual representation.
pub trait TraceSerializer {
    /// Renders the snapshot as a complete document.
    ///
    /// # Errors
    ///
    /// Returns a serialize-kind [`TraceError`] if rendering fails.
    fn serialize(&self, result: &TraceResult) -> Result<String, TraceError>;

    /// Short format label ("json", "xml") used in log lines and diagnostics.
    fn format_name(&self) -> &'static str;
}

/// JSON serializer backed by serde.
#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Creates a pretty-printing JSON serializer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Creates a single-line JSON serializer.
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSerializer for JsonSerializer {
    fn serialize(&self, result: &TraceResult) -> Result<String, TraceError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(text)
    }

    fn format_name(&self) -> &'static str {
        "json"
    }
}

/// XML serializer emitting one element per model node.
///
/// Field values are carried as attributes; nesting order matches the model.
/// A node without children renders as a self-closing element.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

impl XmlSerializer {
    /// Creates an XML serializer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_thread(out: &mut String, thread: &ThreadResult, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = write!(out, "{pad}<thread ordinal=\"{}\"", thread.thread.ordinal);
        if let Some(name) = &thread.thread.name {
            let _ = write!(out, " name=\"{}\"", escape_xml(name));
        }
        let _ = write!(out, " elapsed_ms=\"{}\"", thread.elapsed.as_millis());

        if thread.methods.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push_str(">\n");
        for method in &thread.methods {
            Self::write_method(out, method, indent + 1);
        }
        let _ = writeln!(out, "{pad}</thread>");
    }

    fn write_method(out: &mut String, method: &MethodResult, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = write!(
            out,
            "{pad}<method class_name=\"{}\" method_name=\"{}\" elapsed_ms=\"{}\"",
            escape_xml(&method.class_name),
            escape_xml(&method.method_name),
            method.elapsed.as_millis()
        );

        if method.inner.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push_str(">\n");
        for child in &method.inner {
            Self::write_method(out, child, indent + 1);
        }
        let _ = writeln!(out, "{pad}</method>");
    }
}

impl TraceSerializer for XmlSerializer {
    fn serialize(&self, result: &TraceResult) -> Result<String, TraceError> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        if result.threads.is_empty() {
            out.push_str("<trace_result/>\n");
            return Ok(out);
        }

        out.push_str("<trace_result>\n");
        for thread in &result.threads {
            Self::write_thread(&mut out, thread, 1);
        }
        out.push_str("</trace_result>\n");
        Ok(out)
    }

    fn format_name(&self) -> &'static str {
        "xml"
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
