//! Turns sampled transaction JSON into an indented, titled document.
//!
//! The output is framework-neutral: a flat list of [`DocLine`]s carrying an
//! indentation depth. The terminal UI styles them; [`Document::to_markdown`]
//! gives a plain-text form used by tests and exports.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use super::record::TransactionRecord;

/// Key whose value is rendered as `(event_id, event_signature)` pairs
const LOGS_KEY: &str = "logs";
const UNKNOWN_HASH: &str = "Unknown Hash";
pub const NO_DATA_MESSAGE: &str = "No data available.";

/// `tx_hash` -> `Tx Hash`, `event_id` -> `Event Id`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// What a JSON value is rendered as.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Scalar(&'a Value),
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    /// Anything reached under the `logs` key, whatever its shape
    Logs(&'a Value),
}

impl<'a> Node<'a> {
    pub fn classify(key: Option<&str>, value: &'a Value) -> Self {
        if key == Some(LOGS_KEY) {
            return Node::Logs(value);
        }
        match value {
            Value::Object(map) => Node::Mapping(map),
            Value::Array(items) => Node::Sequence(items),
            scalar => Node::Scalar(scalar),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Label opening a nested block
    Heading(String),
    /// `label: value` on one line
    Field { label: String, value: String },
    /// Scalar element of a sequence
    Item(String),
    /// Break between consecutive log entries
    Separator,
    /// Input that could not be rendered as intended
    Diagnostic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    pub depth: usize,
    pub kind: LineKind,
}

impl fmt::Display for DocLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth);
        match &self.kind {
            LineKind::Heading(label) => write!(f, "{indent}**{label}**"),
            LineKind::Field { label, value } => write!(f, "{indent}**{label}:** {value}"),
            LineKind::Item(value) => write!(f, "{indent}- {value}"),
            LineKind::Separator => write!(f, "{indent}---"),
            LineKind::Diagnostic(message) => write!(f, "{indent}! {message}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<DocLine>,
}

impl Document {
    fn push(&mut self, depth: usize, kind: LineKind) {
        self.lines.push(DocLine { depth, kind });
    }

    pub fn to_markdown(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One collapsible block per sampled transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub tx_hash: Option<String>,
    pub body: Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Successful call with zero records
    Empty,
    Sections(Vec<Section>),
}

impl ResultView {
    pub fn sections(&self) -> &[Section] {
        match self {
            ResultView::Empty => &[],
            ResultView::Sections(sections) => sections,
        }
    }
}

pub fn render_records(records: &[TransactionRecord]) -> ResultView {
    if records.is_empty() {
        return ResultView::Empty;
    }
    let sections = records
        .iter()
        .enumerate()
        .map(|(idx, record)| Section {
            title: section_title(idx, record),
            tx_hash: record.tx_hash().map(str::to_string),
            body: render_record(record),
        })
        .collect();
    ResultView::Sections(sections)
}

/// 1-based label, e.g. `Transaction 1: 0xabc`
pub fn section_title(index: usize, record: &TransactionRecord) -> String {
    let hash = record.tx_hash().unwrap_or(UNKNOWN_HASH);
    format!("Transaction {}: {}", index + 1, hash)
}

pub fn render_record(record: &TransactionRecord) -> Document {
    let mut doc = Document::default();
    render_mapping(record.fields(), 0, &mut doc);
    doc
}

/// Where a value sits in its parent: under a mapping key or at a list index
enum Slot<'a> {
    Key(&'a str),
    Index(usize),
}

impl Slot<'_> {
    fn heading(&self) -> String {
        match self {
            Slot::Key(key) => title_case(key),
            Slot::Index(idx) => format!("#{}", idx + 1),
        }
    }
}

fn render_mapping(map: &Map<String, Value>, depth: usize, doc: &mut Document) {
    for (key, value) in map {
        render_node(Slot::Key(key), Node::classify(Some(key.as_str()), value), depth, doc);
    }
}

fn render_sequence(items: &[Value], depth: usize, doc: &mut Document) {
    for (idx, item) in items.iter().enumerate() {
        render_node(Slot::Index(idx), Node::classify(None, item), depth, doc);
    }
}

/// Scalars become one line; containers get a heading and recurse one level down.
fn render_node(slot: Slot<'_>, node: Node<'_>, depth: usize, doc: &mut Document) {
    match node {
        Node::Scalar(scalar) => {
            let value = scalar_text(scalar);
            let kind = match slot {
                Slot::Key(key) => LineKind::Field {
                    label: title_case(key),
                    value,
                },
                Slot::Index(_) => LineKind::Item(value),
            };
            doc.push(depth, kind);
        }
        Node::Mapping(inner) => {
            doc.push(depth, LineKind::Heading(slot.heading()));
            render_mapping(inner, depth + 1, doc);
        }
        Node::Sequence(items) => {
            doc.push(depth, LineKind::Heading(slot.heading()));
            render_sequence(items, depth + 1, doc);
        }
        Node::Logs(logs) => {
            doc.push(depth, LineKind::Heading(slot.heading()));
            render_logs(logs, depth + 1, doc);
        }
    }
}

/// Each entry must be a 2-element list; anything else becomes a diagnostic
/// line and the remaining entries still render.
fn render_logs(logs: &Value, depth: usize, doc: &mut Document) {
    let Value::Array(entries) = logs else {
        warn!(kind = json_kind(logs), "logs field is not a list");
        doc.push(
            depth,
            LineKind::Diagnostic(format!(
                "Malformed logs: expected a list of entries, found {}",
                json_kind(logs)
            )),
        );
        return;
    };

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            doc.push(depth, LineKind::Separator);
        }
        match entry {
            Value::Array(pair) if pair.len() == 2 => {
                doc.push(
                    depth,
                    LineKind::Field {
                        label: "Event ID".into(),
                        value: scalar_text(&pair[0]),
                    },
                );
                doc.push(
                    depth,
                    LineKind::Field {
                        label: "Event Signature".into(),
                        value: scalar_text(&pair[1]),
                    },
                );
            }
            Value::Array(other) => {
                warn!(entry = idx + 1, len = other.len(), "skipping log entry with wrong arity");
                doc.push(
                    depth,
                    LineKind::Diagnostic(format!(
                        "Malformed log entry #{}: expected 2 elements, found {}",
                        idx + 1,
                        other.len()
                    )),
                );
            }
            other => {
                warn!(entry = idx + 1, kind = json_kind(other), "skipping non-list log entry");
                doc.push(
                    depth,
                    LineKind::Diagnostic(format!(
                        "Malformed log entry #{}: expected a 2-element list, found {}",
                        idx + 1,
                        json_kind(other)
                    )),
                );
            }
        }
    }
}

/// Strings unquoted, everything else as compact JSON
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
