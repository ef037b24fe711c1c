//! Purpose: Human rendering of search results, field listings and menus.
//! Exports: `BoxSize`, `render_banner`, `render_menu`, `render_records`, `render_record`, `render_fields`, `display_value`.
//! Role: Pure formatters used by the terminal output paths (one-shot commands and the shell).
//! Invariants: ANSI escapes appear only when `use_color` is set.
//! Invariants: Record fields keep the record's own key order; values render on one line.
//! Invariants: Rows fit inside their box; values too long for it are cut and end in `...`.
use std::collections::BTreeSet;

use serde_json::Value;

use recsearch::api::{CollectionKind, Record};

const ELLIPSIS: &str = "...";
// Values never get cut below this many characters, even next to very long keys.
const MIN_VALUE_WIDTH: usize = 12;

// 8/16-color palette, same codes for keys and value kinds everywhere.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_DIM: &str = "2";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxSize {
    Small,
    Medium,
    Large,
}

impl BoxSize {
    pub fn width(self) -> usize {
        match self {
            BoxSize::Small => 50,
            BoxSize::Medium => 80,
            BoxSize::Large => 100,
        }
    }

    /// Columns available for row text between `│ ` and ` │`.
    fn inner(self) -> usize {
        self.width() - 4
    }
}

/// A box row: rendered text plus its width on screen (escapes excluded).
struct Row {
    text: String,
    width: usize,
}

impl Row {
    fn plain(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }
}

pub fn render_banner(title: &str, lines: &[&str], use_color: bool) -> String {
    let inner = BoxSize::Large.inner();
    let rows = lines
        .iter()
        .map(|line| Row::plain(truncate(line, inner)))
        .collect::<Vec<_>>();
    render_box(title, &rows, BoxSize::Large, use_color)
}

pub fn render_menu(title: &str, options: &[&str], use_color: bool) -> String {
    let rows = options
        .iter()
        .enumerate()
        .map(|(index, option)| Row::plain(format!("{}. {option}", index + 1)))
        .collect::<Vec<_>>();
    render_box(title, &rows, BoxSize::Small, use_color)
}

pub fn render_records(records: &[&Record], use_color: bool) -> String {
    if records.is_empty() {
        return "No results found.".to_string();
    }
    let total = records.len();
    let mut blocks = Vec::with_capacity(total + 1);
    for (index, record) in records.iter().enumerate() {
        let rows = record_rows(record, use_color, BoxSize::Medium.inner());
        let title = format!("Result {} of {total}", index + 1);
        blocks.push(render_box(&title, &rows, BoxSize::Medium, use_color));
    }
    let noun = if total == 1 { "record" } else { "records" };
    blocks.push(format!("{total} {noun} found."));
    blocks.join("\n")
}

/// Aligned `key  value` lines sized for a result box, without the frame.
pub fn render_record(record: &Record, use_color: bool) -> String {
    record_rows(record, use_color, BoxSize::Medium.inner())
        .into_iter()
        .map(|row| row.text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_fields(kind: CollectionKind, fields: &BTreeSet<String>, use_color: bool) -> String {
    let rows = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let number = format!("{}. ", index + 1);
            Row {
                width: number.chars().count() + field.chars().count(),
                text: format!("{number}{}", colored(field, COLOR_KEY, use_color)),
            }
        })
        .collect::<Vec<_>>();
    render_box(&format!("Search {kind} with"), &rows, BoxSize::Medium, use_color)
}

/// One-line text for a stored value: strings unquoted, lists comma-joined.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => sanitize(text),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

fn record_rows(record: &Record, use_color: bool, inner: usize) -> Vec<Row> {
    let key_width = record
        .keys()
        .map(|key| key.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = inner.saturating_sub(key_width + 2).max(MIN_VALUE_WIDTH);
    record
        .iter()
        .map(|(key, value)| {
            let pad = " ".repeat(key_width - key.chars().count());
            let shown = truncate(&display_value(value), value_width);
            Row {
                width: key_width + 2 + shown.chars().count(),
                text: format!(
                    "{}{pad}  {}",
                    colored(key, COLOR_KEY, use_color),
                    colored(&shown, value_color(value), use_color)
                ),
            }
        })
        .collect()
}

fn render_box(title: &str, rows: &[Row], size: BoxSize, use_color: bool) -> String {
    let inner = size.inner();
    let bar = "─".repeat(size.width() - 2);
    let edge = colored("│", COLOR_DIM, use_color);
    let title = truncate(title, inner);
    let slack = inner - title.chars().count();
    let left = slack / 2;

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(colored(&format!("┌{bar}┐"), COLOR_DIM, use_color));
    lines.push(format!(
        "{edge} {}{title}{} {edge}",
        " ".repeat(left),
        " ".repeat(slack - left)
    ));
    lines.push(colored(&format!("├{bar}┤"), COLOR_DIM, use_color));
    for row in rows {
        let pad = " ".repeat(inner.saturating_sub(row.width));
        lines.push(format!("{edge} {}{pad} {edge}", row.text));
    }
    lines.push(colored(&format!("└{bar}┘"), COLOR_DIM, use_color));
    lines.join("\n")
}

/// Cuts `text` to at most `limit` characters, marking the cut with `...`.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept = text.chars().take(limit.saturating_sub(ELLIPSIS.len()));
    kept.chain(ELLIPSIS.chars()).collect()
}

fn value_color(value: &Value) -> &'static str {
    match value {
        Value::String(_) | Value::Array(_) => COLOR_STRING,
        Value::Number(_) => COLOR_NUMBER,
        Value::Bool(_) => COLOR_BOOL,
        Value::Null | Value::Object(_) => COLOR_DIM,
    }
}

fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}

fn colored(text: &str, color: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    format!("\u{1b}[{color}m{text}\u{1b}[0m")
}
