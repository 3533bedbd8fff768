//! Line-preserving parser for snapper's shell-style config files.
//!
//! Every line is kept with its original text and terminator, so rendering
//! an unmodified file gives back the exact input bytes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::schema;
use crate::error::MalformedLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// last line of a file without a trailing newline
    None,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Assignment { key: String, value: String },
    /// kept verbatim, never exposed as a setting
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub ending: LineEnding,
    pub kind: LineKind,
}

impl Line {
    pub fn new(text: impl Into<String>, ending: LineEnding) -> Self {
        let text = text.into();
        let kind = classify(&text);
        Line { text, ending, kind }
    }

    pub fn assignment(&self) -> Option<(&str, &str)> {
        match &self.kind {
            LineKind::Assignment { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub(crate) lines: Vec<Line>,
}

impl ConfigFile {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Exact file text, terminators included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending.as_str());
        }
        out
    }

    /// Indices of the active assignments for `key`, in file order.
    pub fn assignment_indices(&self, key: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.assignment().is_some_and(|(k, _)| k == key))
            .map(|(i, _)| i)
            .collect()
    }

    /// Value of any key, schema or not. The last assignment wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .filter_map(Line::assignment)
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    Malformed(MalformedLine),
    /// 1-based line numbers of every active assignment of the key
    DuplicateKey { key: String, lines: Vec<usize> },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::Malformed(bad) => write!(f, "{bad}"),
            ConfigWarning::DuplicateKey { key, lines } => {
                let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
                write!(f, "{key} is set more than once (lines {}), the last one wins", lines.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub file: ConfigFile,
    /// schema keys only
    pub values: BTreeMap<String, String>,
    pub warnings: Vec<ConfigWarning>,
}

pub fn parse(text: &str) -> ParsedConfig {
    let file = ConfigFile {
        lines: split_lines(text),
    };

    let mut values = BTreeMap::new();
    let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for (idx, line) in file.lines.iter().enumerate() {
        match &line.kind {
            LineKind::Assignment { key, value } => {
                seen.entry(key.as_str()).or_default().push(idx + 1);
                if schema::is_known(key) {
                    values.insert(key.clone(), value.clone());
                }
            }
            LineKind::Unrecognized => {
                let bad = MalformedLine {
                    line: idx + 1,
                    raw: line.text.clone(),
                    reason: "not a KEY=\"value\" assignment",
                };
                tracing::warn!("config {bad}");
                warnings.push(ConfigWarning::Malformed(bad));
            }
            LineKind::Blank | LineKind::Comment => {}
        }
    }

    for (key, lines) in seen {
        if lines.len() > 1 {
            tracing::warn!(key, ?lines, "duplicate assignment, last one wins");
            warnings.push(ConfigWarning::DuplicateKey {
                key: key.to_string(),
                lines,
            });
        }
    }

    ParsedConfig {
        file,
        values,
        warnings,
    }
}

fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let (line, ending, next) = match rest.find('\n') {
            Some(pos) => {
                let body = &rest[..pos];
                match body.strip_suffix('\r') {
                    Some(body) => (body, LineEnding::CrLf, &rest[pos + 1..]),
                    None => (body, LineEnding::Lf, &rest[pos + 1..]),
                }
            }
            None => (rest, LineEnding::None, ""),
        };
        lines.push(Line::new(line, ending));
        rest = next;
    }

    lines
}

fn classify(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    match parse_assignment(trimmed) {
        Some((key, value)) => LineKind::Assignment {
            key: key.to_string(),
            value: value.to_string(),
        },
        None => LineKind::Unrecognized,
    }
}

/// `KEY="VALUE"`, quotes required, no quote inside the value.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, rhs) = line.split_once('=')?;
    if !is_key(key) {
        return None;
    }
    let value = rhs.strip_prefix('"')?.strip_suffix('"')?;
    if value.contains('"') {
        return None;
    }
    Some((key, value))
}

fn is_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some('A'..='Z' | '_'))
        && chars.all(|c| matches!(c, 'A'..='Z' | '0'..='9' | '_'))
}
