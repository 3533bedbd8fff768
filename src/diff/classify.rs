//! Classification of single `snapper status` lines.
//!
//! A line is `<status><whitespace><path>`. The status is either a single
//! character (`+`, `-`, `c`, `m`, ...) or snapper's column form such as
//! `c.....`, `+.....` or `.p....`. Only the first column decides the kind;
//! any unknown status still yields an `Other` record.

use serde::{Deserialize, Serialize};

use crate::error::MalformedLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Other,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Added,
        ChangeKind::Removed,
        ChangeKind::Modified,
        ChangeKind::Other,
    ];

    pub fn from_status(code: char) -> Self {
        match code {
            '+' => ChangeKind::Added,
            '-' => ChangeKind::Removed,
            'c' | 'm' => ChangeKind::Modified,
            _ => ChangeKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
            ChangeKind::Other => "other",
        }
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChangeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown change kind '{s}' (expected added, removed, modified or other)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub kind: ChangeKind,
    /// status token exactly as the tool printed it
    pub status: String,
    /// 1-based line number in the status listing
    pub line: usize,
}

/// Outcome of classifying one line. Blank lines carry no information and
/// are skipped rather than reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Record(ChangeRecord),
    Blank,
    Malformed(MalformedLine),
}

pub fn classify_line(line_no: usize, raw: &str) -> Classified {
    let line = raw.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Classified::Blank;
    }

    let malformed = |reason| {
        Classified::Malformed(MalformedLine {
            line: line_no,
            raw: line.to_string(),
            reason,
        })
    };

    // leading whitespace means the status column is missing
    if line.starts_with(char::is_whitespace) {
        return malformed("missing status");
    }

    let (status, rest) = match line.find(char::is_whitespace) {
        Some(pos) => line.split_at(pos),
        None => (line, ""),
    };

    if status.starts_with('/') {
        return malformed("missing status");
    }

    let path = rest.trim_start();
    if path.is_empty() {
        return malformed("missing path");
    }

    let Some(code) = status.chars().next() else {
        return malformed("missing status");
    };

    Classified::Record(ChangeRecord {
        path: path.to_string(),
        kind: ChangeKind::from_status(code),
        status: status.to_string(),
        line: line_no,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> ChangeRecord {
        match classify_line(1, line) {
            Classified::Record(r) => r,
            other => panic!("expected record for {line:?}, got {other:?}"),
        }
    }

    fn reason(line: &str) -> &'static str {
        match classify_line(7, line) {
            Classified::Malformed(m) => {
                assert_eq!(m.line, 7);
                m.reason
            }
            other => panic!("expected malformed for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(record("+ /etc/foo.conf").kind, ChangeKind::Added);
        assert_eq!(record("- /var/log/old.log").kind, ChangeKind::Removed);
        assert_eq!(record("c /home/user/file.txt").kind, ChangeKind::Modified);
        assert_eq!(record("m /home/user/file.txt").kind, ChangeKind::Modified);
        assert_eq!(record("x /dev/null").kind, ChangeKind::Other);
    }

    #[test]
    fn snapper_column_status() {
        let r = record("c..... /etc/snapper/configs/root");
        assert_eq!(r.kind, ChangeKind::Modified);
        assert_eq!(r.status, "c.....");
        assert_eq!(r.path, "/etc/snapper/configs/root");

        assert_eq!(record("+..... /new").kind, ChangeKind::Added);
        assert_eq!(record("-..... /gone").kind, ChangeKind::Removed);
        // metadata-only change
        assert_eq!(record(".p.... /etc/shadow").kind, ChangeKind::Other);
    }

    #[test]
    fn path_keeps_inner_spaces() {
        let r = record("+\t/home/user/My Documents/a b.txt\r\n");
        assert_eq!(r.path, "/home/user/My Documents/a b.txt");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(classify_line(1, ""), Classified::Blank);
        assert_eq!(classify_line(1, "   \n"), Classified::Blank);
    }

    #[test]
    fn malformed_lines_are_reported() {
        assert_eq!(reason("+"), "missing path");
        assert_eq!(reason("c    "), "missing path");
        assert_eq!(reason("/etc/fstab"), "missing status");
        assert_eq!(reason("   /etc/fstab"), "missing status");
    }

    #[test]
    fn unknown_status_tokens_are_other() {
        for line in ["?? /g", "R..... /x", "X /h", "C!?.. /etc/fstab"] {
            let r = record(line);
            assert_eq!(r.kind, ChangeKind::Other, "{line}");
        }
        assert_eq!(record("R..... /x").status, "R.....");
    }

    #[test]
    fn kind_parses_from_cli_names() {
        assert_eq!("modified".parse::<ChangeKind>().unwrap(), ChangeKind::Modified);
        assert!("renamed".parse::<ChangeKind>().is_err());
    }
}
